// [libs/infra/db/src/repositories/allocator.rs]
use crate::convert::{
    net4_to_sql, net6_to_sql, sql_to_addr, sql_to_net4, sql_to_net6, sql_to_v4, sql_to_v6, v4_to_sql, v6_to_sql,
};
use crate::errors::DbError;
use crate::queries;
use crate::schema::SchemaNames;
use ipnet::{Ipv4Net, Ipv6Net};
use ipnetwork::IpNetwork;
use realm_addr_math::{accept_cgnat_candidate, accept_keydesk_candidate, accept_ula_candidate, enclosing_v4_net, enclosing_v6_net, random_v4, random_v6, sample_until};
use realm_models::window::{pick_heaviest, pick_lowest_iweight};
use realm_models::{Brigade, Person};
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::instrument;
use uuid::Uuid;

/// Bounded retry window for sampling an acceptable address candidate before
/// treating the allocation as exhausted (spec §7 kind 4).
const MAX_SAMPLE_ATTEMPTS: usize = 1024;

/// Result of selecting the placement target before any address is drawn.
struct SelectedPair {
    pair_id: Uuid,
    endpoint_ipv4: Ipv4Addr,
}

/// A brigade row plus the pair's control address, as needed to drive a
/// delete or replace-brigadier flow (spec §4.7).
#[derive(Debug, Clone)]
pub struct BrigadeForMutation {
    pub brigade: Brigade,
    pub control_ip: IpAddr,
}

pub struct AllocatorRepository {
    pool: PgPool,
    names: SchemaNames,
}

impl AllocatorRepository {
    pub fn new(pool: PgPool, names: SchemaNames) -> Self {
        Self { pool, names }
    }

    /// Implements spec §4.5 steps 1–8 as a single serialized transaction.
    #[instrument(skip(self, person), fields(brigade_id = %brigade_id))]
    #[allow(clippy::too_many_arguments)]
    pub async fn allocate_brigade(
        &self,
        brigade_id: Uuid,
        brigadier: &str,
        person: &Person,
        dns_ipv4: Ipv4Addr,
        dns_ipv6: Ipv6Addr,
        domain_name: Option<&str>,
        forced_control_ip: Option<IpAddr>,
    ) -> Result<(Brigade, i64), DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Connection)?;

        let (used_keydesk, used_cgnat, used_ula) = lock_and_collect_used(&mut tx, &self.names).await?;

        let pair = select_pair(&mut tx, &self.names, forced_control_ip).await?;

        let cgnat_windows: Vec<realm_models::CgnatWindow> = {
            let rows = sqlx::query(&queries::select_cgnat_windows(&self.names)).fetch_all(&mut *tx).await?;
            rows.into_iter()
                .map(|row| -> Result<_, DbError> {
                    Ok(realm_models::CgnatWindow {
                        window_id: row.try_get("window_id")?,
                        net: sql_to_net4(row.try_get::<IpNetwork, _>("net")?)?,
                        weight: row.try_get("weight")?,
                    })
                })
                .collect::<Result<_, _>>()?
        };
        let cgnat_window = pick_heaviest(cgnat_windows).ok_or(DbError::NoWindowConfigured)?;

        let ula_windows: Vec<realm_models::Ipv6Window> = {
            let rows = sqlx::query(&queries::select_ula_windows(&self.names)).fetch_all(&mut *tx).await?;
            rows.into_iter()
                .map(|row| -> Result<_, DbError> {
                    Ok(realm_models::Ipv6Window {
                        window_id: row.try_get("window_id")?,
                        net: sql_to_net6(row.try_get::<IpNetwork, _>("net")?)?,
                        iweight: row.try_get("iweight")?,
                    })
                })
                .collect::<Result<_, _>>()?
        };
        let ula_window = pick_lowest_iweight(ula_windows).ok_or(DbError::NoWindowConfigured)?;

        let keydesk_windows: Vec<realm_models::Ipv6Window> = {
            let rows = sqlx::query(&queries::select_keydesk_windows(&self.names)).fetch_all(&mut *tx).await?;
            rows.into_iter()
                .map(|row| -> Result<_, DbError> {
                    Ok(realm_models::Ipv6Window {
                        window_id: row.try_get("window_id")?,
                        net: sql_to_net6(row.try_get::<IpNetwork, _>("net")?)?,
                        iweight: row.try_get("iweight")?,
                    })
                })
                .collect::<Result<_, _>>()?
        };
        let keydesk_window = pick_lowest_iweight(keydesk_windows).ok_or(DbError::NoWindowConfigured)?;

        let mut rng = rand::thread_rng();

        let cgnat_first = sample_until(
            MAX_SAMPLE_ATTEMPTS,
            |rng| random_v4(cgnat_window.net),
            |addr| match enclosing_v4_net(*addr, 24) {
                Ok(net) => accept_cgnat_candidate(*addr, net, &used_cgnat),
                Err(_) => false,
            },
            &mut rng,
        )
        .ok_or(DbError::AddressExhaustion(MAX_SAMPLE_ATTEMPTS))?;
        let cgnat_net = enclosing_v4_net(cgnat_first, 24).expect("accepted candidate truncates cleanly");

        let ula_first = sample_until(
            MAX_SAMPLE_ATTEMPTS,
            |rng| random_v6(ula_window.net),
            |addr| match enclosing_v6_net(*addr, 64) {
                Ok(net) => accept_ula_candidate(*addr, net, &used_ula),
                Err(_) => false,
            },
            &mut rng,
        )
        .ok_or(DbError::AddressExhaustion(MAX_SAMPLE_ATTEMPTS))?;
        let ula_net = enclosing_v6_net(ula_first, 64).expect("accepted candidate truncates cleanly");

        let keydesk_ipv6 = sample_until(
            MAX_SAMPLE_ATTEMPTS,
            |rng| random_v6(keydesk_window.net),
            |addr| accept_keydesk_candidate(*addr, &used_keydesk),
            &mut rng,
        )
        .ok_or(DbError::AddressExhaustion(MAX_SAMPLE_ATTEMPTS))?;

        sqlx::query(&queries::insert_brigade(&self.names))
            .bind(brigade_id)
            .bind(pair.pair_id)
            .bind(brigadier)
            .bind(sqlx::types::Json(person))
            .bind(v4_to_sql(pair.endpoint_ipv4))
            .bind(domain_name)
            .bind(v4_to_sql(dns_ipv4))
            .bind(v6_to_sql(dns_ipv6))
            .bind(v6_to_sql(keydesk_ipv6))
            .bind(net4_to_sql(cgnat_net))
            .bind(v4_to_sql(cgnat_first))
            .bind(net6_to_sql(ula_net))
            .bind(v6_to_sql(ula_first))
            .execute(&mut *tx)
            .await?;

        sqlx::query(&queries::insert_stats_row(&self.names))
            .bind(brigade_id)
            .execute(&mut *tx)
            .await?;

        if let Some(domain) = domain_name {
            sqlx::query(&queries::insert_domain_binding(&self.names))
                .bind(domain)
                .bind(v4_to_sql(pair.endpoint_ipv4))
                .execute(&mut *tx)
                .await?;
        }

        let free_slots_active: i64 = sqlx::query(&queries::select_pair_free_slots(&self.names))
            .bind(pair.pair_id)
            .fetch_one(&mut *tx)
            .await?
            .try_get(0)?;

        tx.commit().await.map_err(DbError::Connection)?;

        tracing::info!(%brigade_id, pair_id = %pair.pair_id, free_slots_active, "brigade allocated");

        let brigade = Brigade {
            brigade_id,
            pair_id: pair.pair_id,
            brigadier: brigadier.to_string(),
            person: person.clone(),
            endpoint_ipv4: pair.endpoint_ipv4,
            domain_name: domain_name.map(str::to_string),
            dns_ipv4,
            dns_ipv6,
            keydesk_ipv6,
            ipv4_cgnat: cgnat_net,
            ipv4_cgnat_first: cgnat_first,
            ipv6_ula: ula_net,
            ipv6_ula_first: ula_first,
        };

        Ok((brigade, free_slots_active))
    }

    /// Fetches a brigade plus its pair's control address, row-locked, ahead
    /// of a delete or replace-brigadier flow.
    #[instrument(skip(self))]
    pub async fn fetch_for_mutation(&self, brigade_id: Uuid) -> Result<BrigadeForMutation, DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Connection)?;
        let row = sqlx::query(&queries::select_brigade_for_mutation(&self.names))
            .bind(brigade_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::BrigadeNotFound(brigade_id))?;

        let brigade = row_to_brigade(&row)?;
        let control_ip = sql_to_addr(row.try_get::<IpNetwork, _>("control_ip")?);
        tx.commit().await.map_err(DbError::Connection)?;

        Ok(BrigadeForMutation { brigade, control_ip })
    }

    /// Removes the brigade row (and its stats row via `ON DELETE CASCADE`)
    /// plus the domain binding, if any. A no-op second call reports
    /// `BrigadeNotFound` rather than silently succeeding, matching the
    /// idempotence property in spec §8.
    #[instrument(skip(self))]
    pub async fn delete_brigade(&self, brigade_id: Uuid) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Connection)?;

        let row = sqlx::query(&queries::select_brigade_for_mutation(&self.names))
            .bind(brigade_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::BrigadeNotFound(brigade_id))?;
        let domain_name: Option<String> = row.try_get("domain_name")?;

        let affected = sqlx::query(&queries::delete_brigade(&self.names))
            .bind(brigade_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::BrigadeNotFound(brigade_id));
        }

        if let Some(domain) = domain_name {
            sqlx::query(&queries::delete_domain_binding(&self.names))
                .bind(domain)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await.map_err(DbError::Connection)?;
        tracing::info!(%brigade_id, "brigade deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn free_slots(&self, active_only: bool) -> Result<i64, DbError> {
        let row = sqlx::query(&queries::select_total_free_slots(&self.names, active_only))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get(0)?)
    }
}

async fn lock_and_collect_used(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    names: &SchemaNames,
) -> Result<(HashSet<Ipv6Addr>, HashSet<Ipv4Net>, HashSet<Ipv6Net>), DbError> {
    let rows = sqlx::query(&queries::lock_existing_brigades(names)).fetch_all(&mut *tx).await?;

    let mut used_keydesk = HashSet::with_capacity(rows.len());
    let mut used_cgnat = HashSet::with_capacity(rows.len());
    let mut used_ula = HashSet::with_capacity(rows.len());

    for row in &rows {
        used_keydesk.insert(sql_to_v6(row.try_get::<IpNetwork, _>("keydesk_ipv6")?)?);
        used_cgnat.insert(sql_to_net4(row.try_get::<IpNetwork, _>("ipv4_cgnat")?)?);
        used_ula.insert(sql_to_net6(row.try_get::<IpNetwork, _>("ipv6_ula")?)?);
    }

    Ok((used_keydesk, used_cgnat, used_ula))
}

async fn select_pair(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    names: &SchemaNames,
    forced_control_ip: Option<IpAddr>,
) -> Result<SelectedPair, DbError> {
    if let Some(forced) = forced_control_ip {
        let row = sqlx::query(&queries::select_forced_pair(names))
            .bind(crate::convert::addr_to_sql(forced))
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::ForcedPairNotFound(forced))?;
        return Ok(SelectedPair {
            pair_id: row.try_get("pair_id")?,
            endpoint_ipv4: sql_to_v4(row.try_get::<IpNetwork, _>("endpoint_ipv4")?)?,
        });
    }

    let rows = sqlx::query(&queries::select_active_pair_candidates(names)).fetch_all(&mut *tx).await?;
    let candidates: Vec<realm_models::PairCandidate> = rows
        .into_iter()
        .map(|row| -> Result<_, DbError> {
            Ok(realm_models::PairCandidate {
                pair_id: row.try_get("pair_id")?,
                control_ip: sql_to_addr(row.try_get::<IpNetwork, _>("control_ip")?),
                endpoint_ipv4: sql_to_v4(row.try_get::<IpNetwork, _>("endpoint_ipv4")?)?,
                domain_name: row.try_get("domain_name")?,
                free_slots_count: row.try_get("free_slots_count")?,
            })
        })
        .collect::<Result<_, _>>()?;

    let best = realm_models::PairCandidate::pick_best(candidates).ok_or(DbError::NoPairAvailable)?;
    Ok(SelectedPair {
        pair_id: best.pair_id,
        endpoint_ipv4: best.endpoint_ipv4,
    })
}

fn row_to_brigade(row: &sqlx::postgres::PgRow) -> Result<Brigade, DbError> {
    let person: sqlx::types::Json<Person> = row.try_get("person")?;
    Ok(Brigade {
        brigade_id: row.try_get("brigade_id")?,
        pair_id: row.try_get("pair_id")?,
        brigadier: row.try_get("brigadier")?,
        person: person.0,
        endpoint_ipv4: sql_to_v4(row.try_get::<IpNetwork, _>("endpoint_ipv4")?)?,
        domain_name: row.try_get("domain_name")?,
        dns_ipv4: sql_to_v4(row.try_get::<IpNetwork, _>("dns_ipv4")?)?,
        dns_ipv6: sql_to_v6(row.try_get::<IpNetwork, _>("dns_ipv6")?)?,
        keydesk_ipv6: sql_to_v6(row.try_get::<IpNetwork, _>("keydesk_ipv6")?)?,
        ipv4_cgnat: sql_to_net4(row.try_get::<IpNetwork, _>("ipv4_cgnat")?)?,
        ipv4_cgnat_first: sql_to_v4(row.try_get::<IpNetwork, _>("ipv4_cgnat_first")?)?,
        ipv6_ula: sql_to_net6(row.try_get::<IpNetwork, _>("ipv6_ula")?)?,
        ipv6_ula_first: sql_to_v6(row.try_get::<IpNetwork, _>("ipv6_ula_first")?)?,
    })
}

// [libs/infra/db/src/repositories/pairs.rs]
use crate::convert::{sql_to_addr, v4_to_sql};
use crate::errors::DbError;
use crate::queries;
use crate::schema::SchemaNames;
use ipnetwork::IpNetwork;
use realm_models::Pair;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

/// Read access to pair placement targets, independent of the allocator
/// transaction (used by diagnostics and the orchestrator's pre-flight
/// checks).
pub struct PairsRepository {
    pool: PgPool,
    names: SchemaNames,
}

impl PairsRepository {
    pub fn new(pool: PgPool, names: SchemaNames) -> Self {
        Self { pool, names }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, pair_id: Uuid) -> Result<Pair, DbError> {
        let sql = format!(
            "SELECT pair_id, control_ip, endpoint_ipv4, is_active, domain_name FROM {} WHERE pair_id = $1",
            self.names.pairs_table()
        );
        let row = sqlx::query(&sql)
            .bind(pair_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::PairNotFound(pair_id))?;

        Ok(Pair {
            pair_id: row.try_get("pair_id")?,
            control_ip: sql_to_addr(row.try_get::<IpNetwork, _>("control_ip")?),
            endpoint_ipv4: crate::convert::sql_to_v4(row.try_get::<IpNetwork, _>("endpoint_ipv4")?)?,
            is_active: row.try_get("is_active")?,
            domain_name: row.try_get("domain_name")?,
        })
    }

    /// Binds a newly-issued subdomain to a pair that had none (spec §4.7
    /// Add step 2): sets `pairs.domain_name` and upserts the
    /// `domains_endpoints_ipv4` row, in one transaction, separate from the
    /// allocation transaction that created the triggering brigade.
    #[instrument(skip(self))]
    pub async fn bind_domain(&self, pair_id: Uuid, domain_name: &str) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Connection)?;

        let pair = self.get(pair_id).await?;

        sqlx::query(&queries::update_pair_domain(&self.names))
            .bind(domain_name)
            .bind(pair_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(&queries::insert_domain_binding(&self.names))
            .bind(domain_name)
            .bind(v4_to_sql(pair.endpoint_ipv4))
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(DbError::Connection)?;
        tracing::info!(%pair_id, domain_name, "pair domain bound");
        Ok(())
    }
}

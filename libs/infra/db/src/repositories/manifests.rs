// [libs/infra/db/src/repositories/manifests.rs]
use crate::convert::{sql_to_v4, sql_to_v6};
use crate::errors::DbError;
use crate::queries;
use crate::schema::SchemaNames;
use ipnetwork::IpNetwork;
use realm_models::{DelegationRow, KeydeskAddressRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

/// Read-side queries feeding the delegation and keydesk-address CSV
/// manifests (spec §4.6).
pub struct ManifestRepository {
    pool: PgPool,
    names: SchemaNames,
}

impl ManifestRepository {
    pub fn new(pool: PgPool, names: SchemaNames) -> Self {
        Self { pool, names }
    }

    #[instrument(skip(self))]
    pub async fn delegation_rows(&self) -> Result<Vec<DelegationRow>, DbError> {
        let rows = sqlx::query(&queries::select_delegation_rows(&self.names)).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| -> Result<_, DbError> {
                Ok(DelegationRow {
                    domain_name: row.try_get("domain_name")?,
                    endpoint_ipv4: sql_to_v4(row.try_get::<IpNetwork, _>("endpoint_ipv4")?)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn keydesk_address_rows(&self) -> Result<Vec<KeydeskAddressRow>, DbError> {
        let rows = sqlx::query(&queries::select_keydesk_address_rows(&self.names)).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| -> Result<_, DbError> {
                Ok(KeydeskAddressRow {
                    endpoint_ipv4: sql_to_v4(row.try_get::<IpNetwork, _>("endpoint_ipv4")?)?,
                    keydesk_ipv6: sql_to_v6(row.try_get::<IpNetwork, _>("keydesk_ipv6")?)?,
                })
            })
            .collect()
    }
}

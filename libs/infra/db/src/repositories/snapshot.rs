// [libs/infra/db/src/repositories/snapshot.rs]
use crate::convert::{sql_to_addr, sql_to_v4};
use crate::errors::DbError;
use crate::queries;
use crate::schema::SchemaNames;
use ipnetwork::IpNetwork;
use sqlx::{PgPool, Row};
use std::net::{IpAddr, Ipv4Addr};
use tracing::instrument;
use uuid::Uuid;

/// One brigade as seen by the snapshot collector (spec §4.8 step 2): which
/// pair owns it, that pair's control IP (the address the agent SSH
/// transport dials), and the endpoint IPv4 the optional CIDR filter
/// matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotBrigadeRow {
    pub brigade_id: Uuid,
    pub pair_id: Uuid,
    pub control_ip: IpAddr,
    pub endpoint_ipv4: Ipv4Addr,
}

/// Read-side query feeding the snapshot collector (C9).
pub struct SnapshotRepository {
    pool: PgPool,
    names: SchemaNames,
}

impl SnapshotRepository {
    pub fn new(pool: PgPool, names: SchemaNames) -> Self {
        Self { pool, names }
    }

    #[instrument(skip(self))]
    pub async fn brigades_by_pair(&self) -> Result<Vec<SnapshotBrigadeRow>, DbError> {
        let rows = sqlx::query(&queries::select_brigades_for_snapshot(&self.names))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<_, DbError> {
                Ok(SnapshotBrigadeRow {
                    brigade_id: row.try_get("brigade_id")?,
                    pair_id: row.try_get("pair_id")?,
                    control_ip: sql_to_addr(row.try_get::<IpNetwork, _>("control_ip")?),
                    endpoint_ipv4: sql_to_v4(row.try_get::<IpNetwork, _>("endpoint_ipv4")?)?,
                })
            })
            .collect()
    }
}

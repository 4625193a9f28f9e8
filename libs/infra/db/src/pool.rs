// [libs/infra/db/src/pool.rs]
use crate::errors::DbError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Opens the process-wide connection pool (spec §9: "the database connection
/// pool is process-wide; initialize once at startup, close at exit").
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(16)
        .connect(database_url)
        .await
        .map_err(DbError::Connection)
}

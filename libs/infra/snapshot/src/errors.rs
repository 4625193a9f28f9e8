// [libs/infra/snapshot/src/errors.rs]
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("reading brigade/pair state: {0}")]
    Db(#[from] realm_db::DbError),

    #[error("rsa oaep: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("encoding aggregate snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("writing snapshot file: {0}")]
    Io(#[from] std::io::Error),
}

// [libs/infra/manifest/src/errors.rs]
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("reading manifest rows: {0}")]
    Db(#[from] realm_db::DbError),

    #[error("encoding csv row: {0}")]
    Csv(#[from] csv::Error),

    #[error("resolving sync host {0}: {1}")]
    Resolve(String, String),

    #[error("sync host {0} has no resolvable address")]
    NoAddress(String),

    #[error("pair-agent transport: {0}")]
    Agent(#[from] realm_pair_agent::PairAgentError),

    #[error("publish write step exited with status {0}")]
    WriteFailed(u32),

    #[error("publish reload-sentinel step exited with status {0}")]
    ReloadFailed(u32),
}

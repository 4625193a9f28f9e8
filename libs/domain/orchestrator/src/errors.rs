// [libs/domain/orchestrator/src/errors.rs]
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("allocator store: {0}")]
    Db(#[from] realm_db::DbError),

    #[error("pair-agent transport: {0}")]
    Agent(#[from] realm_pair_agent::PairAgentError),

    #[error("subdomain rpc: {0}")]
    Subdomain(#[from] realm_subdomain_client::ClientError),

    #[error("manifest publish: {0}")]
    Manifest(#[from] realm_manifest::ManifestError),

    #[error("dns propagation: {0}")]
    Dns(#[from] realm_dns_presence::DnsError),

    #[error("parsing pair-agent json response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pair-agent command exited with status {0}")]
    NonZeroExit(u32),

    #[error("brigade not delegated within the propagation deadline")]
    NotDelegated,
}

// [libs/infra/subdomain-client/src/errors.rs]
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("subdomain service rejected the request: {0}")]
    ServerRejection(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("subdomain service returned an empty subdomain name")]
    EmptySubdomain,
}

// [libs/infra/pair-agent/src/errors.rs]
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PairAgentError {
    #[error("failed to load ssh private key at {0}: {1}")]
    KeyLoad(std::path::PathBuf, String),

    #[error("ssh dial/session error: {0}")]
    Ssh(#[from] russh::Error),

    #[error("ssh authentication rejected for user {0}")]
    AuthRejected(String),

    #[error("command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("remote command exited with status {0}")]
    NonZeroExit(u32),

    #[error("chunked transfer decode error: {0}")]
    ChunkDecode(String),
}

// [libs/infra/db/src/errors.rs]
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("no active pair has control ip {0}")]
    ForcedPairNotFound(std::net::IpAddr),

    #[error("no active pair available for allocation")]
    NoPairAvailable,

    #[error("no address window configured for this realm")]
    NoWindowConfigured,

    #[error("exhausted {0} sampling attempts without an acceptable address candidate")]
    AddressExhaustion(usize),

    #[error("brigade {0} not found")]
    BrigadeNotFound(uuid::Uuid),

    #[error("pair {0} not found")]
    PairNotFound(uuid::Uuid),

    #[error("invalid schema identifier: {0}")]
    InvalidSchemaIdent(String),

    #[error("expected an IPv{0} address/network in column, got the other family")]
    AddressFamilyMismatch(u8),
}

// [libs/infra/dns-presence/src/errors.rs]
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    #[error("invalid nameserver entry {0}: {1}")]
    InvalidNameserver(String, String),

    #[error("exchange with {nameserver} failed after {attempts} attempts: {source}")]
    RetriesExceeded {
        nameserver: String,
        attempts: u32,
        #[source]
        source: hickory_resolver::error::ResolveError,
    },

    #[error("nameserver {nameserver} returned negative rcode {rcode}")]
    NegativeRcode { nameserver: String, rcode: String },

    #[error("wait deadline of {0:?} elapsed without confirmation")]
    DeadlineElapsed(Duration),
}

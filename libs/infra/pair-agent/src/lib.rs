// [libs/infra/pair-agent/src/lib.rs]
/*!
 * SSH transport to a pair's provisioning agent: one command per session,
 * HTTP-chunked stdout, captured stderr, bounded timeout (spec §4.2).
 */

pub mod client;
pub mod dechunk;
pub mod errors;
pub mod handler;

pub use client::{CommandOutput, PairAgentClient, DEFAULT_TIMEOUT};
pub use dechunk::dechunk;
pub use errors::PairAgentError;
pub use handler::{AcceptAnyHostKey, HostKeyPolicy};

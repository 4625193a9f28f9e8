// [libs/infra/snapshot/src/lib.rs]
/*!
 * Encrypted snapshot collector (C9): generates a per-run PSK, fans out
 * `fetchsnaps` over pairs with bounded concurrency, aggregates results
 * through a single consumer, and installs the result atomically.
 */

pub mod collector;
pub mod command;
pub mod errors;
pub mod psk;

pub use collector::{collect, publish_aggregate, CollectionRequest};
pub use command::fetchsnaps_command;
pub use errors::SnapshotError;
pub use psk::{generate_psk, GeneratedPsk, PSK_LEN};

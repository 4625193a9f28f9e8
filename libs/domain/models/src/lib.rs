// [libs/domain/models/src/lib.rs]
/*!
 * Shared domain entities and DTOs for the realm control plane — brigade,
 * pair, person, weighted address windows, derived manifests, the pair-agent
 * snapshot protocol shapes, and the CLI JSON envelope. Single source of
 * truth consumed by every other crate in the workspace.
 */

pub mod brigade;
pub mod envelope;
pub mod ids;
pub mod manifest;
pub mod pair;
pub mod person;
pub mod snapshot;
pub mod window;

pub use brigade::{AddBrigadeOutcome, AllocatedBrigade, Brigade, BrigadeConfig};
pub use envelope::CliEnvelope;
pub use manifest::{DelegationRow, KeydeskAddressRow};
pub use pair::{Pair, PairCandidate, PairSlots};
pub use person::Person;
pub use snapshot::{AggregatedSnaps, EncryptedBrigade, IncomingSnaps};
pub use window::{CgnatWindow, Ipv6Window};

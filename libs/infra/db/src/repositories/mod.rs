// [libs/infra/db/src/repositories/mod.rs]
pub mod allocator;
pub mod manifests;
pub mod pairs;
pub mod snapshot;

pub use allocator::AllocatorRepository;
pub use manifests::ManifestRepository;
pub use pairs::PairsRepository;
pub use snapshot::{SnapshotBrigadeRow, SnapshotRepository};

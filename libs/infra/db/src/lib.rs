// [libs/infra/db/src/lib.rs]
/*!
 * The allocator store: one process-wide `PgPool`, schema-qualified queries
 * against operator-configured schema names, and the row-locked allocation
 * transaction that is the core of the realm control plane.
 */

pub mod convert;
pub mod errors;
pub mod pool;
pub mod queries;
pub mod repositories;
pub mod schema;

pub use errors::DbError;
pub use pool::connect;
pub use repositories::{AllocatorRepository, ManifestRepository, PairsRepository, SnapshotBrigadeRow, SnapshotRepository};
pub use repositories::allocator::BrigadeForMutation;
pub use schema::{ensure_schema, SchemaNames};

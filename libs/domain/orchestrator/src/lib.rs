// [libs/domain/orchestrator/src/lib.rs]
/*!
 * Brigade lifecycle orchestration (C8): composes the allocator, pair-agent,
 * subdomain RPC, manifest publisher, and DNS-presence waiter into the
 * add/delete/replace-brigadier flows in spec §4.7.
 */

pub mod add;
pub mod command;
pub mod delete;
pub mod errors;
pub mod replace;

pub use add::{add_brigade, AddDeps};
pub use command::{create_command, destroy_command, replace_command, ReplaceFlavors};
pub use delete::{delete_brigade, DeleteDeps};
pub use errors::OrchestratorError;
pub use replace::replace_brigadier;

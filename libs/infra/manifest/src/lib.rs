// [libs/infra/manifest/src/lib.rs]
/*!
 * Delegation and keydesk-address manifest builder/publisher (C6+C7):
 * rebuilds each CSV from current DB state and installs it atomically on
 * the configured sync host.
 */

pub mod csv_build;
pub mod errors;
pub mod publisher;

pub use csv_build::{build_delegation_csv, build_keydesk_address_csv};
pub use errors::ManifestError;
pub use publisher::{
    delegation_filename, keydesk_address_filename, publish, resolve_host, DELEGATION_RELOAD_SENTINEL,
    KEYDESK_ADDRESS_RELOAD_SENTINEL,
};

use realm_config::SyncConnect;
use realm_db::ManifestRepository;
use realm_pair_agent::{HostKeyPolicy, PairAgentClient};
use tracing::instrument;

/// Rebuilds and publishes the delegation manifest (spec §4.6/§4.7 step 5).
///
/// The sync host is a separate machine from the brigade pairs, with its own
/// SSH account (`sync.user`); `agent` is re-keyed to that user rather than
/// reused as-is, since it's normally constructed for the pair-agent's own
/// fixed remote user.
#[instrument(skip(db, agent, sync))]
pub async fn publish_delegation_manifest<P: HostKeyPolicy>(
    db: &ManifestRepository,
    agent: &PairAgentClient<P>,
    sync: &SyncConnect,
    dc_id: &str,
) -> Result<(), ManifestError> {
    let sync_agent = agent.clone().with_username(sync.user.clone());
    let rows = db.delegation_rows().await?;
    let content = build_delegation_csv(&rows)?;
    let host = resolve_host(sync).await?;
    publish(
        &sync_agent,
        host,
        &delegation_filename(dc_id),
        DELEGATION_RELOAD_SENTINEL,
        &content,
    )
    .await
}

/// Rebuilds and publishes the keydesk-address manifest (spec §4.6/§4.7
/// step 4). See [`publish_delegation_manifest`] on why `agent` is re-keyed.
#[instrument(skip(db, agent, sync))]
pub async fn publish_keydesk_address_manifest<P: HostKeyPolicy>(
    db: &ManifestRepository,
    agent: &PairAgentClient<P>,
    sync: &SyncConnect,
    dc_id: &str,
) -> Result<(), ManifestError> {
    let sync_agent = agent.clone().with_username(sync.user.clone());
    let rows = db.keydesk_address_rows().await?;
    let content = build_keydesk_address_csv(&rows)?;
    let host = resolve_host(sync).await?;
    publish(
        &sync_agent,
        host,
        &keydesk_address_filename(dc_id),
        KEYDESK_ADDRESS_RELOAD_SENTINEL,
        &content,
    )
    .await
}

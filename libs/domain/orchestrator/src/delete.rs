// [libs/domain/orchestrator/src/delete.rs]
//! Delete-brigadier flow (spec §4.7 Delete). Revokes remotely first
//! (pair-agent `destroy`, subdomain release), then removes the DB row —
//! an aborted delete leaves an orphaned-but-still-registered brigade rather
//! than a phantom one the pair-agent has never heard of.

use crate::command::destroy_command;
use crate::errors::OrchestratorError;
use realm_config::{DcIdentity, SyncConnect};
use realm_db::{AllocatorRepository, ManifestRepository};
use realm_pair_agent::{HostKeyPolicy, PairAgentClient};
use realm_subdomain_client::SubdomainClient;
use tracing::instrument;
use uuid::Uuid;

pub struct DeleteDeps<'a, P: HostKeyPolicy> {
    pub allocator: &'a AllocatorRepository,
    pub manifests: &'a ManifestRepository,
    pub subdomain: &'a SubdomainClient,
    pub agent: &'a PairAgentClient<P>,
    pub delegation_sync: &'a SyncConnect,
    pub keydesk_address_sync: &'a SyncConnect,
    pub dc: &'a DcIdentity,
}

#[instrument(skip(deps), fields(brigade_id = %brigade_id))]
pub async fn delete_brigade<P: HostKeyPolicy>(deps: &DeleteDeps<'_, P>, brigade_id: Uuid) -> Result<(), OrchestratorError> {
    // Step 1: fetch the brigade and its pair's control address.
    let mutation = deps.allocator.fetch_for_mutation(brigade_id).await?;

    // Step 2: revoke on the pair-agent.
    let command = destroy_command(brigade_id);
    deps.agent.invoke(mutation.control_ip, &command, None).await?;

    // Step 3: release the subdomain, if this brigade's pair has one bound
    // and the subdomain RPC isn't disabled (pick/delete themselves no-op
    // when disabled, so this call is unconditional here).
    if let Some(domain_name) = &mutation.brigade.domain_name {
        deps.subdomain.delete(domain_name).await?;
    }

    // Step 4: remove the DB row (and its domain binding, handled inside
    // `delete_brigade` itself).
    deps.allocator.delete_brigade(brigade_id).await?;

    // Step 5: republish both manifests to drop the brigade's addresses,
    // delegation first.
    realm_manifest::publish_delegation_manifest(deps.manifests, deps.agent, deps.delegation_sync, &deps.dc.id).await?;
    realm_manifest::publish_keydesk_address_manifest(deps.manifests, deps.agent, deps.keydesk_address_sync, &deps.dc.id)
        .await?;

    Ok(())
}

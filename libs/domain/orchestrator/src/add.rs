// [libs/domain/orchestrator/src/add.rs]
//! Add-brigadier flow (spec §4.7 Add). `allocate_brigade` always runs with
//! `domain_name = None`: which pair (and therefore whether it already has a
//! domain) is only known once the allocation transaction picks one, so the
//! domain-bind step has to follow in its own transaction rather than being
//! folded into the allocation itself.

use crate::command::create_command;
use crate::errors::OrchestratorError;
use realm_config::{DcIdentity, DnsConfig, SyncConnect};
use realm_db::{AllocatorRepository, ManifestRepository, PairsRepository};
use realm_dns_presence::{keydesk_fqdn, wait_for_all};
use realm_models::{AddBrigadeOutcome, BrigadeConfig, Person};
use realm_pair_agent::{HostKeyPolicy, PairAgentClient};
use realm_subdomain_client::SubdomainClient;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::instrument;
use uuid::Uuid;

/// Everything `add_brigade` needs to drive the flow end to end. Bundled so
/// the binary only assembles this once at startup.
pub struct AddDeps<'a, P: HostKeyPolicy> {
    pub allocator: &'a AllocatorRepository,
    pub pairs: &'a PairsRepository,
    pub manifests: &'a ManifestRepository,
    pub subdomain: &'a SubdomainClient,
    pub agent: &'a PairAgentClient<P>,
    pub delegation_sync: &'a SyncConnect,
    pub keydesk_address_sync: &'a SyncConnect,
    pub dns: &'a DnsConfig,
    pub dc: &'a DcIdentity,
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(deps, person), fields(brigade_id = %brigade_id))]
pub async fn add_brigade<P: HostKeyPolicy>(
    deps: &AddDeps<'_, P>,
    brigade_id: Uuid,
    brigadier: &str,
    person: &Person,
    dns_ipv4: Ipv4Addr,
    dns_ipv6: Ipv6Addr,
    forced_control_ip: Option<std::net::IpAddr>,
) -> Result<AddBrigadeOutcome, OrchestratorError> {
    // Step 1: allocate addresses and placement (spec §4.5), no domain yet.
    let (mut brigade, free_slots_active) = deps
        .allocator
        .allocate_brigade(brigade_id, brigadier, person, dns_ipv4, dns_ipv6, None, forced_control_ip)
        .await?;

    // Step 2: if the landed pair has no domain yet, acquire and bind one,
    // in its own transaction, separate from the allocation above.
    let pair = deps.pairs.get(brigade.pair_id).await?;
    if pair.domain_name.is_none() {
        if let Some(domain_name) = deps.subdomain.pick().await? {
            deps.pairs.bind_domain(brigade.pair_id, &domain_name).await?;
            brigade.domain_name = Some(domain_name);
        }
    } else {
        brigade.domain_name = pair.domain_name;
    }

    // Steps 3-4: republish both manifests, delegation first, so the new
    // keydesk address and (if bound) domain are visible before the brigade
    // is instantiated.
    realm_manifest::publish_delegation_manifest(deps.manifests, deps.agent, deps.delegation_sync, &deps.dc.id).await?;
    realm_manifest::publish_keydesk_address_manifest(deps.manifests, deps.agent, deps.keydesk_address_sync, &deps.dc.id)
        .await?;

    // Step 5: invoke the pair-agent's `create` on the brigade's own pair.
    let mutation = deps.allocator.fetch_for_mutation(brigade_id).await?;
    let command = create_command(&brigade);
    let output = deps.agent.invoke(mutation.control_ip, &command, None).await?;
    let decoded = output.dechunked_stdout()?;
    let configs: BrigadeConfig = serde_json::from_slice(&decoded)?;

    // Steps 6-7: wait for DNS to confirm the keydesk address (and, if a
    // domain was bound, the domain's delegation too) before declaring the
    // brigade usable.
    let kd_fqdn = keydesk_fqdn(brigade.keydesk_ipv6, &deps.dns.keydesk_domain);
    let domain_wait = brigade
        .domain_name
        .as_deref()
        .map(|d| (d, std::net::IpAddr::V4(brigade.endpoint_ipv4), deps.dns.domain_nameservers.as_slice()));
    let delegated = wait_for_all(
        &kd_fqdn,
        std::net::IpAddr::V6(brigade.keydesk_ipv6),
        &deps.dns.keydesk_nameservers,
        domain_wait,
    )
    .await?;
    if !delegated {
        return Err(OrchestratorError::NotDelegated);
    }

    // Step 8: report the new configs, keydesk address, and current
    // free-slot count for the pair the brigade landed on.
    Ok(AddBrigadeOutcome {
        configs,
        keydesk_ipv6: brigade.keydesk_ipv6,
        free_slots: free_slots_active,
    })
}

// [libs/infra/manifest/src/publisher.rs]
//! Atomic remote install of a manifest (spec §4.6): write under a `.tmp`
//! name, rename into place, then touch a reload sentinel — two SSH
//! sessions, not transactional across each other (spec's own note: if the
//! `mv` lands but `touch` fails, the DB is already the source of truth and
//! the next sync run reconciles).

use crate::errors::ManifestError;
use realm_config::SyncConnect;
use realm_pair_agent::PairAgentClient;
use std::net::IpAddr;
use tracing::instrument;

pub const DELEGATION_RELOAD_SENTINEL: &str = "domain-generate.reload";
pub const KEYDESK_ADDRESS_RELOAD_SENTINEL: &str = "vpn-works-keydesks.reload";

pub fn delegation_filename(dc_id: &str) -> String {
    format!("domain-generate-{dc_id}.csv")
}

pub fn keydesk_address_filename(dc_id: &str) -> String {
    format!("vpn-works-{dc_id}.csv")
}

/// Resolves a sync-host connect string to the address the pair-agent
/// transport dials; `SyncConnect::host` may be a literal or a DNS name.
pub async fn resolve_host(sync: &SyncConnect) -> Result<IpAddr, ManifestError> {
    if let Ok(addr) = sync.host.parse::<IpAddr>() {
        return Ok(addr);
    }

    tokio::net::lookup_host((sync.host.as_str(), sync.port))
        .await
        .map_err(|e| ManifestError::Resolve(sync.host.clone(), e.to_string()))?
        .next()
        .map(|socket_addr| socket_addr.ip())
        .ok_or_else(|| ManifestError::NoAddress(sync.host.clone()))
}

#[instrument(skip(agent, content), fields(filename, host = %host))]
pub async fn publish<P: realm_pair_agent::HostKeyPolicy>(
    agent: &PairAgentClient<P>,
    host: IpAddr,
    filename: &str,
    reload_sentinel: &str,
    content: &[u8],
) -> Result<(), ManifestError> {
    let write_cmd = format!("dd status=none of={filename}.tmp && mv -f {filename}.tmp {filename}");
    let write_out = agent.invoke(host, &write_cmd, Some(content)).await?;
    if let Some(status) = write_out.exit_status {
        if status != 0 {
            return Err(ManifestError::WriteFailed(status));
        }
    }

    let reload_cmd = format!("touch {reload_sentinel}");
    let reload_out = agent.invoke(host, &reload_cmd, None).await?;
    if let Some(status) = reload_out.exit_status {
        if status != 0 {
            return Err(ManifestError::ReloadFailed(status));
        }
    }

    tracing::info!(filename, "manifest published");
    Ok(())
}

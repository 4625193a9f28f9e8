// [libs/infra/dns-presence/src/wait.rs]
//! Propagation waiters (spec §4.4, §5): poll until confirmed or a 120 s
//! deadline elapses. Negative answers during the wait (including
//! terminal rcodes from `check_presence`, expected while a record has not
//! propagated yet) are treated as "not yet" rather than aborting the wait;
//! only a malformed nameserver entry fails fast.

use crate::errors::DnsError;
use crate::resolver::check_presence;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::instrument;

pub const WAIT_DEADLINE: Duration = Duration::from_secs(120);
pub const INITIAL_DELAY: Duration = Duration::from_secs(1);
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls `check_presence` until it confirms the record or `WAIT_DEADLINE`
/// elapses. Returns `Ok(false)` on timeout, not an error (spec scenario 4:
/// a delegation timeout is a normal terminal outcome for the caller).
#[instrument(skip(nameservers), fields(fqdn = %fqdn))]
pub async fn wait_for_delegation(fqdn: &str, ip: IpAddr, nameservers: &[String]) -> Result<bool, DnsError> {
    let deadline = Instant::now() + WAIT_DEADLINE;
    tokio::time::sleep(INITIAL_DELAY).await;

    loop {
        match check_presence(fqdn, ip, nameservers).await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(DnsError::InvalidNameserver(entry, reason)) => {
                return Err(DnsError::InvalidNameserver(entry, reason));
            }
            Err(e) => {
                tracing::debug!(error = %e, "presence check not yet confirmed");
            }
        }

        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Waits for the keydesk FQDN (always) and, if supplied, the domain FQDN,
/// in parallel; the overall result is their logical AND. Cancellation is
/// not propagated to either sub-task: each always runs to completion or
/// its own deadline.
pub async fn wait_for_all(
    keydesk_fqdn: &str,
    kd_ip: IpAddr,
    kd_nameservers: &[String],
    domain: Option<(&str, IpAddr, &[String])>,
) -> Result<bool, DnsError> {
    let keydesk_fut = wait_for_delegation(keydesk_fqdn, kd_ip, kd_nameservers);

    match domain {
        Some((domain_fqdn, ep_ip, domain_nameservers)) => {
            let domain_fut = wait_for_delegation(domain_fqdn, ep_ip, domain_nameservers);
            let (keydesk_ok, domain_ok) = tokio::join!(keydesk_fut, domain_fut);
            Ok(keydesk_ok? && domain_ok?)
        }
        None => keydesk_fut.await,
    }
}

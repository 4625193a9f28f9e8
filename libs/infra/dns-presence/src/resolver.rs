// [libs/infra/dns-presence/src/resolver.rs]
//! Single-nameserver presence check (spec §4.4), grounded on the original
//! implementation's retry/rcode semantics: retry only on transport error or
//! `REFUSED`; any other negative rcode is terminal; a clean answer without
//! the expected record is a plain negative, not an error.

use crate::errors::DnsError;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::rdata::{A, AAAA};
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use std::net::{IpAddr, SocketAddr};
use tracing::instrument;

const MAX_DNS_RETRIES: u32 = 3;

fn parse_nameserver(entry: &str) -> Result<SocketAddr, DnsError> {
    if entry.contains(':') && entry.rsplit_once(':').is_some_and(|(_, p)| p.parse::<u16>().is_ok()) {
        entry
            .parse()
            .map_err(|e: std::net::AddrParseError| DnsError::InvalidNameserver(entry.to_string(), e.to_string()))
    } else {
        format!("{entry}:53")
            .parse()
            .map_err(|e: std::net::AddrParseError| DnsError::InvalidNameserver(entry.to_string(), e.to_string()))
    }
}

fn single_nameserver_resolver(addr: SocketAddr) -> TokioAsyncResolver {
    let group = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
    let config = ResolverConfig::from_parts(None, vec![], group);
    let mut opts = ResolverOpts::default();
    opts.attempts = 1;
    opts.use_hosts_file = false;
    TokioAsyncResolver::tokio(config, opts)
}

/// Queries `fqdn` for `expected_ip`'s address family against every
/// nameserver in turn; returns `Ok(true)` only if every one confirms it.
#[instrument(skip(nameservers), fields(fqdn = %fqdn))]
pub async fn check_presence(fqdn: &str, expected_ip: IpAddr, nameservers: &[String]) -> Result<bool, DnsError> {
    let fqdn = if fqdn.ends_with('.') { fqdn.to_string() } else { format!("{fqdn}.") };

    for entry in nameservers {
        let socket_addr = parse_nameserver(entry)?;
        let resolver = single_nameserver_resolver(socket_addr);

        let mut attempt = 0;
        let confirmed = loop {
            attempt += 1;
            let outcome = match expected_ip {
                IpAddr::V4(v4) => resolver
                    .ipv4_lookup(&fqdn)
                    .await
                    .map(|lookup| lookup.iter().any(|rdata: &A| rdata.0 == v4)),
                IpAddr::V6(v6) => resolver
                    .ipv6_lookup(&fqdn)
                    .await
                    .map(|lookup| lookup.iter().any(|rdata: &AAAA| rdata.0 == v6)),
            };

            match outcome {
                Ok(found) => break found,
                Err(e) => match e.kind() {
                    ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                        let rcode = response_code.to_string();
                        if rcode.eq_ignore_ascii_case("refused") && attempt < MAX_DNS_RETRIES {
                            continue;
                        }
                        if rcode.eq_ignore_ascii_case("refused") {
                            return Err(DnsError::RetriesExceeded { nameserver: entry.clone(), attempts: attempt, source: e });
                        }
                        return Err(DnsError::NegativeRcode { nameserver: entry.clone(), rcode });
                    }
                    _ if attempt < MAX_DNS_RETRIES => continue,
                    _ => return Err(DnsError::RetriesExceeded { nameserver: entry.clone(), attempts: attempt, source: e }),
                },
            }
        };

        if !confirmed {
            tracing::debug!(nameserver = %entry, "record not confirmed");
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_default_port() {
        let addr = parse_nameserver("198.51.100.10").unwrap();
        assert_eq!(addr.port(), 53);
    }

    #[test]
    fn keeps_explicit_port() {
        let addr = parse_nameserver("198.51.100.10:5353").unwrap();
        assert_eq!(addr.port(), 5353);
    }

    #[test]
    fn rejects_garbage_nameserver() {
        assert!(parse_nameserver("not-an-ip").is_err());
    }
}

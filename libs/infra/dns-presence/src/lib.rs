// [libs/infra/dns-presence/src/lib.rs]
/*!
 * DNS propagation gate (spec §4.4): per-nameserver presence checks with
 * retry-on-REFUSED, and a bounded poll loop that certifies a brigade's
 * keydesk (and optional domain) name before activation.
 */

pub mod errors;
pub mod fqdn;
pub mod resolver;
pub mod wait;

pub use errors::DnsError;
pub use fqdn::keydesk_fqdn;
pub use resolver::check_presence;
pub use wait::{wait_for_all, wait_for_delegation, INITIAL_DELAY, POLL_INTERVAL, WAIT_DEADLINE};

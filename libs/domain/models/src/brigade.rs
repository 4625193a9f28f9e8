// [libs/domain/models/src/brigade.rs]
use crate::person::Person;
use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// A tenant unit: the aggregate the control plane allocates, instantiates,
/// re-credentials, and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brigade {
    pub brigade_id: Uuid,
    pub pair_id: Uuid,
    pub brigadier: String,
    pub person: Person,
    pub endpoint_ipv4: Ipv4Addr,
    pub domain_name: Option<String>,
    pub dns_ipv4: Ipv4Addr,
    pub dns_ipv6: Ipv6Addr,
    pub keydesk_ipv6: Ipv6Addr,
    pub ipv4_cgnat: Ipv4Net,
    pub ipv4_cgnat_first: Ipv4Addr,
    pub ipv6_ula: Ipv6Net,
    pub ipv6_ula_first: Ipv6Addr,
}

/// Result of a successful `allocate_brigade` transaction: the newly
/// assigned addresses and the pair it landed on, before the pair-agent has
/// been invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedBrigade {
    pub brigade: Brigade,
    pub free_slots_active: i64,
}

/// The brigade configuration object returned by the pair-agent's `create`
/// and `replace` commands, parsed from chunked JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrigadeConfig {
    pub wg: Option<String>,
    pub ovc: Option<String>,
    pub ipsec: Option<String>,
    pub outline: Option<String>,
}

/// Envelope returned to CLI callers after a successful add: the parsed
/// brigade config plus the keydesk address and the post-allocation
/// free-slot count, per spec §4.7 step 8.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBrigadeOutcome {
    pub configs: BrigadeConfig,
    pub keydesk_ipv6: Ipv6Addr,
    pub free_slots: i64,
}

// [libs/domain/models/src/manifest.rs]
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// One row of the delegation manifest: `domain_name;endpoint_ipv4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRow {
    pub domain_name: String,
    pub endpoint_ipv4: Ipv4Addr,
}

/// One row of the keydesk-address manifest: `endpoint_ipv4;keydesk_ipv6`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeydeskAddressRow {
    pub endpoint_ipv4: Ipv4Addr,
    pub keydesk_ipv6: Ipv6Addr,
}

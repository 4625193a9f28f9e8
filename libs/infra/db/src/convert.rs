// [libs/infra/db/src/convert.rs]
//! `ipnet`/`std::net` <-> `ipnetwork` boundary conversions. The domain model
//! and `realm-addr-math` speak `ipnet`; sqlx's postgres `inet`/`cidr` decode
//! speaks `ipnetwork`.

use crate::errors::DbError;
use ipnet::{Ipv4Net, Ipv6Net};
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub fn addr_to_sql(addr: IpAddr) -> IpNetwork {
    IpNetwork::from(addr)
}

pub fn v4_to_sql(addr: Ipv4Addr) -> IpNetwork {
    IpNetwork::V4(Ipv4Network::from(addr))
}

pub fn v6_to_sql(addr: Ipv6Addr) -> IpNetwork {
    IpNetwork::V6(Ipv6Network::from(addr))
}

pub fn net4_to_sql(net: Ipv4Net) -> IpNetwork {
    IpNetwork::V4(Ipv4Network::new(net.network(), net.prefix_len()).expect("ipnet prefix is always valid"))
}

pub fn net6_to_sql(net: Ipv6Net) -> IpNetwork {
    IpNetwork::V6(Ipv6Network::new(net.network(), net.prefix_len()).expect("ipnet prefix is always valid"))
}

pub fn sql_to_addr(n: IpNetwork) -> IpAddr {
    n.ip()
}

pub fn sql_to_v4(n: IpNetwork) -> Result<Ipv4Addr, DbError> {
    match n.ip() {
        IpAddr::V4(a) => Ok(a),
        IpAddr::V6(_) => Err(DbError::AddressFamilyMismatch(4)),
    }
}

pub fn sql_to_v6(n: IpNetwork) -> Result<Ipv6Addr, DbError> {
    match n.ip() {
        IpAddr::V6(a) => Ok(a),
        IpAddr::V4(_) => Err(DbError::AddressFamilyMismatch(6)),
    }
}

pub fn sql_to_net4(n: IpNetwork) -> Result<Ipv4Net, DbError> {
    match n {
        IpNetwork::V4(v4) => Ok(Ipv4Net::new(v4.network(), v4.prefix())
            .map_err(|_| DbError::AddressFamilyMismatch(4))?
            .trunc()),
        IpNetwork::V6(_) => Err(DbError::AddressFamilyMismatch(4)),
    }
}

pub fn sql_to_net6(n: IpNetwork) -> Result<Ipv6Net, DbError> {
    match n {
        IpNetwork::V6(v6) => Ok(Ipv6Net::new(v6.network(), v6.prefix())
            .map_err(|_| DbError::AddressFamilyMismatch(6))?
            .trunc()),
        IpNetwork::V4(_) => Err(DbError::AddressFamilyMismatch(6)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_v4_net() {
        let net = Ipv4Net::from_str("100.64.5.0/24").unwrap();
        let sql = net4_to_sql(net);
        assert_eq!(sql_to_net4(sql).unwrap(), net);
    }

    #[test]
    fn round_trips_v6_addr() {
        let addr = Ipv6Addr::from_str("fd00:dead::1").unwrap();
        let sql = v6_to_sql(addr);
        assert_eq!(sql_to_v6(sql).unwrap(), addr);
    }

    #[test]
    fn rejects_wrong_family() {
        let sql = v4_to_sql(Ipv4Addr::new(198, 51, 100, 10));
        assert!(sql_to_v6(sql).is_err());
    }
}

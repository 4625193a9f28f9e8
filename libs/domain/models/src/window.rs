// [libs/domain/models/src/window.rs]
use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weighted supernet row from `ipv4_cgnat_nets_weight`: CGNAT windows are
/// picked by heaviest weight, ties broken by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CgnatWindow {
    pub window_id: Uuid,
    pub net: Ipv4Net,
    pub weight: i64,
}

/// A weighted supernet row from `ipv6_ula_nets_iweight` /
/// `ipv6_keydesk_nets_iweight`: ULA/keydesk windows are picked by lowest
/// inverse-weight, ties broken by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6Window {
    pub window_id: Uuid,
    pub net: Ipv6Net,
    pub iweight: i64,
}

pub fn pick_heaviest(mut windows: Vec<CgnatWindow>) -> Option<CgnatWindow> {
    windows.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.window_id.cmp(&b.window_id)));
    windows.into_iter().next()
}

pub fn pick_lowest_iweight(mut windows: Vec<Ipv6Window>) -> Option<Ipv6Window> {
    windows.sort_by(|a, b| a.iweight.cmp(&b.iweight).then(a.window_id.cmp(&b.window_id)));
    windows.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn cgnat(id: u128, net: &str, weight: i64) -> CgnatWindow {
        CgnatWindow {
            window_id: Uuid::from_u128(id),
            net: Ipv4Net::from_str(net).unwrap(),
            weight,
        }
    }

    #[test]
    fn heaviest_wins_ties_ascending_id() {
        let picked = pick_heaviest(vec![
            cgnat(2, "100.64.0.0/16", 5),
            cgnat(1, "100.65.0.0/16", 5),
            cgnat(3, "100.66.0.0/16", 1),
        ])
        .unwrap();
        assert_eq!(picked.window_id, Uuid::from_u128(1));
    }

    fn ula(id: u128, net: &str, iweight: i64) -> Ipv6Window {
        Ipv6Window {
            window_id: Uuid::from_u128(id),
            net: Ipv6Net::from_str(net).unwrap(),
            iweight,
        }
    }

    #[test]
    fn lowest_iweight_wins_ties_ascending_id() {
        let picked = pick_lowest_iweight(vec![
            ula(3, "fd00:2::/48", 2),
            ula(1, "fd00:1::/48", 1),
            ula(2, "fd00:0::/48", 1),
        ])
        .unwrap();
        assert_eq!(picked.window_id, Uuid::from_u128(2));
    }
}

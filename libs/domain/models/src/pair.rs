// [libs/domain/models/src/pair.rs]
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::net::Ipv4Addr;
use uuid::Uuid;

/// A data-center placement target: a pair of VPN nodes acting as one
/// administrative unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub pair_id: Uuid,
    /// Management SSH address — either v4 or v6.
    pub control_ip: IpAddr,
    pub endpoint_ipv4: Ipv4Addr,
    pub is_active: bool,
    pub domain_name: Option<String>,
}

/// A row of `brigades.active_pairs` / `brigades.slots`: free capacity for
/// one pair, used to pick the least-used active pair at allocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSlots {
    pub pair_id: Uuid,
    pub free_slots_count: i64,
}

/// The allocator's pair-selection candidate: a pair plus the fields needed
/// to break selection ties (spec §9: domain-presence first, then
/// descending identifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCandidate {
    pub pair_id: Uuid,
    pub control_ip: IpAddr,
    pub endpoint_ipv4: Ipv4Addr,
    pub domain_name: Option<String>,
    pub free_slots_count: i64,
}

impl PairCandidate {
    /// Orders candidates so the *best* pick sorts first: highest free-slot
    /// count; ties broken by non-null domain name, then descending id.
    pub fn selection_key(&self) -> (i64, bool, Uuid) {
        (self.free_slots_count, self.domain_name.is_some(), self.pair_id)
    }

    pub fn pick_best(mut candidates: Vec<PairCandidate>) -> Option<PairCandidate> {
        candidates.sort_by(|a, b| b.selection_key().cmp(&a.selection_key()));
        candidates.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u128, slots: i64, domain: Option<&str>) -> PairCandidate {
        PairCandidate {
            pair_id: Uuid::from_u128(id),
            control_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            endpoint_ipv4: Ipv4Addr::new(198, 51, 100, 10),
            domain_name: domain.map(str::to_string),
            free_slots_count: slots,
        }
    }

    #[test]
    fn picks_highest_free_slots() {
        let best = PairCandidate::pick_best(vec![candidate(1, 3, None), candidate(2, 9, None)]).unwrap();
        assert_eq!(best.pair_id, Uuid::from_u128(2));
    }

    #[test]
    fn ties_prefer_domain_then_descending_id() {
        let best = PairCandidate::pick_best(vec![
            candidate(1, 5, None),
            candidate(2, 5, Some("abc.example.")),
            candidate(3, 5, None),
        ])
        .unwrap();
        assert_eq!(best.pair_id, Uuid::from_u128(2));

        let best = PairCandidate::pick_best(vec![candidate(1, 5, None), candidate(3, 5, None)]).unwrap();
        assert_eq!(best.pair_id, Uuid::from_u128(3));
    }
}

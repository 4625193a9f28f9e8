// [libs/core/addr-math/src/lib.rs]
//! Address arithmetic for brigade resource allocation.
//!
//! Exposes a small per-address-family capability set — random in-prefix
//! sampling, last-address detection, zero-ending rejection — shared by the
//! allocator store's CGNAT, ULA, and keydesk candidate selection.

use ipnet::{Ipv4Net, Ipv6Net};
use rand::Rng;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Per-family operations needed by the allocator. Implemented once per
/// address family rather than branching on `IpAddr` throughout the caller.
pub trait AddressFamily {
    type Addr: Copy + Eq;
    type Net: Copy;

    /// Uniformly random host address inside `net` (at least 32 bits of
    /// entropy drawn per call).
    fn random(net: Self::Net, rng: &mut impl Rng) -> Self::Addr;

    /// Network (first) address of `net`.
    fn network(net: Self::Net) -> Self::Addr;

    /// Broadcast/last address of `net`.
    fn last(net: Self::Net) -> Self::Addr;

    /// True if the address's low 16 bits are all zero.
    fn is_zero_ending(addr: Self::Addr) -> bool;
}

pub struct V4;
pub struct V6;

impl AddressFamily for V4 {
    type Addr = Ipv4Addr;
    type Net = Ipv4Net;

    fn random(net: Ipv4Net, rng: &mut impl Rng) -> Ipv4Addr {
        let base = u32::from(net.network());
        let host_bits = 32 - net.prefix_len();
        let mask: u32 = if host_bits == 32 {
            u32::MAX
        } else {
            (1u32 << host_bits) - 1
        };
        let offset: u32 = rng.gen::<u32>() & mask;
        Ipv4Addr::from(base | offset)
    }

    fn network(net: Ipv4Net) -> Ipv4Addr {
        net.network()
    }

    fn last(net: Ipv4Net) -> Ipv4Addr {
        net.broadcast()
    }

    fn is_zero_ending(addr: Ipv4Addr) -> bool {
        u32::from(addr) & 0xFFFF == 0
    }
}

impl AddressFamily for V6 {
    type Addr = Ipv6Addr;
    type Net = Ipv6Net;

    fn random(net: Ipv6Net, rng: &mut impl Rng) -> Ipv6Addr {
        let base = u128::from(net.network());
        let host_bits = 128 - net.prefix_len();
        let mask: u128 = if host_bits == 128 {
            u128::MAX
        } else {
            (1u128 << host_bits) - 1
        };
        // rng.gen::<u128>() exists via two u64 draws; assemble explicitly to
        // guarantee at least 32 bits of entropy regardless of host_bits.
        let hi: u64 = rng.gen();
        let lo: u64 = rng.gen();
        let offset: u128 = (((hi as u128) << 64) | lo as u128) & mask;
        Ipv6Addr::from(base | offset)
    }

    fn network(net: Ipv6Net) -> Ipv6Addr {
        net.network()
    }

    fn last(net: Ipv6Net) -> Ipv6Addr {
        net.broadcast()
    }

    fn is_zero_ending(addr: Ipv6Addr) -> bool {
        u128::from(addr) & 0xFFFF == 0
    }
}

/// Standalone helpers mirroring the spec's free functions, for callers that
/// don't want to go through the trait (CLI diagnostics, tests).
pub fn random_v4(prefix: Ipv4Net) -> Ipv4Addr {
    V4::random(prefix, &mut rand::thread_rng())
}

pub fn random_v6(prefix: Ipv6Net) -> Ipv6Addr {
    V6::random(prefix, &mut rand::thread_rng())
}

pub fn last_v4(prefix: Ipv4Net) -> Ipv4Addr {
    V4::last(prefix)
}

pub fn last_v6(prefix: Ipv6Net) -> Ipv6Addr {
    V6::last(prefix)
}

pub fn is_zero_ending_v4(addr: Ipv4Addr) -> bool {
    V4::is_zero_ending(addr)
}

pub fn is_zero_ending_v6(addr: Ipv6Addr) -> bool {
    V6::is_zero_ending(addr)
}

/// Bounded sampling loop: draws host addresses from `window` until one
/// clears `accept`, or gives up after `max_attempts`. Shared by the CGNAT,
/// ULA, and keydesk candidate pickers in the allocator store.
pub fn sample_until<F, R>(
    max_attempts: usize,
    mut draw: impl FnMut(&mut R) -> F,
    mut accept: impl FnMut(&F) -> bool,
    rng: &mut R,
) -> Option<F> {
    for _ in 0..max_attempts {
        let candidate = draw(rng);
        if accept(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// CGNAT candidate acceptance: not zero-ending, not the /24's network or
/// broadcast address, not already used.
pub fn accept_cgnat_candidate(
    candidate: Ipv4Addr,
    wrapping_net: Ipv4Net,
    used_networks: &std::collections::HashSet<Ipv4Net>,
) -> bool {
    if V4::is_zero_ending(candidate) {
        return false;
    }
    if candidate == wrapping_net.network() || candidate == wrapping_net.broadcast() {
        return false;
    }
    !used_networks.contains(&wrapping_net)
}

/// ULA candidate acceptance: not the /64's network or broadcast address,
/// not already used. Zero-ending does not apply to ULA candidates.
pub fn accept_ula_candidate(
    candidate: Ipv6Addr,
    wrapping_net: Ipv6Net,
    used_networks: &std::collections::HashSet<Ipv6Net>,
) -> bool {
    if candidate == wrapping_net.network() || candidate == wrapping_net.broadcast() {
        return false;
    }
    !used_networks.contains(&wrapping_net)
}

/// Keydesk candidate acceptance: not zero-ending, not already used.
pub fn accept_keydesk_candidate(
    candidate: Ipv6Addr,
    used_addrs: &std::collections::HashSet<Ipv6Addr>,
) -> bool {
    !V6::is_zero_ending(candidate) && !used_addrs.contains(&candidate)
}

/// Truncates a sampled host address down to its enclosing supernet at
/// `new_prefix_len`, e.g. a /16-window host address down to its /24.
pub fn enclosing_v4_net(addr: Ipv4Addr, new_prefix_len: u8) -> Result<Ipv4Net, ipnet::PrefixLenError> {
    Ipv4Net::new(addr, new_prefix_len).map(|n| n.trunc())
}

pub fn enclosing_v6_net(addr: Ipv6Addr, new_prefix_len: u8) -> Result<Ipv6Net, ipnet::PrefixLenError> {
    Ipv6Net::new(addr, new_prefix_len).map(|n| n.trunc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn random_v4_stays_in_prefix() {
        let net = Ipv4Net::from_str("100.64.0.0/16").unwrap();
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let addr = V4::random(net, &mut rng);
            assert!(net.contains(&addr));
        }
    }

    #[test]
    fn random_v6_stays_in_prefix() {
        let net = Ipv6Net::from_str("fd00::/48").unwrap();
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let addr = V6::random(net, &mut rng);
            assert!(net.contains(&addr));
        }
    }

    #[test]
    fn last_v4_is_broadcast() {
        let net = Ipv4Net::from_str("192.0.2.0/24").unwrap();
        assert_eq!(last_v4(net), Ipv4Addr::new(192, 0, 2, 255));
    }

    #[test]
    fn zero_ending_rejects_low_16_zero() {
        assert!(is_zero_ending_v4(Ipv4Addr::new(100, 64, 5, 0)));
        assert!(!is_zero_ending_v4(Ipv4Addr::new(100, 64, 5, 1)));
        assert!(is_zero_ending_v6(Ipv6Addr::from_str("fd00::1:0").unwrap()));
        assert!(!is_zero_ending_v6(Ipv6Addr::from_str("fd00::1:1").unwrap()));
    }

    #[test]
    fn cgnat_candidate_rejects_network_and_broadcast() {
        let wrap = Ipv4Net::from_str("100.64.5.0/24").unwrap();
        let used = HashSet::new();
        assert!(!accept_cgnat_candidate(wrap.network(), wrap, &used));
        assert!(!accept_cgnat_candidate(wrap.broadcast(), wrap, &used));
        assert!(accept_cgnat_candidate(Ipv4Addr::new(100, 64, 5, 10), wrap, &used));
    }

    #[test]
    fn cgnat_candidate_rejects_already_used_network() {
        let wrap = Ipv4Net::from_str("100.64.5.0/24").unwrap();
        let mut used = HashSet::new();
        used.insert(wrap);
        assert!(!accept_cgnat_candidate(Ipv4Addr::new(100, 64, 5, 10), wrap, &used));
    }

    #[test]
    fn enclosing_v4_net_truncates() {
        let addr = Ipv4Addr::new(100, 64, 5, 37);
        let net = enclosing_v4_net(addr, 24).unwrap();
        assert_eq!(net, Ipv4Net::from_str("100.64.5.0/24").unwrap());
    }

    proptest::proptest! {
        #[test]
        fn random_v4_never_escapes_window(a in 0u8..=255, b in 0u8..=255) {
            let net = Ipv4Net::new(Ipv4Addr::new(10, a, b, 0), 24).unwrap().trunc();
            let mut rng = rand::thread_rng();
            let addr = V4::random(net, &mut rng);
            prop_assert!(net.contains(&addr));
        }
    }
}

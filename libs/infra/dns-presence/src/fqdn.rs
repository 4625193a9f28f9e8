// [libs/infra/dns-presence/src/fqdn.rs]
//! Keydesk FQDN derivation (spec §4.4): the first two characters of the
//! IPv6 literal (always hex digits, since keydesk addresses are sampled to
//! reject the zero-ending case) collapse into a single `w`, every `:`
//! becomes `s`, and the configured zone suffix is appended. Mirrors
//! `examples/original_source/tools/cmd/dns-chk/main.go`'s
//! `strings.Replace(*ipstr, (*ipstr)[:2], "w", 1)` (and its inverse in
//! `tools/cmd/dns-srv/main.go`) — a collapse, not a one-for-one swap, so the
//! output is one character shorter than the input literal.

use std::net::Ipv6Addr;

pub fn keydesk_fqdn(addr: Ipv6Addr, zone_suffix: &str) -> String {
    let literal = addr.to_string();
    let rest: String = literal
        .chars()
        .skip(2)
        .map(|c| if c == ':' { 's' } else { c })
        .collect();
    let mangled = format!("w{rest}");

    let zone = zone_suffix.trim_start_matches('.');
    format!("{mangled}.{zone}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_leading_digits_and_colons() {
        let addr: Ipv6Addr = "fd00:dead:beef::1".parse().unwrap();
        // Display compresses to "fd00:dead:beef::1"; the leading two chars
        // collapse into one `w`, every `:` becomes `s`.
        let fqdn = keydesk_fqdn(addr, "vpn.example.com");
        assert_eq!(fqdn, "w00sdeadsbeefss1.vpn.example.com");
    }

    #[test]
    fn strips_leading_dot_from_zone_suffix() {
        let addr: Ipv6Addr = "fd00:dead:beef::1".parse().unwrap();
        let fqdn = keydesk_fqdn(addr, ".vpn.example.com");
        assert!(fqdn.ends_with("vpn.example.com"));
        assert!(!fqdn.contains("..vpn"));
    }
}

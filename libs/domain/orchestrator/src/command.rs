// [libs/domain/orchestrator/src/command.rs]
//! Pair-agent CLI composition (spec §6, bit-exact). Base64 encoding of
//! free-text fields happens only at this boundary — the domain model keeps
//! plain UTF-8 (`realm_models::Person`'s own doc comment says as much).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use realm_models::ids::encode_brigade_id;
use realm_models::Brigade;
use uuid::Uuid;

fn b64(s: &str) -> String {
    STANDARD.encode(s.as_bytes())
}

/// `create -id <b32> -ep4 <v4> -int4 <cidr/24> -int6 <cidr/64> -dns4 <v4>
/// -dns6 <v6> -kd6 <v6> -name <b64> -person <b64> -desc <b64> -url <b64>
/// [-dn <domain>] -ch -j`
pub fn create_command(brigade: &Brigade) -> String {
    let mut cmd = format!(
        "create -id {id} -ep4 {ep4} -int4 {int4} -int6 {int6} -dns4 {dns4} -dns6 {dns6} -kd6 {kd6} \
         -name {name} -person {person} -desc {desc} -url {url}",
        id = encode_brigade_id(brigade.brigade_id),
        ep4 = brigade.endpoint_ipv4,
        int4 = brigade.ipv4_cgnat,
        int6 = brigade.ipv6_ula,
        dns4 = brigade.dns_ipv4,
        dns6 = brigade.dns_ipv6,
        kd6 = brigade.keydesk_ipv6,
        name = b64(&brigade.brigadier),
        person = b64(&brigade.person.name),
        desc = b64(&brigade.person.desc),
        url = b64(brigade.person.url.as_str()),
    );

    if let Some(domain) = &brigade.domain_name {
        cmd.push_str(&format!(" -dn {domain}"));
    }
    cmd.push_str(" -ch -j");
    cmd
}

/// `destroy -id <b32> -ch`
pub fn destroy_command(brigade_id: Uuid) -> String {
    format!("destroy -id {} -ch", encode_brigade_id(brigade_id))
}

/// Optional per-VPN-flavor config strings for `replace`.
#[derive(Debug, Clone, Default)]
pub struct ReplaceFlavors {
    pub wg: Option<String>,
    pub ovc: Option<String>,
    pub ipsec: Option<String>,
    pub outline: Option<String>,
}

/// `replace -id <b32> -ch -j [-wg <s>] [-ovc <s>] [-ipsec <s>] [-outline <s>]`
pub fn replace_command(brigade_id: Uuid, flavors: &ReplaceFlavors) -> String {
    let mut cmd = format!("replace -id {} -ch -j", encode_brigade_id(brigade_id));

    if let Some(v) = &flavors.wg {
        cmd.push_str(&format!(" -wg {v}"));
    }
    if let Some(v) = &flavors.ovc {
        cmd.push_str(&format!(" -ovc {v}"));
    }
    if let Some(v) = &flavors.ipsec {
        cmd.push_str(&format!(" -ipsec {v}"));
    }
    if let Some(v) = &flavors.outline {
        cmd.push_str(&format!(" -outline {v}"));
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_models::Person;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use url::Url;

    fn sample_brigade(domain: Option<&str>) -> Brigade {
        Brigade {
            brigade_id: Uuid::from_u128(1),
            pair_id: Uuid::from_u128(2),
            brigadier: "Alice".to_string(),
            person: Person::new("Albert", "Physicist", Url::parse("https://example.org/a").unwrap()),
            endpoint_ipv4: Ipv4Addr::new(198, 51, 100, 10),
            domain_name: domain.map(str::to_string),
            dns_ipv4: Ipv4Addr::new(1, 1, 1, 1),
            dns_ipv6: "2606:4700:4700::1111".parse().unwrap(),
            keydesk_ipv6: "fd00:dead::1".parse().unwrap(),
            ipv4_cgnat: "100.64.1.0/24".parse().unwrap(),
            ipv4_cgnat_first: Ipv4Addr::new(100, 64, 1, 5),
            ipv6_ula: "fd00:0:1::/64".parse().unwrap(),
            ipv6_ula_first: "fd00:0:1::5".parse::<Ipv6Addr>().unwrap(),
        }
    }

    #[test]
    fn create_command_omits_dn_without_domain() {
        let cmd = create_command(&sample_brigade(None));
        assert!(cmd.starts_with("create -id "));
        assert!(!cmd.contains("-dn "));
        assert!(cmd.ends_with("-ch -j"));
        assert!(cmd.contains(&format!("-name {}", STANDARD.encode("Alice"))));
    }

    #[test]
    fn create_command_includes_dn_with_domain() {
        let cmd = create_command(&sample_brigade(Some("abc.example.")));
        assert!(cmd.contains("-dn abc.example."));
    }

    #[test]
    fn replace_command_includes_only_set_flavors() {
        let flavors = ReplaceFlavors { wg: Some("wgcfg".to_string()), ..Default::default() };
        let cmd = replace_command(Uuid::from_u128(5), &flavors);
        assert!(cmd.contains("-wg wgcfg"));
        assert!(!cmd.contains("-ovc"));
    }
}

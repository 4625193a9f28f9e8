// [libs/infra/db/src/queries.rs]
//! SQL text assembly. Table/view names are schema-qualified at runtime
//! (operator-configured, spec §6), so these are functions rather than the
//! `&'static str` constants a fixed-schema crate would use; the query shapes
//! themselves are otherwise static.

use crate::schema::SchemaNames;

pub fn lock_existing_brigades(names: &SchemaNames) -> String {
    format!(
        "SELECT keydesk_ipv6, ipv4_cgnat, ipv6_ula FROM {} FOR UPDATE",
        names.brigades_table()
    )
}

pub fn select_forced_pair(names: &SchemaNames) -> String {
    format!(
        "SELECT pair_id, control_ip, endpoint_ipv4, domain_name FROM {} WHERE control_ip = $1",
        names.pairs_table()
    )
}

pub fn select_active_pair_candidates(names: &SchemaNames) -> String {
    format!(
        "SELECT p.pair_id, p.control_ip, p.endpoint_ipv4, p.domain_name, s.free_slots_count
         FROM {} s JOIN {} p ON p.pair_id = s.pair_id",
        names.active_pairs_view(),
        names.pairs_table()
    )
}

pub fn select_cgnat_windows(names: &SchemaNames) -> String {
    format!("SELECT window_id, net, weight FROM {}", names.cgnat_windows_table())
}

pub fn select_ula_windows(names: &SchemaNames) -> String {
    format!("SELECT window_id, net, iweight FROM {}", names.ula_windows_table())
}

pub fn select_keydesk_windows(names: &SchemaNames) -> String {
    format!("SELECT window_id, net, iweight FROM {}", names.keydesk_windows_table())
}

pub fn insert_brigade(names: &SchemaNames) -> String {
    format!(
        "INSERT INTO {} (
            brigade_id, pair_id, brigadier, person, endpoint_ipv4, domain_name,
            dns_ipv4, dns_ipv6, keydesk_ipv6, ipv4_cgnat, ipv4_cgnat_first, ipv6_ula, ipv6_ula_first
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        names.brigades_table()
    )
}

pub fn insert_stats_row(names: &SchemaNames) -> String {
    format!("INSERT INTO {} (brigade_id) VALUES ($1)", names.brigades_stats_table())
}

pub fn insert_domain_binding(names: &SchemaNames) -> String {
    format!(
        "INSERT INTO {} (domain_name, endpoint_ipv4) VALUES ($1, $2)
         ON CONFLICT (domain_name) DO UPDATE SET endpoint_ipv4 = EXCLUDED.endpoint_ipv4",
        names.domains_table()
    )
}

pub fn delete_domain_binding(names: &SchemaNames) -> String {
    format!("DELETE FROM {} WHERE domain_name = $1", names.domains_table())
}

pub fn select_pair_free_slots(names: &SchemaNames) -> String {
    format!("SELECT free_slots_count FROM {} WHERE pair_id = $1", names.slots_view())
}

pub fn select_total_free_slots(names: &SchemaNames, active_only: bool) -> String {
    let view = if active_only { names.active_pairs_view() } else { names.slots_view() };
    format!("SELECT COALESCE(SUM(free_slots_count), 0) FROM {}", view)
}

pub fn select_brigade_for_mutation(names: &SchemaNames) -> String {
    format!(
        "SELECT brigade_id, pair_id, brigadier, person, endpoint_ipv4, domain_name,
                dns_ipv4, dns_ipv6, keydesk_ipv6, ipv4_cgnat, ipv4_cgnat_first, ipv6_ula, ipv6_ula_first, control_ip
         FROM {} WHERE brigade_id = $1 FOR UPDATE",
        names.meta_brigades_view()
    )
}

pub fn delete_brigade(names: &SchemaNames) -> String {
    format!("DELETE FROM {} WHERE brigade_id = $1", names.brigades_table())
}

pub fn select_delegation_rows(names: &SchemaNames) -> String {
    format!("SELECT domain_name, endpoint_ipv4 FROM {} ORDER BY domain_name", names.domains_table())
}

pub fn select_keydesk_address_rows(names: &SchemaNames) -> String {
    format!(
        "SELECT endpoint_ipv4, keydesk_ipv6 FROM {} ORDER BY keydesk_ipv6",
        names.brigades_table()
    )
}

pub fn update_pair_domain(names: &SchemaNames) -> String {
    format!("UPDATE {} SET domain_name = $1 WHERE pair_id = $2", names.pairs_table())
}

pub fn select_brigades_for_snapshot(names: &SchemaNames) -> String {
    format!(
        "SELECT brigade_id, pair_id, control_ip, endpoint_ipv4 FROM {} ORDER BY pair_id",
        names.meta_brigades_view()
    )
}

// [libs/infra/snapshot/src/command.rs]
//! `fetchsnaps` command-line composition (spec §6), grounded on
//! `examples/original_source/cmd/collectsnaps/collect.go`'s
//! `fetchSnapsBySSH`.

use realm_models::ids::encode_brigade_id;
use uuid::Uuid;

pub fn fetchsnaps_command(tag: &str, brigade_ids: &[Uuid], realm_fp: &str, stime: i64, maintenance_mode: bool) -> String {
    let ids = brigade_ids.iter().map(|id| encode_brigade_id(*id)).collect::<Vec<_>>().join(",");
    let mnt = if maintenance_mode { 1 } else { 0 };
    format!("fetchsnaps -tag {tag} -list {ids} -rfp {realm_fp} -stime {stime} -mnt {mnt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_ids_with_commas() {
        let ids = [Uuid::from_u128(1), Uuid::from_u128(2)];
        let cmd = fetchsnaps_command("2026-07-29", &ids, "fp123", 1_700_000_000, false);
        assert!(cmd.starts_with("fetchsnaps -tag 2026-07-29 -list "));
        assert!(cmd.contains(&format!("{},{}", encode_brigade_id(ids[0]), encode_brigade_id(ids[1]))));
        assert!(cmd.ends_with("-rfp fp123 -stime 1700000000 -mnt 0"));
    }

    #[test]
    fn maintenance_flag_is_one_when_set() {
        let cmd = fetchsnaps_command("t", &[], "fp", 0, true);
        assert!(cmd.ends_with("-mnt 1"));
    }
}

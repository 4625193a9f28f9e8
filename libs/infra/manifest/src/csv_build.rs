// [libs/infra/manifest/src/csv_build.rs]
//! Row encoding for the two sync manifests (spec §4.6/§6): semicolon
//! separated, no header row, grounded on the original
//! `NewDelegationList`/`NewKdAddrList` `%s;%s\n` formatting.

use crate::errors::ManifestError;
use realm_models::manifest::{DelegationRow, KeydeskAddressRow};

fn write_rows<T>(rows: &[T], to_record: impl Fn(&T) -> [String; 2]) -> Result<Vec<u8>, ManifestError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(to_record(row))?;
    }

    writer.flush().map_err(|e| ManifestError::Csv(e.into()))?;
    Ok(writer.into_inner().expect("in-memory writer never fails to unwrap"))
}

pub fn build_delegation_csv(rows: &[DelegationRow]) -> Result<Vec<u8>, ManifestError> {
    write_rows(rows, |row| [row.domain_name.clone(), row.endpoint_ipv4.to_string()])
}

pub fn build_keydesk_address_csv(rows: &[KeydeskAddressRow]) -> Result<Vec<u8>, ManifestError> {
    write_rows(rows, |row| [row.endpoint_ipv4.to_string(), row.keydesk_ipv6.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn delegation_row_is_semicolon_separated() {
        let rows = vec![DelegationRow {
            domain_name: "abc.example.".to_string(),
            endpoint_ipv4: Ipv4Addr::new(198, 51, 100, 10),
        }];
        let csv = build_delegation_csv(&rows).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "abc.example.;198.51.100.10\n");
    }

    #[test]
    fn keydesk_row_is_semicolon_separated() {
        let rows = vec![KeydeskAddressRow {
            endpoint_ipv4: Ipv4Addr::new(198, 51, 100, 10),
            keydesk_ipv6: Ipv6Addr::new(0xfd00, 0xdead, 0, 0, 0, 0, 0, 1),
        }];
        let csv = build_keydesk_address_csv(&rows).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "198.51.100.10;fd00:dead::1\n");
    }

    #[test]
    fn empty_rows_produce_empty_body() {
        let csv = build_delegation_csv(&[]).unwrap();
        assert!(csv.is_empty());
    }
}

// [libs/infra/db/src/schema.rs]
//! Schema-qualified table naming and idempotent DDL.
//!
//! `BRIGADES_SCHEMA` / `BRIGADES_STATS_SCHEMA` / `PAIRS_SCHEMA` are operator
//! configured (spec §6), so table references are assembled with `format!`
//! rather than baked into compile-time-checked queries. Names are validated
//! once at startup so nothing untrusted ever reaches the SQL text.

use crate::errors::DbError;

#[derive(Debug, Clone)]
pub struct SchemaNames {
    pub brigades: String,
    pub brigades_stats: String,
    pub pairs: String,
}

impl SchemaNames {
    pub fn new(brigades: impl Into<String>, brigades_stats: impl Into<String>, pairs: impl Into<String>) -> Result<Self, DbError> {
        let brigades = brigades.into();
        let brigades_stats = brigades_stats.into();
        let pairs = pairs.into();
        for ident in [&brigades, &brigades_stats, &pairs] {
            validate_identifier(ident)?;
        }
        Ok(Self { brigades, brigades_stats, pairs })
    }

    pub fn brigades_table(&self) -> String {
        format!("{}.brigades", self.brigades)
    }

    pub fn meta_brigades_view(&self) -> String {
        format!("{}.meta_brigades", self.brigades)
    }

    pub fn slots_view(&self) -> String {
        format!("{}.slots", self.brigades)
    }

    pub fn active_pairs_view(&self) -> String {
        format!("{}.active_pairs", self.brigades)
    }

    pub fn pairs_table(&self) -> String {
        format!("{}.pairs", self.pairs)
    }

    pub fn cgnat_windows_table(&self) -> String {
        format!("{}.ipv4_cgnat_nets_weight", self.brigades)
    }

    pub fn ula_windows_table(&self) -> String {
        format!("{}.ipv6_ula_nets_iweight", self.brigades)
    }

    pub fn keydesk_windows_table(&self) -> String {
        format!("{}.ipv6_keydesk_nets_iweight", self.brigades)
    }

    pub fn domains_table(&self) -> String {
        format!("{}.domains_endpoints_ipv4", self.brigades)
    }

    pub fn brigades_stats_table(&self) -> String {
        format!("{}.brigades_stats", self.brigades_stats)
    }
}

fn validate_identifier(ident: &str) -> Result<(), DbError> {
    let ok = !ident.is_empty()
        && ident.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(DbError::InvalidSchemaIdent(ident.to_string()))
    }
}

/// Applies the realm schema, idempotently. Intended for bootstrap/dev use;
/// production deployments are expected to run migrations out of band, but a
/// fresh `vgrealm` database must be able to start from nothing.
pub async fn ensure_schema(pool: &sqlx::PgPool, names: &SchemaNames) -> Result<(), DbError> {
    let statements = [
        format!("CREATE SCHEMA IF NOT EXISTS {}", names.pairs),
        format!("CREATE SCHEMA IF NOT EXISTS {}", names.brigades),
        format!("CREATE SCHEMA IF NOT EXISTS {}", names.brigades_stats),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                pair_id uuid PRIMARY KEY,
                control_ip inet NOT NULL UNIQUE,
                endpoint_ipv4 inet NOT NULL,
                is_active boolean NOT NULL DEFAULT true,
                domain_name text,
                capacity bigint NOT NULL DEFAULT 0
            )",
            names.pairs_table()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                brigade_id uuid PRIMARY KEY,
                pair_id uuid NOT NULL REFERENCES {} (pair_id),
                brigadier text NOT NULL,
                person jsonb NOT NULL,
                endpoint_ipv4 inet NOT NULL,
                domain_name text,
                dns_ipv4 inet NOT NULL,
                dns_ipv6 inet NOT NULL,
                keydesk_ipv6 inet NOT NULL UNIQUE,
                ipv4_cgnat cidr NOT NULL UNIQUE,
                ipv4_cgnat_first inet NOT NULL,
                ipv6_ula cidr NOT NULL UNIQUE,
                ipv6_ula_first inet NOT NULL,
                created_at timestamptz NOT NULL DEFAULT now()
            )",
            names.brigades_table(),
            names.pairs_table()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                brigade_id uuid PRIMARY KEY REFERENCES {} (brigade_id) ON DELETE CASCADE,
                bytes_tx bigint NOT NULL DEFAULT 0,
                bytes_rx bigint NOT NULL DEFAULT 0,
                last_seen timestamptz
            )",
            names.brigades_stats_table(),
            names.brigades_table()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                window_id uuid PRIMARY KEY,
                net cidr NOT NULL,
                weight bigint NOT NULL
            )",
            names.cgnat_windows_table()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                window_id uuid PRIMARY KEY,
                net cidr NOT NULL,
                iweight bigint NOT NULL
            )",
            names.ula_windows_table()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                window_id uuid PRIMARY KEY,
                net cidr NOT NULL,
                iweight bigint NOT NULL
            )",
            names.keydesk_windows_table()
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                domain_name text PRIMARY KEY,
                endpoint_ipv4 inet NOT NULL
            )",
            names.domains_table()
        ),
        format!(
            "CREATE OR REPLACE VIEW {} AS
                SELECT b.*, p.control_ip
                FROM {} b JOIN {} p ON b.pair_id = p.pair_id",
            names.meta_brigades_view(),
            names.brigades_table(),
            names.pairs_table()
        ),
        format!(
            "CREATE OR REPLACE VIEW {} AS
                SELECT p.pair_id, p.capacity - COUNT(b.brigade_id) AS free_slots_count
                FROM {} p LEFT JOIN {} b ON b.pair_id = p.pair_id
                GROUP BY p.pair_id, p.capacity",
            names.slots_view(),
            names.pairs_table(),
            names.brigades_table()
        ),
        format!(
            "CREATE OR REPLACE VIEW {} AS
                SELECT s.* FROM {} s
                JOIN {} p ON p.pair_id = s.pair_id
                WHERE p.is_active",
            names.active_pairs_view(),
            names.slots_view(),
            names.pairs_table()
        ),
    ];

    for stmt in statements {
        sqlx::query(&stmt).execute(pool).await.map_err(DbError::Query)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_alphanumeric_schema() {
        assert!(SchemaNames::new("brigades", "stats", "brigades; drop table x").is_err());
    }

    #[test]
    fn accepts_default_schema_names() {
        let names = SchemaNames::new("brigades", "stats", "brigades").unwrap();
        assert_eq!(names.brigades_table(), "brigades.brigades");
        assert_eq!(names.brigades_stats_table(), "stats.brigades_stats");
    }
}

// [libs/shared/realm-config/src/lib.rs]
/*!
 * Runtime configuration for the realm control plane binaries.
 *
 * Every binary shares one `RealmConfig::from_env()` entry point rather than
 * repeating `std::env::var` calls; cross-field validation (splitting a
 * `user@host:port` connect string, splitting a comma-separated nameserver
 * list, resolving the SSH key search order) lives here once.
 */

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DB_URL: &str = "postgresql:///vgrealm";
pub const NO_USE_TOKEN: &str = "no-use";
pub const SSH_KEY_FILENAME: &str = "id_ed25519";
/// Fixed remote SSH username for pair-agent invocations (not
/// operator-configurable upstream either).
pub const SSH_REMOTE_USERNAME: &str = "_serega_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("empty connect string in {0}")]
    EmptyConnString(&'static str),
    #[error("invalid connect string in {0}: {1}")]
    InvalidConnString(&'static str, String),
    #[error("invalid server port in {0}: {1}")]
    InvalidServerPort(&'static str, String),
    #[error("empty nameserver list in {0}")]
    EmptyNsList(&'static str),
    #[error("invalid nameserver entry in {0}: {1}")]
    InvalidNsEntry(&'static str, String),
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("no ssh key file found (checked explicit path, ~/.ssh, and search dir)")]
    NoSshKeyFile,
}

/// A parsed `user@host:port` sync-connect string (spec §6:
/// `DELEGATION_SYNC_CONNECT`, `KEYDESK_ADDRESS_SYNC_CONNECT`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConnect {
    pub user: String,
    pub host: String,
    pub port: u16,
}

impl SyncConnect {
    pub fn server(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_conn_env(var_name: &'static str, raw: &str) -> Result<SyncConnect, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::EmptyConnString(var_name));
    }

    let (user, server) = raw
        .split_once('@')
        .filter(|(u, s)| !u.is_empty() && !s.is_empty())
        .ok_or_else(|| ConfigError::InvalidConnString(var_name, raw.to_string()))?;

    let (host, port_str) = server
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidConnString(var_name, raw.to_string()))?;

    if host.is_empty() {
        return Err(ConfigError::InvalidConnString(var_name, raw.to_string()));
    }

    let port: u16 = port_str
        .parse()
        .map_err(|_| ConfigError::InvalidServerPort(var_name, port_str.to_string()))?;

    Ok(SyncConnect {
        user: user.to_string(),
        host: host.to_string(),
        port,
    })
}

/// Parses a comma-separated nameserver list (spec §6: `KEYDESK_NAMESERVERS`,
/// `DOMAIN_NAMESERVERS`).
pub fn parse_ns_env(var_name: &'static str, raw: &str) -> Result<Vec<String>, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::EmptyNsList(var_name));
    }

    raw.split(',')
        .map(|entry| {
            if entry.is_empty() {
                Err(ConfigError::InvalidNsEntry(var_name, entry.to_string()))
            } else {
                Ok(entry.to_string())
            }
        })
        .collect()
}

/// Resolves the SSH private key path per the documented search order: an
/// explicit path, then `~/.ssh/id_ed25519`, then `<search_dir>/id_ed25519`.
pub fn lookup_ssh_keyfile(explicit: Option<&str>, search_dir: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }

    let home_dir = dirs_home();
    for dir in [home_dir.map(|h| h.join(".ssh")), Some(search_dir.to_path_buf())]
        .into_iter()
        .flatten()
    {
        let candidate = dir.join(SSH_KEY_FILENAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(ConfigError::NoSshKeyFile)
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Identity of this realm node (spec §6: `DC_ID`, `DC_NAME`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcIdentity {
    pub id: String,
    pub name: String,
}

/// Full database wiring: connection URL plus the three configurable schema
/// names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub brigades_schema: String,
    pub brigades_stats_schema: String,
    pub pairs_schema: String,
}

/// Subdomain-issuer RPC wiring; `token == NO_USE_TOKEN` disables the RPC
/// entirely (spec §4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdomainConfig {
    pub api_server: String,
    pub api_token: String,
}

impl SubdomainConfig {
    pub fn is_disabled(&self) -> bool {
        self.api_token == NO_USE_TOKEN
    }
}

/// DNS-wait wiring: the keydesk zone suffix and the two nameserver sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsConfig {
    pub keydesk_domain: String,
    pub keydesk_nameservers: Vec<String>,
    pub domain_nameservers: Vec<String>,
}

/// Every environment-derived value a control-plane binary needs, assembled
/// once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmConfig {
    pub db: DbConfig,
    pub ssh_key_path: PathBuf,
    pub subdomain: SubdomainConfig,
    pub delegation_sync: SyncConnect,
    pub keydesk_address_sync: SyncConnect,
    pub dns: DnsConfig,
    pub dc: DcIdentity,
}

impl RealmConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &'static str, default: Option<&str>| -> Result<String, ConfigError> {
            match std::env::var(name) {
                Ok(v) if !v.is_empty() => Ok(v),
                _ => default
                    .map(str::to_string)
                    .ok_or(ConfigError::MissingVar(name)),
            }
        };

        let db = DbConfig {
            url: var("DB_URL", Some(DEFAULT_DB_URL))?,
            brigades_schema: var("BRIGADES_SCHEMA", Some("brigades"))?,
            brigades_stats_schema: var("BRIGADES_STATS_SCHEMA", Some("stats"))?,
            pairs_schema: var("PAIRS_SCHEMA", Some("brigades"))?,
        };

        let explicit_ssh_key = std::env::var("SSH_KEY").ok().filter(|s| !s.is_empty());
        let ssh_key_path = lookup_ssh_keyfile(explicit_ssh_key.as_deref(), Path::new("/etc/keydesk"))?;

        let subdomain = SubdomainConfig {
            api_server: var("SUBDOMAIN_API_SERVER", None)?,
            api_token: var("SUBDOMAIN_API_TOKEN", None)?,
        };

        let delegation_sync = parse_conn_env("DELEGATION_SYNC_CONNECT", &var("DELEGATION_SYNC_CONNECT", None)?)?;
        let keydesk_address_sync = parse_conn_env(
            "KEYDESK_ADDRESS_SYNC_CONNECT",
            &var("KEYDESK_ADDRESS_SYNC_CONNECT", None)?,
        )?;

        let dns = DnsConfig {
            keydesk_domain: var("KEYDESK_DOMAIN", None)?,
            keydesk_nameservers: parse_ns_env("KEYDESK_NAMESERVERS", &var("KEYDESK_NAMESERVERS", None)?)?,
            domain_nameservers: parse_ns_env("DOMAIN_NAMESERVERS", &var("DOMAIN_NAMESERVERS", None)?)?,
        };

        let dc = DcIdentity {
            id: var("DC_ID", None)?,
            name: var("DC_NAME", None)?,
        };

        Ok(Self {
            db,
            ssh_key_path,
            subdomain,
            delegation_sync,
            keydesk_address_sync,
            dns,
            dc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_conn_string() {
        let conn = parse_conn_env("TEST", "sync@sync-host.example:2222").unwrap();
        assert_eq!(conn.user, "sync");
        assert_eq!(conn.host, "sync-host.example");
        assert_eq!(conn.port, 2222);
        assert_eq!(conn.server(), "sync-host.example:2222");
    }

    #[test]
    fn rejects_missing_at_sign() {
        assert!(parse_conn_env("TEST", "sync-host.example:2222").is_err());
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(parse_conn_env("TEST", "sync@sync-host.example:ssh").is_err());
    }

    #[test]
    fn parses_ns_list() {
        let list = parse_ns_env("TEST", "1.1.1.1,8.8.8.8").unwrap();
        assert_eq!(list, vec!["1.1.1.1".to_string(), "8.8.8.8".to_string()]);
    }

    #[test]
    fn rejects_empty_ns_entry() {
        assert!(parse_ns_env("TEST", "1.1.1.1,,8.8.8.8").is_err());
    }

    #[test]
    fn explicit_ssh_key_wins() {
        let path = lookup_ssh_keyfile(Some("/custom/key"), Path::new("/etc/keydesk")).unwrap();
        assert_eq!(path, PathBuf::from("/custom/key"));
    }

    #[test]
    fn subdomain_no_use_token_disables() {
        let cfg = SubdomainConfig {
            api_server: "https://example".to_string(),
            api_token: NO_USE_TOKEN.to_string(),
        };
        assert!(cfg.is_disabled());
    }
}

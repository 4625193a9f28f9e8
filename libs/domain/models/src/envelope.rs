// [libs/domain/models/src/envelope.rs]
use crate::brigade::BrigadeConfig;
use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;

/// The single JSON envelope a CLI binary may emit instead of newline text,
/// per spec §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliEnvelope {
    pub code: i32,
    pub desc: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configs: Option<BrigadeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keydesk_ipv6: Option<Ipv6Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_slots: Option<i64>,
}

impl CliEnvelope {
    pub fn ok(desc: impl Into<String>) -> Self {
        Self {
            code: 0,
            desc: desc.into(),
            status: "ok".to_string(),
            configs: None,
            keydesk_ipv6: None,
            free_slots: None,
        }
    }

    pub fn error(code: i32, desc: impl Into<String>) -> Self {
        Self {
            code,
            desc: desc.into(),
            status: "error".to_string(),
            configs: None,
            keydesk_ipv6: None,
            free_slots: None,
        }
    }

    pub fn with_configs(mut self, configs: BrigadeConfig) -> Self {
        self.configs = Some(configs);
        self
    }

    pub fn with_keydesk(mut self, ipv6: Ipv6Addr) -> Self {
        self.keydesk_ipv6 = Some(ipv6);
        self
    }

    pub fn with_free_slots(mut self, slots: i64) -> Self {
        self.free_slots = Some(slots);
        self
    }
}

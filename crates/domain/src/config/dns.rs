use super::backend::BackendConfig;
use super::resolve_mode::ResolveMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DnsConfig {
    #[serde(default)]
    pub resolve_mode: ResolveMode,

    #[serde(default)]
    pub backends: Vec<BackendConfig>,

    /// Hosts-style file of literal answers that bypass the backends.
    #[serde(default)]
    pub override_file: Option<String>,

    /// I/O timeout for a single classic (UDP/TCP) exchange.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Timeout for a single DoH request, connect included.
    #[serde(default = "default_doh_timeout_ms")]
    pub doh_timeout_ms: u64,

    /// Cancel the remaining concurrent attempts once one backend has answered.
    #[serde(default)]
    pub cancel_losing_backends: bool,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            resolve_mode: ResolveMode::default(),
            backends: Vec::new(),
            override_file: None,
            query_timeout_ms: default_query_timeout_ms(),
            doh_timeout_ms: default_doh_timeout_ms(),
            cancel_losing_backends: false,
        }
    }
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_doh_timeout_ms() -> u64 {
    10_000
}

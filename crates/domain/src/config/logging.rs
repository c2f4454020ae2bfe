use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit `request`, `backend_result` and `first_result` audit events.
    /// `query_failure` events are written regardless.
    #[serde(default)]
    pub log_queries: bool,

    /// Audit log destination. Audit lines go to stderr when unset.
    #[serde(default)]
    pub audit_log: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_queries: false,
            audit_log: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

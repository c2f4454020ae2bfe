use serde::{Deserialize, Serialize};

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolve_mode::ResolveMode;
use super::server::ServerConfig;

const LOCAL_CONFIG_PATH: &str = "dnsforward.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dnsforward/config.toml";

/// Main configuration structure for dnsforward
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Backends and dispatch behaviour
    #[serde(default)]
    pub dns: DnsConfig,

    /// Process logging and audit trail
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsforward.toml in current directory
    /// 3. /etc/dnsforward/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen_addr {
            self.server.listen_addr = listen;
        }
        if let Some(mode) = overrides.resolve_mode {
            self.dns.resolve_mode = mode;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.log_queries {
            self.logging.log_queries = true;
        }
    }

    /// Validate configuration. Every configured backend must be usable and at
    /// least one must exist; there is no degraded start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen_addr.trim().is_empty() {
            return Err(ConfigError::Validation(
                "listen_addr cannot be empty".to_string(),
            ));
        }

        if self.dns.backends.is_empty() {
            return Err(ConfigError::Validation(
                "No backend servers found in config".to_string(),
            ));
        }

        for backend in &self.dns.backends {
            backend.validate()?;
        }

        if self.dns.query_timeout_ms == 0 || self.dns.doh_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen_addr: Option<String>,
    pub resolve_mode: Option<ResolveMode>,
    pub log_level: Option<String>,
    pub log_queries: bool,
}

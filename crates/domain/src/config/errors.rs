#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Invalid backend '{name}': {reason}")]
    InvalidBackend { name: String, reason: String },

    #[error("Failed to load local overrides from {0}: {1}")]
    OverrideFile(String, String),
}

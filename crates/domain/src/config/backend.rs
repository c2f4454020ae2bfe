use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BackendConfig {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub backend_type: BackendType,

    /// Exchange target for UDP backends, TCP connect target for DoH backends.
    pub host_port: String,

    #[serde(default)]
    pub doh_url: Option<String>,
}

/// Transport selected for a backend. `Dummy` is the unset sentinel and is
/// never accepted at startup.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum BackendType {
    #[default]
    Dummy,

    #[serde(rename = "UDP")]
    Udp,

    #[serde(rename = "DOH")]
    Doh,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dummy => "Dummy",
            Self::Udp => "UDP",
            Self::Doh => "DOH",
        }
    }
}

impl BackendConfig {
    pub fn udp(name: impl Into<String>, host_port: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend_type: BackendType::Udp,
            host_port: host_port.into(),
            doh_url: None,
        }
    }

    pub fn doh(
        name: impl Into<String>,
        host_port: impl Into<String>,
        doh_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend_type: BackendType::Doh,
            host_port: host_port.into(),
            doh_url: Some(doh_url.into()),
        }
    }

    /// Name used in logs. Falls back to the DoH URL, then the address, when no
    /// explicit name is configured.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match (&self.backend_type, &self.doh_url) {
            (BackendType::Doh, Some(url)) => url,
            _ => &self.host_port,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBackend {
            name: self.display_name().to_string(),
            reason: reason.to_string(),
        };

        if self.host_port.trim().is_empty() {
            return Err(invalid("host_port is required"));
        }

        match self.backend_type {
            BackendType::Dummy => Err(invalid(
                "backend type is unset (Dummy); use UDP or DOH",
            )),
            BackendType::Udp => Ok(()),
            BackendType::Doh => match self.doh_url.as_deref() {
                Some(url) if !url.trim().is_empty() => Ok(()),
                _ => Err(invalid("doh_url is required for DOH backends")),
            },
        }
    }
}

use crate::dns::transport::{ClassicExchanger, DohExchanger, Exchange, Exchanger};
use dnsforward_domain::{BackendConfig, BackendType, DnsConfig, DomainError, TransitMode};
use hickory_proto::op::Message;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A configured upstream. Immutable after construction and shared by every
/// in-flight query.
pub struct Backend {
    name: Arc<str>,
    transit_mode: TransitMode,
    address: Arc<str>,
    exchanger: Arc<dyn Exchanger>,
}

impl Backend {
    pub fn new(name: &str, address: &str, exchanger: Arc<dyn Exchanger>) -> Self {
        Self {
            name: Arc::from(name),
            transit_mode: exchanger.transit_mode(),
            address: Arc::from(address),
            exchanger,
        }
    }

    pub fn from_config(config: &BackendConfig, dns: &DnsConfig) -> Result<Self, DomainError> {
        config
            .validate()
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;

        let exchanger: Arc<dyn Exchanger> = match config.backend_type {
            BackendType::Udp => Arc::new(ClassicExchanger::new(
                config.host_port.clone(),
                Duration::from_millis(dns.query_timeout_ms),
            )),
            BackendType::Doh => {
                let url = config.doh_url.as_deref().unwrap_or_default();
                Arc::new(DohExchanger::new(
                    url,
                    &config.host_port,
                    Duration::from_millis(dns.doh_timeout_ms),
                )?)
            }
            BackendType::Dummy => {
                return Err(DomainError::ConfigError(format!(
                    "Backend {} has no transport",
                    config.display_name()
                )))
            }
        };

        Ok(Self::new(config.display_name(), &config.host_port, exchanger))
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn transit_mode(&self) -> TransitMode {
        self.transit_mode
    }

    pub fn address(&self) -> &Arc<str> {
        &self.address
    }

    pub async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError> {
        self.exchanger.exchange(query).await
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("name", &self.name)
            .field("transit_mode", &self.transit_mode)
            .field("address", &self.address)
            .finish()
    }
}

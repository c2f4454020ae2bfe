use super::Backend;
use dnsforward_domain::{DnsConfig, DomainError};
use std::sync::Arc;
use tracing::info;

/// Backends in declared order.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<Arc<Backend>>,
}

impl BackendRegistry {
    pub fn new(backends: Vec<Backend>) -> Result<Self, DomainError> {
        if backends.is_empty() {
            return Err(DomainError::ConfigError(
                "No backend servers found in config".into(),
            ));
        }

        Ok(Self {
            backends: backends.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_config(dns: &DnsConfig) -> Result<Self, DomainError> {
        let backends = dns
            .backends
            .iter()
            .map(|config| Backend::from_config(config, dns))
            .collect::<Result<Vec<_>, _>>()?;

        let registry = Self::new(backends)?;
        for backend in &registry.backends {
            info!(
                backend = %backend.name(),
                mode = %backend.transit_mode(),
                address = %backend.address(),
                "Backend registered"
            );
        }
        Ok(registry)
    }

    pub fn in_order(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    /// Fresh uniform permutation for one query.
    pub fn shuffled(&self) -> Vec<Arc<Backend>> {
        let mut backends = self.backends.clone();
        fastrand::shuffle(&mut backends);
        backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

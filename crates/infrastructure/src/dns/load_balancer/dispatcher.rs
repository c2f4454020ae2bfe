use super::registry::BackendRegistry;
use super::strategy::{DispatchContext, Strategy};
use crate::dns::audit::AuditLogger;
use async_trait::async_trait;
use dnsforward_application::ports::{DispatchOutcome, QueryContext, QueryDispatcher, ResponseWriter};
use std::sync::Arc;

/// Runs the configured strategy over the backend registry.
pub struct ForwardingDispatcher {
    registry: Arc<BackendRegistry>,
    strategy: Strategy,
    audit: AuditLogger,
}

impl ForwardingDispatcher {
    pub fn new(registry: Arc<BackendRegistry>, strategy: Strategy, audit: AuditLogger) -> Self {
        Self {
            registry,
            strategy,
            audit,
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

#[async_trait]
impl QueryDispatcher for ForwardingDispatcher {
    async fn dispatch(&self, query: &QueryContext, writer: &dyn ResponseWriter) -> DispatchOutcome {
        let ctx = DispatchContext {
            query,
            writer,
            audit: &self.audit,
        };
        self.strategy.dispatch(&self.registry, &ctx).await
    }
}

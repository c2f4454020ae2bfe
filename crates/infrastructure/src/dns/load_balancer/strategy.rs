use super::failover::FailoverStrategy;
use super::parallel::ParallelStrategy;
use super::query::QueryResult;
use super::registry::BackendRegistry;
use super::shuffled::ShuffledStrategy;
use crate::dns::audit::AuditLogger;
use dnsforward_application::ports::{DispatchOutcome, QueryContext, ResponseWriter};
use dnsforward_domain::ResolveMode;
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::warn;

/// Everything a strategy needs to resolve one query.
pub struct DispatchContext<'a> {
    pub query: &'a QueryContext,
    pub writer: &'a dyn ResponseWriter,
    pub audit: &'a AuditLogger,
}

impl DispatchContext<'_> {
    /// Write the winning response, then record it. Returns the winner's name.
    pub(super) async fn answer(&self, result: &QueryResult, response: &Message) -> Arc<str> {
        if let Err(e) = self.writer.write(response).await {
            warn!(id = %self.query.id, backend = %result.backend, error = %e, "Failed to write response");
        }
        self.audit.first_result(self.query, result, response);
        Arc::clone(&result.backend)
    }

    pub(super) fn record_attempt(&self, result: &QueryResult) {
        self.audit.backend_result(self.query, result);
    }

    pub(super) fn fail(&self, backend_count: usize) -> DispatchOutcome {
        self.audit.query_failure(self.query, backend_count);
        DispatchOutcome::Failed { backend_count }
    }
}

pub enum Strategy {
    InOrder(FailoverStrategy),
    Random(ShuffledStrategy),
    Concurrent(ParallelStrategy),
}

impl Strategy {
    pub fn from_mode(mode: ResolveMode, cancel_losing_backends: bool) -> Self {
        match mode {
            ResolveMode::InOrder => Self::InOrder(FailoverStrategy::new()),
            ResolveMode::Random => Self::Random(ShuffledStrategy::new()),
            ResolveMode::Concurrent => {
                Self::Concurrent(ParallelStrategy::new().with_loser_cancellation(cancel_losing_backends))
            }
        }
    }

    pub async fn dispatch(
        &self,
        registry: &BackendRegistry,
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        match self {
            Self::InOrder(s) => s.dispatch(registry.in_order(), ctx).await,
            Self::Random(s) => s.dispatch(registry, ctx).await,
            Self::Concurrent(s) => s.dispatch(registry, ctx).await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::InOrder(_) => ResolveMode::InOrder.as_str(),
            Self::Random(_) => ResolveMode::Random.as_str(),
            Self::Concurrent(_) => ResolveMode::Concurrent.as_str(),
        }
    }
}

use crate::ports::{DispatchOutcome, QueryContext, QueryDispatcher, RequestLogger, ResponseWriter};
use crate::services::LocalOverrideResolver;
use dnsforward_domain::{CorrelationId, CorrelationIdGenerator};
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Overridden,
    Answered { backend: Arc<str> },
    Failed { backend_count: usize },
}

impl From<DispatchOutcome> for QueryOutcome {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Answered { backend } => Self::Answered { backend },
            DispatchOutcome::Failed { backend_count } => Self::Failed { backend_count },
        }
    }
}

pub struct HandleDnsQueryUseCase {
    ids: CorrelationIdGenerator,
    overrides: LocalOverrideResolver,
    dispatcher: Arc<dyn QueryDispatcher>,
    request_logger: Arc<dyn RequestLogger>,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        ids: CorrelationIdGenerator,
        overrides: LocalOverrideResolver,
        dispatcher: Arc<dyn QueryDispatcher>,
        request_logger: Arc<dyn RequestLogger>,
    ) -> Self {
        Self {
            ids,
            overrides,
            dispatcher,
            request_logger,
        }
    }

    /// Number of correlation ids handed out so far.
    pub fn queries_seen(&self) -> u32 {
        self.ids.issued()
    }

    pub async fn execute(
        &self,
        query: Message,
        writer: &dyn ResponseWriter,
    ) -> (CorrelationId, QueryOutcome) {
        let id = self.ids.next_id();
        self.request_logger.log_request(&id, &query);

        if let Some(response) = self.overrides.resolve(&query) {
            debug!(id = %id, "Query answered from override table");
            if let Err(e) = writer.write(&response).await {
                warn!(id = %id, error = %e, "Failed to write override response");
            }
            return (id, QueryOutcome::Overridden);
        }

        let ctx = QueryContext::new(id.clone(), query);
        let outcome = self.dispatcher.dispatch(&ctx, writer).await;

        let elapsed_ms = ctx.received_at.elapsed().as_millis() as u64;
        match &outcome {
            DispatchOutcome::Answered { backend } => {
                debug!(id = %id, backend = %backend, elapsed_ms, "Dispatch finished");
            }
            DispatchOutcome::Failed { backend_count } => {
                debug!(id = %id, backend_count, elapsed_ms, "No backend answered");
            }
        }

        (id, outcome.into())
    }
}

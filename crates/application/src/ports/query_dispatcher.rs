use super::ResponseWriter;
use async_trait::async_trait;
use dnsforward_domain::CorrelationId;
use hickory_proto::op::Message;
use std::sync::Arc;
use std::time::Instant;

/// Per-query state handed to the dispatch engine.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub id: CorrelationId,
    pub query: Arc<Message>,
    pub received_at: Instant,
}

impl QueryContext {
    pub fn new(id: CorrelationId, query: Message) -> Self {
        Self {
            id,
            query: Arc::new(query),
            received_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A backend answered and its response went to the writer.
    Answered { backend: Arc<str> },
    /// Every attempted backend failed; nothing was written.
    Failed { backend_count: usize },
}

impl DispatchOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }
}

/// Resolves one query against the upstream backends.
///
/// Implementations write at most one response through `writer` and keep
/// their own audit trail; backend errors never escape as `Err`.
#[async_trait]
pub trait QueryDispatcher: Send + Sync {
    async fn dispatch(&self, ctx: &QueryContext, writer: &dyn ResponseWriter) -> DispatchOutcome;
}

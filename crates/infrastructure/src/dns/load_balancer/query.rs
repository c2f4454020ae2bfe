use super::Backend;
use dnsforward_domain::{DomainError, TransitMode};
use hickory_proto::op::Message;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one attempt against one backend. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub backend: Arc<str>,
    pub transit_mode: TransitMode,
    pub address: Arc<str>,
    pub outcome: Result<Message, DomainError>,
    /// Network round trip as measured by the exchanger; zero on error.
    pub rtt: Duration,
    /// Wall time of the whole attempt.
    pub elapsed: Duration,
}

impl QueryResult {
    /// Attempt that never produced a result because its task died.
    pub fn task_failed(backend: &Backend, reason: String, elapsed: Duration) -> Self {
        Self {
            backend: Arc::clone(backend.name()),
            transit_mode: backend.transit_mode(),
            address: Arc::clone(backend.address()),
            outcome: Err(DomainError::TaskFailed(reason)),
            rtt: Duration::ZERO,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn response(&self) -> Option<&Message> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&DomainError> {
        self.outcome.as_ref().err()
    }

    pub fn was_cancelled(&self) -> bool {
        self.error().is_some_and(DomainError::is_cancelled)
    }
}

/// Execute one exchange against `backend`, timing it.
///
/// When `cancel` fires before the exchange completes the attempt ends with
/// [`DomainError::Cancelled`].
pub async fn query_backend(
    backend: &Backend,
    query: &Message,
    cancel: Option<&CancellationToken>,
) -> QueryResult {
    let start = Instant::now();

    let exchanged = match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                result = backend.exchange(query) => result,
                _ = token.cancelled() => Err(DomainError::Cancelled),
            }
        }
        None => backend.exchange(query).await,
    };

    let elapsed = start.elapsed();
    let (outcome, rtt) = match exchanged {
        Ok(exchange) => (Ok(exchange.response), exchange.rtt),
        Err(e) => (Err(e), Duration::ZERO),
    };

    debug!(
        backend = %backend.name(),
        success = outcome.is_ok(),
        rtt_us = rtt.as_micros() as u64,
        elapsed_us = elapsed.as_micros() as u64,
        "Backend attempt finished"
    );

    QueryResult {
        backend: Arc::clone(backend.name()),
        transit_mode: backend.transit_mode(),
        address: Arc::clone(backend.address()),
        outcome,
        rtt,
        elapsed,
    }
}

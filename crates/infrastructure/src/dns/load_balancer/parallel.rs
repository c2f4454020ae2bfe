use super::query::{query_backend, QueryResult};
use super::registry::BackendRegistry;
use super::strategy::DispatchContext;
use dnsforward_application::ports::DispatchOutcome;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Races every backend at once. The first success is written exactly once;
/// every started attempt is drained and recorded before returning.
pub struct ParallelStrategy {
    cancel_losers: bool,
}

impl ParallelStrategy {
    pub fn new() -> Self {
        Self {
            cancel_losers: false,
        }
    }

    /// Cancel the attempts still running once a winner is known.
    pub fn with_loser_cancellation(mut self, enabled: bool) -> Self {
        self.cancel_losers = enabled;
        self
    }

    pub async fn dispatch(
        &self,
        registry: &BackendRegistry,
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        let backends = registry.shuffled();
        let started = Instant::now();

        debug!(id = %ctx.query.id, servers = backends.len(), "Racing all backends");

        let cancel = self.cancel_losers.then(CancellationToken::new);
        let mut futs = FuturesUnordered::new();

        for backend in &backends {
            let task_backend = Arc::clone(backend);
            let query = Arc::clone(&ctx.query.query);
            let token = cancel.clone();
            let handle = tokio::spawn(async move {
                query_backend(&task_backend, &query, token.as_ref()).await
            });

            let backend = Arc::clone(backend);
            futs.push(async move { (backend, handle.await) });
        }

        let mut winner: Option<Arc<str>> = None;

        while let Some((backend, joined)) = futs.next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(id = %ctx.query.id, backend = %backend.name(), error = %e, "Backend task failed");
                    QueryResult::task_failed(&backend, e.to_string(), started.elapsed())
                }
            };

            if winner.is_none() {
                if let Ok(response) = &result.outcome {
                    debug!(id = %ctx.query.id, backend = %result.backend, "Fastest response");
                    winner = Some(ctx.answer(&result, response).await);
                    if let Some(token) = &cancel {
                        token.cancel();
                    }
                }
            }

            ctx.record_attempt(&result);
        }

        match winner {
            Some(backend) => DispatchOutcome::Answered { backend },
            None => ctx.fail(backends.len()),
        }
    }
}

impl Default for ParallelStrategy {
    fn default() -> Self {
        Self::new()
    }
}

use super::query::query_backend;
use super::strategy::DispatchContext;
use super::Backend;
use dnsforward_application::ports::DispatchOutcome;
use std::sync::Arc;
use tracing::debug;

/// Tries backends one at a time in the order given and stops at the first
/// answer.
pub struct FailoverStrategy;

impl FailoverStrategy {
    pub fn new() -> Self {
        Self
    }

    pub async fn dispatch(
        &self,
        backends: &[Arc<Backend>],
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        debug!(id = %ctx.query.id, servers = backends.len(), "Trying sequentially");

        for (position, backend) in backends.iter().enumerate() {
            let result = query_backend(backend, &ctx.query.query, None).await;

            match &result.outcome {
                Ok(response) => {
                    debug!(id = %ctx.query.id, backend = %result.backend, position, "Backend responded");
                    let winner = ctx.answer(&result, response).await;
                    ctx.record_attempt(&result);
                    return DispatchOutcome::Answered { backend: winner };
                }
                Err(e) => {
                    debug!(id = %ctx.query.id, backend = %result.backend, error = %e, position, "Failing over");
                    ctx.record_attempt(&result);
                }
            }
        }

        ctx.fail(backends.len())
    }
}

impl Default for FailoverStrategy {
    fn default() -> Self {
        Self::new()
    }
}

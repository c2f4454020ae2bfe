use super::failover::FailoverStrategy;
use super::registry::BackendRegistry;
use super::strategy::DispatchContext;
use dnsforward_application::ports::DispatchOutcome;

/// Serial failover over a fresh random permutation per query.
pub struct ShuffledStrategy {
    inner: FailoverStrategy,
}

impl ShuffledStrategy {
    pub fn new() -> Self {
        Self {
            inner: FailoverStrategy::new(),
        }
    }

    pub async fn dispatch(
        &self,
        registry: &BackendRegistry,
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        let order = registry.shuffled();
        self.inner.dispatch(&order, ctx).await
    }
}

impl Default for ShuffledStrategy {
    fn default() -> Self {
        Self::new()
    }
}

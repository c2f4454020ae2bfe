use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Identifier joining every audit record produced for one inbound query.
///
/// Rendered as `<unix seconds>-<counter>`. It carries no resolution meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    pub fn new(unix_secs: i64, sequence: u32) -> Self {
        Self(Arc::from(format!("{}-{}", unix_secs, sequence)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counter owned by the query handler. Each handler instance numbers its
/// queries independently, starting at 1.
#[derive(Debug, Default)]
pub struct CorrelationIdGenerator {
    counter: AtomicU32,
}

impl CorrelationIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> CorrelationId {
        self.next_id_at(chrono::Utc::now().timestamp())
    }

    pub fn next_id_at(&self, unix_secs: i64) -> CorrelationId {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        CorrelationId::new(unix_secs, sequence)
    }

    pub fn issued(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

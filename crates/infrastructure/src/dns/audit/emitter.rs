use dnsforward_domain::AuditEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Default)]
struct Counters {
    queued: AtomicU64,
    lost: AtomicU64,
}

#[derive(Clone)]
enum Sink {
    Off,
    Channel(mpsc::UnboundedSender<AuditEvent>),
}

/// Cloneable producer side of the audit pipeline.
///
/// Never blocks the query path. Events pushed after the writer task has gone
/// away are counted as lost and surfaced once at shutdown.
#[derive(Clone)]
pub struct AuditEmitter {
    sink: Sink,
    counters: Arc<Counters>,
}

impl AuditEmitter {
    pub fn new_disabled() -> Self {
        Self {
            sink: Sink::Off,
            counters: Arc::default(),
        }
    }

    pub fn new_enabled() -> (Self, mpsc::UnboundedReceiver<AuditEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let emitter = Self {
            sink: Sink::Channel(tx),
            counters: Arc::default(),
        };
        (emitter, rx)
    }

    pub fn emit(&self, event: AuditEvent) {
        let Sink::Channel(tx) = &self.sink else {
            return;
        };
        match tx.send(event) {
            Ok(()) => {
                self.counters.queued.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.counters.lost.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.sink, Sink::Channel(_))
    }

    /// Events accepted by the channel, across every clone.
    pub fn queued(&self) -> u64 {
        self.counters.queued.load(Ordering::Relaxed)
    }

    /// Events discarded because the writer task had already stopped.
    pub fn lost(&self) -> u64 {
        self.counters.lost.load(Ordering::Relaxed)
    }
}

impl Default for AuditEmitter {
    fn default() -> Self {
        Self::new_disabled()
    }
}

impl std::fmt::Debug for AuditEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditEmitter")
            .field("enabled", &self.is_enabled())
            .field("queued", &self.queued())
            .field("lost", &self.lost())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dnsforward_domain::CorrelationId;

    fn event() -> AuditEvent {
        AuditEvent::QueryFailure {
            ts: Utc::now(),
            id: CorrelationId::new(1, 1),
            req: "dnsmsg{}".into(),
            backend_count: 1,
        }
    }

    #[test]
    fn test_disabled_emitter_counts_nothing() {
        let emitter = AuditEmitter::new_disabled();
        emitter.emit(event());
        assert_eq!(emitter.queued(), 0);
        assert_eq!(emitter.lost(), 0);
    }

    #[test]
    fn test_counters_are_shared_between_clones() {
        let (emitter, _rx) = AuditEmitter::new_enabled();
        let clone = emitter.clone();
        emitter.emit(event());
        clone.emit(event());
        assert_eq!(emitter.queued(), 2);
        assert_eq!(clone.lost(), 0);
    }

    #[test]
    fn test_events_after_receiver_dropped_are_lost() {
        let (emitter, rx) = AuditEmitter::new_enabled();
        emitter.emit(event());
        drop(rx);
        emitter.emit(event());
        emitter.emit(event());
        assert_eq!(emitter.queued(), 1);
        assert_eq!(emitter.lost(), 2);
    }
}

use dnsforward_domain::AuditEvent;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Serializes audit events as JSON lines to a sink.
pub struct AuditWriter {
    sink: Box<dyn Write + Send>,
}

impl AuditWriter {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Append to `path`, creating it if needed.
    pub fn append_to(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    pub fn write_event(&mut self, event: &AuditEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.sink, event)?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()
    }

    /// Drain `rx` until every emitter is dropped. Sink errors are logged
    /// and the event is dropped.
    pub fn start(mut self, mut rx: mpsc::UnboundedReceiver<AuditEvent>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            debug!("AuditWriter: Starting consumer");

            let mut written = 0u64;
            let mut failed = 0u64;

            while let Some(event) = rx.recv().await {
                match self.write_event(&event) {
                    Ok(()) => written += 1,
                    Err(e) => {
                        failed += 1;
                        warn!(
                            error = %e,
                            id = %event.id(),
                            evt = event.kind(),
                            "AuditWriter: Failed to write audit record"
                        );
                    }
                }
            }

            debug!(written, failed, "AuditWriter: Consumer shutting down");
        })
    }
}

use async_trait::async_trait;
use dnsforward_application::ports::ResponseWriter;
use dnsforward_domain::{AuditEvent, DomainError};
use hickory_proto::op::Message;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Default)]
pub struct RecordingWriter {
    written: Mutex<Vec<Message>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> Vec<Message> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseWriter for RecordingWriter {
    async fn write(&self, response: &Message) -> Result<(), DomainError> {
        self.written.lock().unwrap().push(response.clone());
        Ok(())
    }
}

/// `Write` sink whose contents stay readable after it is boxed.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Everything emitted so far, in emission order.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<AuditEvent>) -> Vec<AuditEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

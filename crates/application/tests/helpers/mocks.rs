use async_trait::async_trait;
use dnsforward_application::ports::{
    DispatchOutcome, QueryContext, QueryDispatcher, RequestLogger, ResponseWriter,
};
use dnsforward_domain::{CorrelationId, DomainError};
use hickory_proto::op::Message;
use std::sync::{Arc, Mutex};

/// Dispatcher that answers (or fails) without touching the network and
/// remembers every context it was handed.
pub struct MockDispatcher {
    answer_with: Option<Arc<str>>,
    backend_count: usize,
    seen: Mutex<Vec<QueryContext>>,
}

impl MockDispatcher {
    pub fn answering(backend: &str) -> Self {
        Self {
            answer_with: Some(Arc::from(backend)),
            backend_count: 1,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(backend_count: usize) -> Self {
        Self {
            answer_with: None,
            backend_count,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn contexts(&self) -> Vec<QueryContext> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryDispatcher for MockDispatcher {
    async fn dispatch(&self, ctx: &QueryContext, writer: &dyn ResponseWriter) -> DispatchOutcome {
        self.seen.lock().unwrap().push(ctx.clone());

        match &self.answer_with {
            Some(backend) => {
                let response = super::as_response(&ctx.query);
                let _ = writer.write(&response).await;
                DispatchOutcome::Answered {
                    backend: Arc::clone(backend),
                }
            }
            None => DispatchOutcome::Failed {
                backend_count: self.backend_count,
            },
        }
    }
}

#[derive(Default)]
pub struct RecordingWriter {
    written: Mutex<Vec<Message>>,
    fail: bool,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn written(&self) -> Vec<Message> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseWriter for RecordingWriter {
    async fn write(&self, response: &Message) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::IoError("socket closed".into()));
        }
        self.written.lock().unwrap().push(response.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRequestLogger {
    ids: Mutex<Vec<CorrelationId>>,
}

impl RecordingRequestLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<CorrelationId> {
        self.ids.lock().unwrap().clone()
    }
}

impl RequestLogger for RecordingRequestLogger {
    fn log_request(&self, id: &CorrelationId, _query: &Message) {
        self.ids.lock().unwrap().push(id.clone());
    }
}

use super::{summarize, AuditEmitter};
use crate::dns::load_balancer::QueryResult;
use chrono::Utc;
use dnsforward_application::ports::{QueryContext, RequestLogger};
use dnsforward_domain::{AuditEvent, CorrelationId};
use hickory_proto::op::Message;

/// Builds audit events and hands them to the emitter.
///
/// `request`, `backend_result` and `first_result` are only produced when
/// query logging is on; `query_failure` is always produced.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    emitter: AuditEmitter,
    log_queries: bool,
}

impl AuditLogger {
    pub fn new(emitter: AuditEmitter, log_queries: bool) -> Self {
        Self {
            emitter,
            log_queries,
        }
    }

    pub fn log_queries(&self) -> bool {
        self.log_queries
    }

    pub fn request(&self, id: &CorrelationId, query: &Message) {
        if !self.log_queries {
            return;
        }
        self.emitter.emit(AuditEvent::Request {
            ts: Utc::now(),
            id: id.clone(),
            req: summarize(query),
        });
    }

    pub fn backend_result(&self, ctx: &QueryContext, result: &QueryResult) {
        if !self.log_queries {
            return;
        }
        self.emitter.emit(AuditEvent::BackendResult {
            ts: Utc::now(),
            id: ctx.id.clone(),
            duration_us: result.elapsed.as_micros() as u64,
            backend: result.backend.clone(),
            mode: result.transit_mode,
            backend_addr: result.address.clone(),
            error: result.error().map(ToString::to_string),
            cancelled: result.was_cancelled(),
            req: summarize(&ctx.query),
        });
    }

    pub fn first_result(&self, ctx: &QueryContext, result: &QueryResult, response: &Message) {
        if !self.log_queries {
            return;
        }
        self.emitter.emit(AuditEvent::FirstResult {
            ts: Utc::now(),
            id: ctx.id.clone(),
            duration_us: result.elapsed.as_micros() as u64,
            backend: result.backend.clone(),
            mode: result.transit_mode,
            backend_addr: result.address.clone(),
            result: summarize(response),
        });
    }

    pub fn query_failure(&self, ctx: &QueryContext, backend_count: usize) {
        self.emitter.emit(AuditEvent::QueryFailure {
            ts: Utc::now(),
            id: ctx.id.clone(),
            req: summarize(&ctx.query),
            backend_count,
        });
    }
}

impl RequestLogger for AuditLogger {
    fn log_request(&self, id: &CorrelationId, query: &Message) {
        self.request(id, query);
    }
}

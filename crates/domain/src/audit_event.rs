use crate::{CorrelationId, TransitMode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// One audit record. Serialises to a flat JSON object tagged by `evt`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "evt", rename_all = "snake_case")]
pub enum AuditEvent {
    Request {
        ts: DateTime<Utc>,
        id: CorrelationId,
        req: String,
    },

    BackendResult {
        ts: DateTime<Utc>,
        id: CorrelationId,
        duration_us: u64,
        backend: Arc<str>,
        mode: TransitMode,
        backend_addr: Arc<str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        cancelled: bool,
        req: String,
    },

    FirstResult {
        ts: DateTime<Utc>,
        id: CorrelationId,
        duration_us: u64,
        backend: Arc<str>,
        mode: TransitMode,
        backend_addr: Arc<str>,
        result: String,
    },

    QueryFailure {
        ts: DateTime<Utc>,
        id: CorrelationId,
        req: String,
        backend_count: usize,
    },
}

impl AuditEvent {
    pub fn id(&self) -> &CorrelationId {
        match self {
            Self::Request { id, .. }
            | Self::BackendResult { id, .. }
            | Self::FirstResult { id, .. }
            | Self::QueryFailure { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::BackendResult { .. } => "backend_result",
            Self::FirstResult { .. } => "first_result",
            Self::QueryFailure { .. } => "query_failure",
        }
    }

    /// Backend named by the record, if any.
    pub fn backend(&self) -> Option<&str> {
        match self {
            Self::BackendResult { backend, .. } | Self::FirstResult { backend, .. } => {
                Some(backend)
            }
            _ => None,
        }
    }
}

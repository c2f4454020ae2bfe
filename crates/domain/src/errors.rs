use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Invalid DNS response from {server}: {reason}")]
    InvalidDnsResponse { server: String, reason: String },

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("DoH server {server} returned HTTP {status}")]
    DohHttpStatus { server: String, status: u16 },

    #[error("DoH server {server} sent Content-Type {content_type:?}, expected \"application/dns-message\"")]
    DohContentType {
        server: String,
        content_type: String,
    },

    #[error("DoH response from {server} exceeds {limit} bytes")]
    DohBodyTooLarge { server: String, limit: usize },

    #[error("Backend attempt cancelled after another backend answered")]
    Cancelled,

    #[error("Backend task failed: {0}")]
    TaskFailed(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// True for failures of a single backend exchange. These are contained by
    /// the dispatch engine and never reach the DNS client.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDnsResponse { .. }
                | Self::TransportTimeout { .. }
                | Self::TransportConnectionRefused { .. }
                | Self::Transport { .. }
                | Self::DohHttpStatus { .. }
                | Self::DohContentType { .. }
                | Self::DohBodyTooLarge { .. }
                | Self::Cancelled
                | Self::TaskFailed(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_classified() {
        let timeout = DomainError::TransportTimeout {
            server: "8.8.8.8:53".into(),
        };
        assert!(timeout.is_transport_error());
        assert!(DomainError::Cancelled.is_transport_error());
        assert!(!DomainError::ConfigError("bad".into()).is_transport_error());
        assert!(!DomainError::IoError("disk".into()).is_transport_error());
    }

    #[test]
    fn test_http_status_message() {
        let err = DomainError::DohHttpStatus {
            server: "https://dns.google/dns-query".into(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "DoH server https://dns.google/dns-query returned HTTP 503"
        );
    }
}

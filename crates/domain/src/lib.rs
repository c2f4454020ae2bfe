//! dnsforward domain layer
pub mod audit_event;
pub mod config;
pub mod correlation_id;
pub mod errors;
pub mod override_table;
pub mod transit_mode;

pub use audit_event::AuditEvent;
pub use config::{
    BackendConfig, BackendType, CliOverrides, Config, ConfigError, DnsConfig, LoggingConfig,
    ResolveMode, ServerConfig, SOCKET_ACTIVATION,
};
pub use correlation_id::{CorrelationId, CorrelationIdGenerator};
pub use errors::DomainError;
pub use override_table::OverrideTable;
pub use transit_mode::TransitMode;

pub mod emitter;
pub mod logger;
pub mod message_summary;
pub mod writer;

pub use emitter::AuditEmitter;
pub use logger::AuditLogger;
pub use message_summary::summarize;
pub use writer::AuditWriter;

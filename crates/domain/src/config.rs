pub mod backend;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod resolve_mode;
pub mod root;
pub mod server;

pub use backend::{BackendConfig, BackendType};
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolve_mode::ResolveMode;
pub use root::{CliOverrides, Config};
pub use server::{ServerConfig, SOCKET_ACTIVATION};

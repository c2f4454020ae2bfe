pub mod dns;

pub use dns::{bind_listener, start_dns_server};

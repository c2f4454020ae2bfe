pub mod audit;
pub mod load_balancer;
pub mod server;
pub mod transport;
pub mod wire;

pub use audit::{AuditEmitter, AuditLogger, AuditWriter};
pub use load_balancer::{Backend, BackendRegistry, ForwardingDispatcher, QueryResult, Strategy};
pub use server::{DnsServerHandler, UdpResponseWriter};
pub use transport::{ClassicExchanger, DohExchanger, Exchange, Exchanger};

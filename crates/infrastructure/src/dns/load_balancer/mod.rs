pub mod backend;
pub mod dispatcher;
pub mod failover;
pub mod parallel;
pub mod query;
pub mod registry;
pub mod shuffled;
pub mod strategy;

pub use backend::Backend;
pub use dispatcher::ForwardingDispatcher;
pub use failover::FailoverStrategy;
pub use parallel::ParallelStrategy;
pub use query::{query_backend, QueryResult};
pub use registry::BackendRegistry;
pub use shuffled::ShuffledStrategy;
pub use strategy::{DispatchContext, Strategy};

mod query_dispatcher;
mod request_logger;
mod response_writer;

pub use query_dispatcher::{DispatchOutcome, QueryContext, QueryDispatcher};
pub use request_logger::RequestLogger;
pub use response_writer::ResponseWriter;

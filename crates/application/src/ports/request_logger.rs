use dnsforward_domain::CorrelationId;
use hickory_proto::op::Message;

/// Records that a query arrived, before any override check or dispatch.
pub trait RequestLogger: Send + Sync {
    fn log_request(&self, id: &CorrelationId, query: &Message);
}

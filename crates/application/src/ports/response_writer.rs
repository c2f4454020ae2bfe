use async_trait::async_trait;
use dnsforward_domain::DomainError;
use hickory_proto::op::Message;

/// Sends the single response for one inbound query back to its client.
#[async_trait]
pub trait ResponseWriter: Send + Sync {
    async fn write(&self, response: &Message) -> Result<(), DomainError>;
}

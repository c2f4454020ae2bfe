use crate::dns::wire;
use async_trait::async_trait;
use dnsforward_application::ports::ResponseWriter;
use dnsforward_application::use_cases::{HandleDnsQueryUseCase, QueryOutcome};
use dnsforward_domain::DomainError;
use hickory_proto::op::{Message, MessageType};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::debug;

/// Sends a response datagram back to the client that asked.
pub struct UdpResponseWriter {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
}

impl UdpResponseWriter {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr) -> Self {
        Self { socket, peer }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

#[async_trait]
impl ResponseWriter for UdpResponseWriter {
    async fn write(&self, response: &Message) -> Result<(), DomainError> {
        let bytes = wire::encode(response)?;
        self.socket
            .send_to(&bytes, self.peer)
            .await
            .map_err(|e| DomainError::IoError(format!("send to {} failed: {}", self.peer, e)))?;
        Ok(())
    }
}

/// Caps responses at the payload size the client advertised (512 bytes
/// without EDNS). Oversized responses are replaced by a TC=1 copy that keeps
/// the header, question and EDNS record but carries no records.
pub struct PayloadLimitedWriter<'a> {
    inner: &'a dyn ResponseWriter,
    max_payload: u16,
}

impl<'a> PayloadLimitedWriter<'a> {
    pub fn new(inner: &'a dyn ResponseWriter, max_payload: u16) -> Self {
        Self { inner, max_payload }
    }

    pub fn for_query(inner: &'a dyn ResponseWriter, query: &Message) -> Self {
        Self::new(inner, query.max_payload())
    }
}

#[async_trait]
impl ResponseWriter for PayloadLimitedWriter<'_> {
    async fn write(&self, response: &Message) -> Result<(), DomainError> {
        let size = wire::encode(response)?.len();
        if size <= usize::from(self.max_payload) {
            return self.inner.write(response).await;
        }

        debug!(
            id = response.id(),
            size,
            max_payload = self.max_payload,
            "Response exceeds client payload size, sending truncated"
        );
        self.inner.write(&response.truncate()).await
    }
}

pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Handle one inbound datagram. Unparseable datagrams and stray
    /// responses are dropped and yield `None`.
    pub async fn handle_datagram(
        &self,
        datagram: &[u8],
        writer: &dyn ResponseWriter,
    ) -> Option<QueryOutcome> {
        let query = match wire::decode_query(datagram) {
            Ok(query) => query,
            Err(e) => {
                debug!(error = %e, bytes = datagram.len(), "Dropping unparseable datagram");
                return None;
            }
        };

        if query.message_type() == MessageType::Response {
            debug!(id = query.id(), "Dropping datagram with QR bit set");
            return None;
        }

        let writer = PayloadLimitedWriter::for_query(writer, &query);
        let (id, outcome) = self.use_case.execute(query, &writer).await;
        debug!(id = %id, outcome = ?outcome, "Query handled");
        Some(outcome)
    }
}

impl Clone for DnsServerHandler {
    fn clone(&self) -> Self {
        Self {
            use_case: Arc::clone(&self.use_case),
        }
    }
}

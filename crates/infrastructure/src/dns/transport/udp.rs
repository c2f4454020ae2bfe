//! Classic DNS over UDP (RFC 1035 §4.2.1)
//!
//! Each exchange uses its own ephemeral socket connected to the backend, so
//! replies from other sources are filtered by the kernel. Datagrams whose id
//! does not match the query are skipped until the deadline. If the reply has
//! the TC bit set the query is repeated once over TCP within the time left.

use super::{tcp, Exchange, Exchanger};
use crate::dns::wire::{self, MAX_UDP_MESSAGE_SIZE};
use async_trait::async_trait;
use dnsforward_domain::{DomainError, TransitMode};
use hickory_proto::op::Message;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

pub struct ClassicExchanger {
    server: String,
    timeout: Duration,
}

impl ClassicExchanger {
    pub fn new(server: impl Into<String>, timeout: Duration) -> Self {
        Self {
            server: server.into(),
            timeout,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server.clone(),
        }
    }

    fn io_error(&self, context: &str, e: io::Error) -> DomainError {
        if e.kind() == io::ErrorKind::ConnectionRefused {
            DomainError::TransportConnectionRefused {
                server: self.server.clone(),
            }
        } else {
            DomainError::Transport {
                server: self.server.clone(),
                reason: format!("{}: {}", context, e),
            }
        }
    }

    async fn resolve(&self) -> Result<SocketAddr, DomainError> {
        tokio::net::lookup_host(self.server.as_str())
            .await
            .map_err(|e| self.io_error("address lookup failed", e))?
            .next()
            .ok_or_else(|| DomainError::Transport {
                server: self.server.clone(),
                reason: "address lookup returned nothing".to_string(),
            })
    }

    async fn round_trip(
        &self,
        server_addr: SocketAddr,
        query_bytes: &[u8],
        query_id: u16,
    ) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.io_error("failed to bind UDP socket", e))?;
        socket
            .connect(server_addr)
            .await
            .map_err(|e| self.io_error("failed to connect UDP socket", e))?;
        socket
            .send(query_bytes)
            .await
            .map_err(|e| self.io_error("failed to send UDP query", e))?;

        debug!(server = %server_addr, bytes_sent = query_bytes.len(), "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];
        loop {
            let len = socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| self.io_error("failed to receive UDP response", e))?;

            if wire::peek_id(&recv_buf[..len]) == Some(query_id) {
                recv_buf.truncate(len);
                return Ok(recv_buf);
            }

            debug!(server = %server_addr, bytes = len, "Ignoring UDP reply with mismatched id");
        }
    }
}

#[async_trait]
impl Exchanger for ClassicExchanger {
    async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError> {
        let deadline = Instant::now() + self.timeout;
        let query_bytes = wire::encode(query)?;

        let server_addr = timeout_at(deadline, self.resolve())
            .await
            .map_err(|_| self.timeout_error())??;

        let started = Instant::now();
        let reply = timeout_at(deadline, self.round_trip(server_addr, &query_bytes, query.id()))
            .await
            .map_err(|_| self.timeout_error())??;
        let udp_rtt = started.elapsed();

        let response = wire::decode_response(&reply, &self.server)?;
        if !response.truncated() {
            return Ok(Exchange {
                response,
                rtt: udp_rtt,
            });
        }

        debug!(server = %server_addr, "Response truncated (TC bit), retrying via TCP");

        let tcp_started = Instant::now();
        let remaining = deadline.saturating_duration_since(tcp_started);
        let tcp_reply = tcp::exchange(server_addr, &query_bytes, remaining).await?;
        let rtt = udp_rtt + tcp_started.elapsed();

        Ok(Exchange {
            response: wire::decode_response(&tcp_reply, &self.server)?,
            rtt,
        })
    }

    fn transit_mode(&self) -> TransitMode {
        TransitMode::Classic
    }
}

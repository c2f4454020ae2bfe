//! DNS-over-HTTPS (RFC 8484)
//!
//! Queries are sent as HTTP POST requests with `application/dns-message`
//! content type. The URL host is only used for TLS SNI and the `Host`
//! header; connections always go to the configured connect address, even
//! when the URL names an IP literal or an explicit port.
//!
//! Wire format (HTTP):
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::pinned_connector::PinnedConnector;
use super::{split_host_port, Exchange, Exchanger};
use crate::dns::wire;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use dnsforward_domain::{DomainError, TransitMode};
use hickory_proto::op::Message;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::Request;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Expected content type for DNS-over-HTTPS bodies (RFC 8484 §4.2.1)
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// Upper bound on a DoH response body.
pub const MAX_RESPONSE_BODY: usize = 8 * 1024 * 1024;

/// Raw outcome of one HTTP round trip. The body has been fully read.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Posts a DNS wire message and returns the HTTP reply.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, url: &Url, body: Vec<u8>) -> Result<HttpReply, DomainError>;
}

/// Pooled HTTP client, HTTP/2 negotiated via ALPN, whose connections all go
/// to one connect address regardless of the URL host or port.
pub struct PinnedHttpTransport {
    client: Client<PinnedConnector, Full<Bytes>>,
    timeout: Duration,
}

impl PinnedHttpTransport {
    pub fn new(connect_addr: &str, timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(4)
            .build(PinnedConnector::new(connect_addr));

        Self { client, timeout }
    }

    async fn round_trip(&self, url: &Url, body: Vec<u8>) -> Result<HttpReply, DomainError> {
        let server = url.as_str();

        let request = Request::post(url.as_str())
            .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
            .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| DomainError::Transport {
                server: server.to_string(),
                reason: format!("failed to build request: {}", e),
            })?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| request_error(server, &e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = read_bounded_body(response.into_body(), server).await?;

        Ok(HttpReply {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for PinnedHttpTransport {
    async fn post(&self, url: &Url, body: Vec<u8>) -> Result<HttpReply, DomainError> {
        tokio::time::timeout(self.timeout, self.round_trip(url, body))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: url.to_string(),
            })?
    }
}

/// Maps a client error, looking through its sources for a refused connect.
fn request_error(server: &str, e: &(dyn StdError + 'static)) -> DomainError {
    let mut reason = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return DomainError::TransportConnectionRefused {
                    server: server.to_string(),
                };
            }
        }
        reason = format!("{}: {}", reason, cause);
        source = cause.source();
    }

    DomainError::Transport {
        server: server.to_string(),
        reason,
    }
}

/// Reads the whole body, keeping at most `MAX_RESPONSE_BODY` bytes. An
/// oversized body is still consumed to the end so the connection stays
/// reusable.
async fn read_bounded_body<B>(mut body: B, server: &str) -> Result<Bytes, DomainError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: fmt::Display,
{
    let mut collected = BytesMut::new();
    let mut oversized = false;

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| DomainError::Transport {
            server: server.to_string(),
            reason: format!("failed to read response body: {}", e),
        })?;
        let Ok(chunk) = frame.into_data() else {
            continue;
        };

        if oversized {
            continue;
        }
        if collected.len() + chunk.len() > MAX_RESPONSE_BODY {
            oversized = true;
            collected.clear();
            continue;
        }
        collected.extend_from_slice(&chunk);
    }

    if oversized {
        return Err(DomainError::DohBodyTooLarge {
            server: server.to_string(),
            limit: MAX_RESPONSE_BODY,
        });
    }

    Ok(collected.freeze())
}

pub struct DohExchanger {
    url: Url,
    connect_addr: String,
    transport: Arc<dyn HttpTransport>,
}

impl DohExchanger {
    pub fn new(url: &str, connect_addr: &str, timeout: Duration) -> Result<Self, DomainError> {
        let url = parse_https_url(url)?;
        validate_connect_addr(connect_addr)?;
        let transport = PinnedHttpTransport::new(connect_addr, timeout);

        Ok(Self {
            url,
            connect_addr: connect_addr.to_string(),
            transport: Arc::new(transport),
        })
    }

    /// Same validation as [`DohExchanger::new`], over a caller-supplied
    /// HTTP transport.
    pub fn with_transport(
        url: &str,
        connect_addr: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, DomainError> {
        let url = parse_https_url(url)?;
        validate_connect_addr(connect_addr)?;

        Ok(Self {
            url,
            connect_addr: connect_addr.to_string(),
            transport,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn connect_addr(&self) -> &str {
        &self.connect_addr
    }

    fn check_reply(&self, reply: &HttpReply) -> Result<(), DomainError> {
        if reply.status != 200 {
            return Err(DomainError::DohHttpStatus {
                server: self.url.to_string(),
                status: reply.status,
            });
        }

        let content_type = reply.content_type.as_deref().unwrap_or("");
        if !is_dns_message(content_type) {
            return Err(DomainError::DohContentType {
                server: self.url.to_string(),
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Exchanger for DohExchanger {
    async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError> {
        let body = wire::encode(query)?;

        debug!(url = %self.url, message_len = body.len(), "Sending DoH query");

        let started = Instant::now();
        let reply = self.transport.post(&self.url, body).await?;
        let rtt = started.elapsed();

        self.check_reply(&reply)?;

        debug!(url = %self.url, response_len = reply.body.len(), "DoH response received");

        let response = wire::decode_response(&reply.body, self.url.as_str())?;
        Ok(Exchange { response, rtt })
    }

    fn transit_mode(&self) -> TransitMode {
        TransitMode::Doh
    }
}

fn parse_https_url(url: &str) -> Result<Url, DomainError> {
    let parsed = Url::parse(url)
        .map_err(|e| DomainError::ConfigError(format!("Invalid DoH URL {:?}: {}", url, e)))?;

    if parsed.scheme() != "https" {
        return Err(DomainError::ConfigError(format!(
            "DoH URL {:?} must use the https scheme",
            url
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(DomainError::ConfigError(format!(
            "DoH URL {:?} has no host",
            url
        )));
    }

    Ok(parsed)
}

fn validate_connect_addr(connect_addr: &str) -> Result<(), DomainError> {
    split_host_port(connect_addr)
        .map(|_| ())
        .map_err(|reason| DomainError::ConfigError(format!("Invalid DoH connect address: {}", reason)))
}

/// Media type comparison ignoring parameters and case.
fn is_dns_message(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|media| media.eq_ignore_ascii_case(DNS_MESSAGE_CONTENT_TYPE))
}

//! Connector that ignores the request URI when choosing where to dial.
//!
//! Every connection goes to the configured connect address. The URI host is
//! still used for TLS SNI and certificate validation, and by the HTTP layer
//! for the `Host` header / `:authority`.

use hyper::rt::{Read, ReadBufCursor, Write};
use hyper::Uri;
use hyper_util::client::legacy::connect::{Connected, Connection};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, LazyLock};
use std::task::{Context, Poll};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tower::Service;
use tracing::debug;

/// Shared TLS config with webpki roots, offering h2 then http/1.1.
static SHARED_TLS_CONFIG: LazyLock<Arc<rustls::ClientConfig>> = LazyLock::new(|| {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let mut config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Arc::new(config)
});

#[derive(Clone)]
pub struct PinnedConnector {
    connect_addr: Arc<str>,
    tls: TlsConnector,
}

impl PinnedConnector {
    pub fn new(connect_addr: &str) -> Self {
        Self {
            connect_addr: Arc::from(connect_addr),
            tls: TlsConnector::from(SHARED_TLS_CONFIG.clone()),
        }
    }

    pub fn connect_addr(&self) -> &str {
        &self.connect_addr
    }

    /// TLS is layered on only for `https` URIs.
    async fn connect(self, uri: Uri) -> io::Result<PinnedStream> {
        let tcp = TcpStream::connect(&*self.connect_addr).await?;
        tcp.set_nodelay(true)?;

        debug!(connect_addr = %self.connect_addr, uri = %uri, "DoH connection established");

        if uri.scheme_str() != Some("https") {
            return Ok(PinnedStream::Plain(TokioIo::new(tcp)));
        }

        let host = uri
            .host()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "request URI has no host"))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let stream = self.tls.connect(server_name, tcp).await?;
        Ok(PinnedStream::Tls(Box::new(TokioIo::new(stream))))
    }
}

impl Service<Uri> for PinnedConnector {
    type Response = PinnedStream;
    type Error = io::Error;
    type Future = Pin<Box<dyn Future<Output = io::Result<PinnedStream>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        Box::pin(self.clone().connect(uri))
    }
}

pub enum PinnedStream {
    Plain(TokioIo<TcpStream>),
    Tls(Box<TokioIo<TlsStream<TcpStream>>>),
}

impl Connection for PinnedStream {
    fn connected(&self) -> Connected {
        match self {
            Self::Plain(stream) => stream.connected(),
            Self::Tls(stream) => {
                let (tcp, session) = stream.inner().get_ref();
                let connected = tcp.connected();
                if session.alpn_protocol() == Some(b"h2".as_slice()) {
                    connected.negotiated_h2()
                } else {
                    connected
                }
            }
        }
    }
}

impl Read for PinnedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Read::poll_read(Pin::new(stream), cx, buf),
            Self::Tls(stream) => Read::poll_read(Pin::new(stream.as_mut()), cx, buf),
        }
    }
}

impl Write for PinnedStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(stream) => Write::poll_write(Pin::new(stream), cx, buf),
            Self::Tls(stream) => Write::poll_write(Pin::new(stream.as_mut()), cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Write::poll_flush(Pin::new(stream), cx),
            Self::Tls(stream) => Write::poll_flush(Pin::new(stream.as_mut()), cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Write::poll_shutdown(Pin::new(stream), cx),
            Self::Tls(stream) => Write::poll_shutdown(Pin::new(stream.as_mut()), cx),
        }
    }
}

//! DNS over TCP (RFC 1035 §4.2.2), used as the fallback for truncated UDP
//! replies. Each message is framed with a 2-byte big-endian length prefix.

use dnsforward_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Send one query on a fresh connection and return the raw reply bytes.
pub async fn exchange(
    server_addr: SocketAddr,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let server = server_addr.to_string();

    tokio::time::timeout(timeout, async {
        let mut stream = TcpStream::connect(server_addr)
            .await
            .map_err(|e| connect_error(&server, e))?;
        stream.set_nodelay(true).map_err(|e| DomainError::Transport {
            server: server.clone(),
            reason: format!("failed to set TCP_NODELAY: {}", e),
        })?;

        send_with_length_prefix(&mut stream, message_bytes)
            .await
            .map_err(|reason| DomainError::Transport {
                server: server.clone(),
                reason,
            })?;

        debug!(server = %server_addr, message_len = message_bytes.len(), "TCP query sent");

        read_with_length_prefix(&mut stream)
            .await
            .map_err(|reason| DomainError::Transport {
                server: server.clone(),
                reason,
            })
    })
    .await
    .map_err(|_| DomainError::TransportTimeout {
        server: server_addr.to_string(),
    })?
}

fn connect_error(server: &str, e: std::io::Error) -> DomainError {
    if e.kind() == std::io::ErrorKind::ConnectionRefused {
        DomainError::TransportConnectionRefused {
            server: server.to_string(),
        }
    } else {
        DomainError::Transport {
            server: server.to_string(),
            reason: format!("connect failed: {}", e),
        }
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), String>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len())
        .map_err(|_| format!("message too large for TCP: {} bytes", message_bytes.len()))?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| format!("failed to write length prefix: {}", e))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| format!("failed to write DNS message: {}", e))?;
    stream
        .flush()
        .await
        .map_err(|e| format!("failed to flush stream: {}", e))
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, String>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| format!("failed to read response length: {}", e))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| format!("failed to read response body: {}", e))?;

    Ok(response)
}

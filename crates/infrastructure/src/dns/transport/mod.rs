pub mod https;
pub mod pinned_connector;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use dnsforward_domain::{DomainError, TransitMode};
use hickory_proto::op::Message;
use std::time::Duration;

pub use https::{DohExchanger, HttpReply, HttpTransport, PinnedHttpTransport};
pub use pinned_connector::PinnedConnector;
pub use udp::ClassicExchanger;

/// A backend reply together with the measured network round trip.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub response: Message,
    pub rtt: Duration,
}

/// One request/response exchange with a single upstream server.
///
/// Implementations own their connection resources and enforce their own
/// I/O timeout. Errors are transport failures; a reply carrying an error
/// rcode is still `Ok`.
#[async_trait]
pub trait Exchanger: Send + Sync {
    async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError>;

    fn transit_mode(&self) -> TransitMode;
}

/// Split `host:port`, accepting bracketed IPv6 hosts.
pub fn split_host_port(addr: &str) -> Result<(&str, u16), String> {
    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| format!("missing ']' in address {:?}", addr))?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| format!("missing port in address {:?}", addr))?;
        (host, port)
    } else {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| format!("missing port in address {:?}", addr))?;
        if host.contains(':') {
            return Err(format!("too many colons in address {:?}", addr));
        }
        (host, port)
    };

    if host.is_empty() {
        return Err(format!("missing host in address {:?}", addr));
    }
    let port = port
        .parse::<u16>()
        .map_err(|_| format!("invalid port {:?} in address {:?}", port, addr))?;

    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_host_port_accepts_common_forms() {
        assert_eq!(split_host_port("1.1.1.1:443"), Ok(("1.1.1.1", 443)));
        assert_eq!(split_host_port("dns.google:853"), Ok(("dns.google", 853)));
        assert_eq!(
            split_host_port("[2606:4700:4700::1111]:443"),
            Ok(("2606:4700:4700::1111", 443))
        );
    }

    #[test]
    fn test_split_host_port_rejects_malformed() {
        assert!(split_host_port("1.1.1.1").is_err());
        assert!(split_host_port(":443").is_err());
        assert!(split_host_port("1.1.1.1:https").is_err());
        assert!(split_host_port("1.1.1.1:70000").is_err());
        assert!(split_host_port("2606:4700::1111:443").is_err());
        assert!(split_host_port("[::1]443").is_err());
    }
}

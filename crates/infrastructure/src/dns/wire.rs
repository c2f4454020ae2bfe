//! Wire-format helpers shared by every transport.

use dnsforward_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Maximum UDP DNS message size with EDNS(0)
pub const MAX_UDP_MESSAGE_SIZE: usize = 4096;

pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::InvalidDnsMessage(format!("Failed to serialize: {}", e)))?;
    Ok(buf)
}

/// Parse a datagram received from a client.
pub fn decode_query(bytes: &[u8]) -> Result<Message, DomainError> {
    Message::from_vec(bytes).map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))
}

/// Parse a reply received from a backend.
pub fn decode_response(bytes: &[u8], server: &str) -> Result<Message, DomainError> {
    Message::from_vec(bytes).map_err(|e| DomainError::InvalidDnsResponse {
        server: server.to_string(),
        reason: e.to_string(),
    })
}

/// Message id from a raw header, if the buffer holds one.
pub fn peek_id(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

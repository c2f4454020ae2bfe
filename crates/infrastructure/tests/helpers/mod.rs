#![allow(dead_code)]

mod dns_server_mock;
mod http_stub;
mod mock_exchanger;
mod recording;

pub use dns_server_mock::{MockDnsServer, ServerBehavior};
pub use http_stub::{HttpStub, StubReply, StubRequest};
pub use mock_exchanger::{MockExchanger, MockOutcome};
pub use recording::{drain_events, RecordingWriter, SharedBuffer};

use dnsforward_application::ports::QueryContext;
use dnsforward_domain::CorrelationId;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use std::str::FromStr;

pub fn query_for(name: &str, record_type: RecordType) -> Message {
    let mut query = Query::new();
    query.set_name(Name::from_str(name).unwrap());
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    message
}

/// Copy of `message` with the QR bit set.
pub fn as_response(message: &Message) -> Message {
    let mut response = message.clone();
    let mut header = *message.header();
    header.set_message_type(MessageType::Response);
    response.set_header(header);
    response
}

pub fn context_for(name: &str, seq: u32) -> QueryContext {
    QueryContext::new(CorrelationId::new(1_700_000_000, seq), query_for(name, RecordType::A))
}

#![allow(dead_code)]

mod mocks;

pub use mocks::{MockDispatcher, RecordingRequestLogger, RecordingWriter};

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use std::str::FromStr;

pub fn query_for(names: &[(&str, RecordType)]) -> Message {
    let mut message = Message::new(0x2a2a, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    for (name, record_type) in names {
        let mut query = Query::new();
        query.set_name(Name::from_str(name).unwrap());
        query.set_query_type(*record_type);
        query.set_query_class(DNSClass::IN);
        message.add_query(query);
    }
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

use dnsforward_domain::OverrideTable;
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{RData, Record};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// TTL carried by every synthesized override answer.
pub const OVERRIDE_TTL: u32 = 60;

/// Answers queries straight from the override table when every question is
/// covered, so that no backend is contacted.
pub struct LocalOverrideResolver {
    table: Arc<OverrideTable>,
}

impl LocalOverrideResolver {
    pub fn new(table: Arc<OverrideTable>) -> Self {
        Self { table }
    }

    pub fn empty() -> Self {
        Self::new(Arc::new(OverrideTable::new()))
    }

    pub fn table(&self) -> &OverrideTable {
        &self.table
    }

    /// Returns a synthesized response iff every question has an override
    /// that parses as an IP literal. With a table loaded, a query without
    /// questions is trivially covered and gets an empty response.
    ///
    /// Names are looked up exactly as sent: case is kept and IDNA labels
    /// stay in their `xn--` form.
    pub fn resolve(&self, query: &Message) -> Option<Message> {
        if self.table.is_empty() {
            return None;
        }

        let mut answers = Vec::with_capacity(query.queries().len());
        for question in query.queries() {
            let name = question.name();
            let ip: IpAddr = self.table.lookup(&name.to_ascii())?.parse().ok()?;
            answers.push(Record::from_rdata(name.clone(), OVERRIDE_TTL, to_rdata(ip)));
        }

        debug!(answers = answers.len(), "Answering from local overrides");

        let mut response = query.clone();
        let mut header = *query.header();
        header.set_message_type(MessageType::Response);
        response.set_header(header);
        for answer in answers {
            response.add_answer(answer);
        }
        Some(response)
    }
}

fn to_rdata(ip: IpAddr) -> RData {
    match ip {
        IpAddr::V4(v4) => RData::A(A(v4)),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => RData::A(A(v4)),
            None => RData::AAAA(AAAA(v6)),
        },
    }
}

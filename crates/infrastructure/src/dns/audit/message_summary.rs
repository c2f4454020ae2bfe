use hickory_proto::op::Message;
use hickory_proto::rr::RData;
use std::fmt::Write;

/// Compact one-line rendering of a message for audit records:
/// `dnsmsg{ q=<name>/<class>/<type> ... a<TYPE>={<value>} ...}`.
/// Names are rendered as sent on the wire.
pub fn summarize(message: &Message) -> String {
    let mut out = String::from("dnsmsg{");

    for query in message.queries() {
        let _ = write!(
            out,
            " q={}/{}/{}",
            query.name().to_ascii(),
            query.query_class(),
            query.query_type()
        );
    }

    for record in message.answers() {
        let _ = match record.data() {
            RData::A(a) => write!(out, " aA={{{}}}", a.0),
            RData::AAAA(aaaa) => write!(out, " aAAAA={{{}}}", aaaa.0),
            RData::CNAME(cname) => write!(out, " aCNAME={{{}}}", cname.0.to_ascii()),
            other => write!(out, " a{}={{{}}}", record.record_type(), other),
        };
    }

    out.push('}');
    out
}

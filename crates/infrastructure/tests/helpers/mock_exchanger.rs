use async_trait::async_trait;
use dnsforward_domain::{DomainError, TransitMode};
use dnsforward_infrastructure::dns::transport::{Exchange, Exchanger};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Answer(Ipv4Addr),
    /// `count` A records, all for the question name.
    ManyAnswers(usize),
    Rcode(ResponseCode),
    Fail,
}

/// In-memory exchanger with a fixed outcome and optional delay.
pub struct MockExchanger {
    name: String,
    outcome: MockOutcome,
    delay: Duration,
    mode: TransitMode,
    calls: Arc<AtomicUsize>,
}

impl MockExchanger {
    pub fn answering(name: &str, ip: [u8; 4]) -> Self {
        Self::new(name, MockOutcome::Answer(Ipv4Addr::from(ip)))
    }

    pub fn failing(name: &str) -> Self {
        Self::new(name, MockOutcome::Fail)
    }

    pub fn new(name: &str, outcome: MockOutcome) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            delay: Duration::ZERO,
            mode: TransitMode::Classic,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_mode(mut self, mode: TransitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shared call counter, readable after the exchanger is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Exchanger for MockExchanger {
    async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut response = super::as_response(query);

        match &self.outcome {
            MockOutcome::Answer(ip) => {
                let name = query.queries()[0].name().clone();
                response.add_answer(Record::from_rdata(name, 300, RData::A(A(*ip))));
            }
            MockOutcome::ManyAnswers(count) => {
                let name = query.queries()[0].name().clone();
                for i in 0..*count {
                    let ip = Ipv4Addr::from(0x0a00_0000 + i as u32);
                    response.add_answer(Record::from_rdata(name.clone(), 300, RData::A(A(ip))));
                }
            }
            MockOutcome::Rcode(code) => {
                response.set_response_code(*code);
            }
            MockOutcome::Fail => {
                return Err(DomainError::TransportTimeout {
                    server: self.name.clone(),
                });
            }
        }

        Ok(Exchange {
            response,
            rtt: self.delay.max(Duration::from_micros(1)),
        })
    }

    fn transit_mode(&self) -> TransitMode {
        self.mode
    }
}

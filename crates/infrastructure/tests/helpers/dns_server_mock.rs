use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const MOCK_ANSWER: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);
pub const MOCK_TCP_ANSWER: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 35);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerBehavior {
    /// Reply with one A record.
    Answer,
    /// Reply over UDP with TC set and no answers; the full answer is only
    /// available over TCP on the same port.
    Truncate,
    /// Send a reply with the wrong id first, then the real one.
    WrongIdFirst,
    /// Never reply.
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: ServerBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let tcp = match behavior {
            ServerBehavior::Truncate => Some(TcpListener::bind(addr).await?),
            _ => None,
        };

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            Self::reply_udp(&socket, &buf[..len], peer, behavior).await;
                        }
                    }
                    accepted = accept(tcp.as_ref()) => {
                        if let Ok((mut stream, _)) = accepted {
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                if let Some(reply) = build_reply(&query, Some(MOCK_TCP_ANSWER), false, None) {
                                    let _ = stream.write_all(&(reply.len() as u16).to_be_bytes()).await;
                                    let _ = stream.write_all(&reply).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn reply_udp(socket: &UdpSocket, query: &[u8], peer: SocketAddr, behavior: ServerBehavior) {
        match behavior {
            ServerBehavior::Answer => {
                if let Some(reply) = build_reply(query, Some(MOCK_ANSWER), false, None) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
            ServerBehavior::Truncate => {
                if let Some(reply) = build_reply(query, None, true, None) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
            ServerBehavior::WrongIdFirst => {
                if let Some(decoy) = build_reply(query, Some(Ipv4Addr::new(6, 6, 6, 6)), false, Some(1)) {
                    let _ = socket.send_to(&decoy, peer).await;
                }
                if let Some(reply) = build_reply(query, Some(MOCK_ANSWER), false, None) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
            ServerBehavior::Silent => {}
        }
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn accept(
    listener: Option<&TcpListener>,
) -> std::io::Result<(tokio::net::TcpStream, SocketAddr)> {
    match listener {
        Some(listener) => listener.accept().await,
        None => std::future::pending().await,
    }
}

fn build_reply(
    query: &[u8],
    answer: Option<Ipv4Addr>,
    truncated: bool,
    id_offset: Option<u16>,
) -> Option<Vec<u8>> {
    let query = Message::from_vec(query).ok()?;
    let mut reply = query.clone();
    let mut header = *query.header();
    header.set_message_type(MessageType::Response);
    header.set_truncated(truncated);
    if let Some(offset) = id_offset {
        header.set_id(query.id().wrapping_add(offset));
    }
    reply.set_header(header);
    if let Some(ip) = answer {
        let name = query.queries().first()?.name().clone();
        reply.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
    }

    let mut buf = Vec::new();
    reply.emit(&mut BinEncoder::new(&mut buf)).ok()?;
    Some(buf)
}

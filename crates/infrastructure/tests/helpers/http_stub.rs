use super::as_response;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
pub enum StubReply {
    /// 200 `application/dns-message` echoing the query as a response.
    EchoDns,
    Status(u16),
    ContentType(&'static str),
    /// 200 `application/dns-message` with this many zero bytes.
    Oversized(usize),
}

#[derive(Debug, Clone)]
pub struct StubRequest {
    pub request_line: String,
    pub host: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Plain HTTP/1.1 server answering one request per connection.
pub struct HttpStub {
    addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<StubRequest>>>,
    task: JoinHandle<()>,
}

impl HttpStub {
    pub async fn start(reply: StubReply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task = {
            let accepted = accepted.clone();
            let requests = requests.clone();
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    accepted.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(serve(stream, reply, requests.clone()));
                }
            })
        };

        Self {
            addr,
            accepted,
            requests,
            task,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, reply: StubReply, requests: Arc<Mutex<Vec<StubRequest>>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };

    let echo = || {
        Message::from_vec(&request.body)
            .ok()
            .and_then(|query| as_response(&query).to_vec().ok())
            .unwrap_or_default()
    };
    let (status, content_type, body_len, body) = match reply {
        StubReply::EchoDns => {
            let body = echo();
            (200, "application/dns-message", body.len(), Some(body))
        }
        StubReply::Status(status) => (status, "application/dns-message", 0, Some(Vec::new())),
        StubReply::ContentType(content_type) => {
            let body = echo();
            (200, content_type, body.len(), Some(body))
        }
        StubReply::Oversized(len) => (200, "application/dns-message", len, None),
    };
    requests.lock().unwrap().push(request);

    let head = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status, content_type, body_len
    );
    if stream.write_all(head.as_bytes()).await.is_err() {
        return;
    }

    match body {
        Some(body) => {
            let _ = stream.write_all(&body).await;
        }
        None => {
            let chunk = vec![0u8; 64 * 1024];
            let mut remaining = body_len;
            while remaining > 0 {
                let n = remaining.min(chunk.len());
                if stream.write_all(&chunk[..n]).await.is_err() {
                    return;
                }
                remaining -= n;
            }
        }
    }
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<StubRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();

    let mut host = None;
    let mut content_type = None;
    let mut content_length = 0usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match name.trim().to_ascii_lowercase().as_str() {
            "host" => host = Some(value),
            "content-type" => content_type = Some(value),
            "content-length" => content_length = value.parse().ok()?,
            _ => {}
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(StubRequest {
        request_line,
        host,
        content_type,
        body: buf[header_end..header_end + content_length].to_vec(),
    })
}

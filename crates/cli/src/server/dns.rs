use dnsforward_domain::ServerConfig;
use dnsforward_infrastructure::dns::server::{DnsServerHandler, UdpResponseWriter};
use dnsforward_infrastructure::dns::wire::MAX_UDP_MESSAGE_SIZE;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
#[cfg(unix)]
use std::os::fd::RawFd;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

/// First descriptor passed by the service manager.
#[cfg(unix)]
const LISTEN_FDS_START: RawFd = 3;

/// Bind the UDP listener, or adopt the inherited one when `listen_addr` is
/// the socket activation sentinel.
pub fn bind_listener(config: &ServerConfig) -> anyhow::Result<UdpSocket> {
    if config.uses_socket_activation() {
        let socket = adopt_activated_socket()?;
        info!(local_addr = ?socket.local_addr().ok(), "Adopted socket from service manager");
        return Ok(socket);
    }

    let socket_addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address '{}': {}", config.listen_addr, e))?;
    let socket = create_udp_socket(socket_addr)?;
    info!(bind_address = %socket_addr, "DNS listener bound");
    Ok(socket)
}

pub async fn start_dns_server(socket: UdpSocket, handler: DnsServerHandler) -> anyhow::Result<()> {
    let socket = Arc::new(socket);
    let handler = Arc::new(handler);
    let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

    info!("DNS server ready");

    loop {
        let (n, peer) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                debug!(error = %e, "UDP recv reset");
                continue;
            }
            Err(e) => {
                error!(error = %e, "UDP recv error");
                return Err(e.into());
            }
        };

        let datagram: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let writer = UdpResponseWriter::new(socket.clone(), peer);

        tokio::spawn(async move {
            handler.handle_datagram(&datagram, &writer).await;
        });
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

#[cfg(unix)]
fn adopt_activated_socket() -> anyhow::Result<UdpSocket> {
    use std::os::fd::FromRawFd;

    let listen_pid: u32 = std::env::var("LISTEN_PID")
        .map_err(|_| anyhow::anyhow!("Socket activation requested but LISTEN_PID is not set"))?
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid LISTEN_PID: {}", e))?;
    if listen_pid != std::process::id() {
        anyhow::bail!(
            "LISTEN_PID {} does not match this process ({})",
            listen_pid,
            std::process::id()
        );
    }

    let listen_fds: u32 = std::env::var("LISTEN_FDS")
        .map_err(|_| anyhow::anyhow!("Socket activation requested but LISTEN_FDS is not set"))?
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid LISTEN_FDS: {}", e))?;
    if listen_fds < 1 {
        anyhow::bail!("Socket activation requested but no sockets were passed");
    }

    let passed = LISTEN_FDS_START..LISTEN_FDS_START + listen_fds as RawFd;
    // SAFETY: LISTEN_PID names this process, so every descriptor in `passed`
    // was handed to us by the service manager and stays open while scanned.
    let fd = unsafe { first_datagram_fd(passed) }.ok_or_else(|| {
        anyhow::anyhow!("None of the {} sockets passed by the service manager is UDP", listen_fds)
    })?;

    // SAFETY: same descriptor set as above. Ownership moves to the socket and
    // nothing else in the process refers to it.
    let std_socket = unsafe { std::net::UdpSocket::from_raw_fd(fd) };
    std_socket.set_nonblocking(true)?;
    Ok(UdpSocket::from_std(std_socket)?)
}

/// First descriptor whose `SO_TYPE` is `SOCK_DGRAM`.
///
/// # Safety
/// Every descriptor yielded by `fds` must be open for the duration of the call.
#[cfg(unix)]
unsafe fn first_datagram_fd(fds: impl IntoIterator<Item = RawFd>) -> Option<RawFd> {
    use std::os::fd::BorrowedFd;

    fds.into_iter().find(|&fd| {
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        match socket2::SockRef::from(&borrowed).r#type() {
            Ok(kind) => kind == Type::DGRAM,
            Err(e) => {
                debug!(fd, error = %e, "Skipping passed descriptor");
                false
            }
        }
    })
}

#[cfg(not(unix))]
fn adopt_activated_socket() -> anyhow::Result<UdpSocket> {
    anyhow::bail!("Socket activation is only supported on unix platforms")
}

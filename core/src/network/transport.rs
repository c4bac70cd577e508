use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use snapr_common::error::TransportError;
use snapr_protocols::dns::{self, DnsMessage};
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::trace;

const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Sends one A question and waits for one answer.
///
/// Implementations must bound the whole exchange by `timeout` and report an
/// expired bound as [`TransportError::Timeout`]; callers use it to decide that
/// a server is unreachable.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn query_a(
        &self,
        server: SocketAddrV4,
        domain: &str,
        timeout: Duration,
    ) -> Result<DnsMessage, TransportError>;
}

/// Plain DNS over UDP, one ephemeral socket per question.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn query_a(
        &self,
        server: SocketAddrV4,
        domain: &str,
        query_timeout: Duration,
    ) -> Result<DnsMessage, TransportError> {
        let id: u16 = rand::random();
        let query: Vec<u8> = dns::create_a_packet(domain, id)?;

        match timeout(query_timeout, exchange(server, &query, id)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(TransportError::Timeout),
        }
    }
}

async fn exchange(
    server: SocketAddrV4,
    query: &[u8],
    id: u16,
) -> Result<DnsMessage, TransportError> {
    let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.connect(server).await?;
    socket.send(query).await?;

    let mut buf: Vec<u8> = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    loop {
        let len: usize = socket.recv(&mut buf).await?;
        match DnsMessage::parse(&buf[..len]) {
            Ok(message) if message.id() == id => return Ok(message),
            Ok(message) => {
                trace!("{server} answered with stale id {}, waiting", message.id());
            }
            Err(e) => {
                trace!("Ignoring undecodable datagram from {server}: {e}");
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! In-process DNS resolvers listening on loopback.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use snapr_protocols::dns;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Answers A questions for one domain. Other names get an empty answer.
///
/// With `silent` set the resolver reads queries but never replies.
pub struct FakeResolver {
    addr: SocketAddrV4,
    queries: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl FakeResolver {
    pub async fn spawn(
        bind: SocketAddrV4,
        domain: &str,
        answers: &[Ipv4Addr],
    ) -> anyhow::Result<Self> {
        Self::start(bind, domain, answers, false).await
    }

    pub async fn silent(bind: SocketAddrV4) -> anyhow::Result<Self> {
        Self::start(bind, "", &[], true).await
    }

    async fn start(
        bind: SocketAddrV4,
        domain: &str,
        answers: &[Ipv4Addr],
        silent: bool,
    ) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(bind).await?;
        let SocketAddr::V4(addr) = socket.local_addr()? else {
            anyhow::bail!("resolver bound to a non IPv4 address");
        };
        let domain: String = domain.to_string();
        let answers: Vec<Ipv4Addr> = answers.to_vec();
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = queries.clone();

        let handle = tokio::spawn(async move {
            let mut buf = [0u8; 512];
            while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
                counter.fetch_add(1, Ordering::SeqCst);
                if silent {
                    continue;
                }
                let Ok(question) = dns::parse_question(&buf[..len]) else {
                    continue;
                };
                let reply_addrs: &[Ipv4Addr] = if question.name == domain { &answers } else { &[] };
                if let Ok(reply) = dns::create_a_response(&buf[..len], reply_addrs) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddrV4 {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for FakeResolver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn loopback(last_octet: u8, port: u16) -> SocketAddrV4 {
    SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, last_octet), port)
}

//! Scripted [`DnsTransport`] for exercising the engine without sockets.

use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use snapr_common::error::TransportError;
use snapr_protocols::dns::{self, DnsMessage};

use crate::network::transport::DnsTransport;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Answer(Vec<Ipv4Addr>),
    Timeout,
    Refused,
}

/// Replies are keyed by server address and domain. Unknown pairs time out.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: HashMap<(Ipv4Addr, String), Reply>,
    latency: Duration,
    calls: Mutex<Vec<(Ipv4Addr, String)>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn reply(mut self, server: Ipv4Addr, domain: &str, reply: Reply) -> Self {
        self.replies.insert((server, domain.to_string()), reply);
        self
    }

    pub fn answer(self, server: Ipv4Addr, domain: &str, addrs: &[Ipv4Addr]) -> Self {
        self.reply(server, domain, Reply::Answer(addrs.to_vec()))
    }

    pub fn calls(&self) -> Vec<(Ipv4Addr, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of queries that were awaiting a reply at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn query_a(
        &self,
        server: SocketAddrV4,
        domain: &str,
        _timeout: Duration,
    ) -> Result<DnsMessage, TransportError> {
        let key = (*server.ip(), domain.to_string());
        self.calls.lock().unwrap().push(key.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(&key).cloned().unwrap_or(Reply::Timeout) {
            Reply::Answer(addrs) => {
                let query = dns::create_a_packet(domain, 1)?;
                Ok(DnsMessage::parse(&dns::create_a_response(&query, &addrs)?)?)
            }
            Reply::Timeout => Err(TransportError::Timeout),
            Reply::Refused => Err(TransportError::Io(io::Error::from(
                io::ErrorKind::ConnectionRefused,
            ))),
        }
    }
}

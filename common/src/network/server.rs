use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

use crate::config::DEFAULT_DNS_PORT;

/// A resolver assumed honest, queried to build the baseline.
///
/// The port stays unset when the server was given as a bare address, so a
/// run-wide default can still be applied to it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrustedServer {
    ip: Ipv4Addr,
    port: Option<u16>,
}

impl TrustedServer {
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            ip,
            port: Some(port),
        }
    }

    pub fn bare(ip: Ipv4Addr) -> Self {
        Self { ip, port: None }
    }

    pub fn addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.ip, self.port.unwrap_or(DEFAULT_DNS_PORT))
    }

    /// Sets the port when the server was given without one.
    pub fn with_default_port(self, port: u16) -> Self {
        Self {
            port: self.port.or(Some(port)),
            ..self
        }
    }
}

impl fmt::Display for TrustedServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) if port != DEFAULT_DNS_PORT => write!(f, "{}:{port}", self.ip),
            _ => write!(f, "{}", self.ip),
        }
    }
}

impl FromStr for TrustedServer {
    type Err = String;

    /// Parses `1.1.1.1` or `1.1.1.1:5353`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ip) = s.parse::<Ipv4Addr>() {
            return Ok(Self::bare(ip));
        }
        s.parse::<SocketAddrV4>()
            .map(|addr| Self::new(*addr.ip(), addr.port()))
            .map_err(|e| format!("invalid trusted server '{s}': {e}"))
    }
}

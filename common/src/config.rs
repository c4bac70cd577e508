use std::net::Ipv4Addr;
use std::time::Duration;

use crate::error::SetupError;
use crate::network::server::TrustedServer;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_DOMAINS: &[&str] = &["terra.com.br"];
pub const DEFAULT_TRUSTED_SERVERS: &[Ipv4Addr] =
    &[Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(8, 8, 8, 8)];

/// Immutable settings for a single discovery run.
///
/// Built once by the CLI and handed by reference to every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound on probes in flight at the same time.
    pub concurrency: usize,
    /// Known-good domains asked of every trusted server and candidate.
    pub domains: Vec<String>,
    /// Resolvers whose answers form the baseline.
    pub trusted_servers: Vec<TrustedServer>,
    /// Port queried on every candidate.
    pub dns_port: u16,
    /// Bound on a single question/answer exchange.
    pub timeout: Duration,
    /// 0 prints everything, 1 hides decoration and progress, 2 also hides warnings.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            domains: DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect(),
            trusted_servers: DEFAULT_TRUSTED_SERVERS
                .iter()
                .map(|ip| TrustedServer::new(*ip, DEFAULT_DNS_PORT))
                .collect(),
            dns_port: DEFAULT_DNS_PORT,
            timeout: DEFAULT_TIMEOUT,
            quiet: 0,
        }
    }
}

impl Config {
    /// Rejects settings the probing engine cannot run with.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.concurrency == 0 {
            return Err(SetupError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.domains.iter().all(|d| d.trim().is_empty()) {
            return Err(SetupError::InvalidConfig(
                "at least one known domain is required".to_string(),
            ));
        }
        if self.trusted_servers.is_empty() {
            return Err(SetupError::InvalidConfig(
                "at least one trusted server is required".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(SetupError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

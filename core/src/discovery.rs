//! # Resolver Discovery Service
//!
//! Implements the "find matching resolvers" use case.
//!
//! The service owns the run configuration and the transport, and is
//! responsible for the phase barrier: probing starts only once the baseline
//! has been fully resolved.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use snapr_common::config::Config;
use snapr_common::input;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::baseline;
use crate::network::transport::DnsTransport;
use crate::scanner::{self, DiscoveredServer, ProbeContext, ProgressHook};

/// What a finished run found.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub servers: Vec<DiscoveredServer>,
    /// Probes completed, malformed candidates included.
    pub probed: usize,
    /// Domains no trusted server answered for. Probes for them cannot match.
    pub empty_baselines: Vec<String>,
    pub elapsed: Duration,
}

impl DiscoveryReport {
    pub fn addrs(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.servers.iter().map(|server| server.addr)
    }
}

/// Application service for resolver discovery.
///
/// Orchestrates a run by:
/// 1. validating the configuration and the candidate list,
/// 2. freezing the baseline answers of the trusted servers,
/// 3. handing every candidate to the bounded worker pool.
pub struct DiscoveryService {
    transport: Arc<dyn DnsTransport>,
    cfg: Config,
}

impl DiscoveryService {
    pub fn new(transport: Arc<dyn DnsTransport>, cfg: Config) -> Self {
        Self { transport, cfg }
    }

    /// Runs both phases against `candidates`.
    ///
    /// Fails with a [`snapr_common::error::SetupError`] before any network
    /// activity when the configuration is invalid or no candidate is an IPv4
    /// address. Network failures never fail the run.
    pub async fn perform_discovery(
        &self,
        candidates: Vec<String>,
        on_probe_done: Option<ProgressHook>,
    ) -> anyhow::Result<DiscoveryReport> {
        self.cfg.validate()?;
        input::ensure_usable(&candidates)?;

        let start_time: Instant = Instant::now();

        // 1. Baseline, awaited in full before any probe exists
        info!(
            "Resolving {} domains on {} trusted servers",
            self.cfg.domains.len(),
            self.cfg.trusted_servers.len()
        );
        let baseline = baseline::resolve_baselines(
            self.transport.as_ref(),
            &self.cfg.trusted_servers,
            &self.cfg.domains,
            self.cfg.timeout,
        )
        .await;

        let empty_baselines: Vec<String> = baseline
            .empty_domains(&self.cfg.domains)
            .into_iter()
            .map(str::to_string)
            .collect();
        for domain in &empty_baselines {
            warn!("No trusted server answered for {domain}, no candidate can match it");
        }

        // 2. Probes
        let probed: usize = candidates.len();
        info!(
            "Probing {probed} targets with {} workers",
            self.cfg.concurrency
        );
        let ctx = Arc::new(ProbeContext {
            transport: self.transport.clone(),
            domains: self.cfg.domains.clone(),
            baseline,
            dns_port: self.cfg.dns_port,
            timeout: self.cfg.timeout,
        });
        let servers =
            scanner::run_probes(candidates, ctx, self.cfg.concurrency, on_probe_done).await?;

        Ok(DiscoveryReport {
            servers,
            probed,
            empty_baselines,
            elapsed: start_time.elapsed(),
        })
    }
}

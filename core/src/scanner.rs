//! Phase two: probing candidates under a concurrency limit.
//!
//! Every candidate becomes one [`probe`] task. A [`Semaphore`] admits at most
//! `concurrency` of them at a time, in input order. Matching outcomes travel
//! over a channel to a single aggregating task, so the result list has exactly
//! one writer. [`run_probes`] returns only after every task has finished.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::ensure;
use snapr_common::network::baseline::BaselineAnswerSet;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::network::transport::DnsTransport;

mod probe;

pub use probe::probe;

/// Called once per finished probe with the number of probes finished so far.
pub type ProgressHook = Arc<dyn Fn(usize) + Send + Sync>;

/// Everything a probe reads. Shared read-only between all probe tasks.
pub struct ProbeContext {
    pub transport: Arc<dyn DnsTransport>,
    pub domains: Vec<String>,
    pub baseline: BaselineAnswerSet,
    pub dns_port: u16,
    pub timeout: Duration,
}

/// Result of probing one valid candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub addr: Ipv4Addr,
    pub matched_domains: Vec<String>,
}

impl ProbeOutcome {
    pub fn matched(&self) -> bool {
        !self.matched_domains.is_empty()
    }
}

/// A candidate that agreed with the baseline on at least one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredServer {
    pub addr: Ipv4Addr,
    pub matched_domains: Vec<String>,
}

impl From<ProbeOutcome> for DiscoveredServer {
    fn from(outcome: ProbeOutcome) -> Self {
        Self {
            addr: outcome.addr,
            matched_domains: outcome.matched_domains,
        }
    }
}

/// Probes every candidate and collects the ones that matched.
///
/// Each address is recorded once, however many domains it matched and however
/// often it appears in `candidates`. Completion order, and therefore result
/// order, depends on per-candidate latency.
pub async fn run_probes(
    candidates: Vec<String>,
    ctx: Arc<ProbeContext>,
    concurrency: usize,
    on_probe_done: Option<ProgressHook>,
) -> anyhow::Result<Vec<DiscoveredServer>> {
    ensure!(concurrency > 0, "concurrency must be at least 1");

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let completed = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::unbounded_channel::<ProbeOutcome>();
    let aggregator = tokio::spawn(aggregate(rx));

    let mut tasks: JoinSet<()> = JoinSet::new();
    for candidate in candidates {
        let permit = semaphore.clone().acquire_owned().await?;
        let ctx = ctx.clone();
        let tx = tx.clone();
        let completed = completed.clone();
        let on_probe_done = on_probe_done.clone();

        tasks.spawn(async move {
            if let Some(outcome) = probe(&candidate, &ctx).await
                && outcome.matched()
            {
                let _ = tx.send(outcome);
            }
            drop(permit);

            let done: usize = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(hook) = &on_probe_done {
                hook(done);
            }
        });

        reap(&mut tasks);
    }
    drop(tx);

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("Probe task failed: {e}");
        }
    }

    let discovered: Vec<DiscoveredServer> = aggregator.await?;
    debug!(
        "{} probes finished, {} servers matched",
        completed.load(Ordering::Relaxed),
        discovered.len()
    );
    Ok(discovered)
}

/// Drops finished tasks so the set does not grow with the candidate list.
fn reap(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.try_join_next() {
        if let Err(e) = joined {
            error!("Probe task failed: {e}");
        }
    }
}

async fn aggregate(mut rx: mpsc::UnboundedReceiver<ProbeOutcome>) -> Vec<DiscoveredServer> {
    let mut seen: HashSet<Ipv4Addr> = HashSet::new();
    let mut discovered: Vec<DiscoveredServer> = Vec::new();

    while let Some(outcome) = rx.recv().await {
        if !seen.insert(outcome.addr) {
            continue;
        }
        debug!(
            "{} matched on {}",
            outcome.addr,
            outcome.matched_domains.join(", ")
        );
        discovered.push(outcome.into());
    }
    discovered
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

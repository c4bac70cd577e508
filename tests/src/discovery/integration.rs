use std::collections::HashSet;
use std::io::Write;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use snapr_common::config::Config;
use snapr_common::error::SetupError;
use snapr_common::input;
use snapr_common::network::server::TrustedServer;
use snapr_core::discovery::{DiscoveryReport, DiscoveryService};
use snapr_core::network::transport::UdpTransport;
use snapr_core::scanner::ProgressHook;

use crate::support::{FakeResolver, loopback};

const DOMAIN: &str = "example.test";
const BASELINE_ADDR: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 9);
const FORGED_ADDR: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);

fn config(trusted: &FakeResolver, dns_port: u16) -> Config {
    Config {
        concurrency: 4,
        domains: vec![DOMAIN.to_string()],
        trusted_servers: vec![TrustedServer::new(*trusted.addr().ip(), trusted.port())],
        dns_port,
        timeout: Duration::from_secs(1),
        quiet: 0,
    }
}

async fn run(cfg: Config, candidates: &[&str]) -> anyhow::Result<DiscoveryReport> {
    let candidates: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
    DiscoveryService::new(Arc::new(UdpTransport), cfg)
        .perform_discovery(candidates, None)
        .await
}

fn found(report: &DiscoveryReport) -> HashSet<Ipv4Addr> {
    report.addrs().collect()
}

/// A resolver that mirrors the trusted answers is discovered over real UDP.
#[tokio::test]
async fn mirroring_resolver_is_discovered() {
    let trusted = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[BASELINE_ADDR])
        .await
        .unwrap();
    let mirror = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[FORGED_ADDR, BASELINE_ADDR])
        .await
        .unwrap();

    let report = run(config(&trusted, mirror.port()), &["not-an-ip", "127.0.0.1"])
        .await
        .unwrap();

    assert_eq!(found(&report), HashSet::from([Ipv4Addr::LOCALHOST]));
    assert_eq!(report.probed, 2);
    assert_eq!(report.servers[0].matched_domains, vec![DOMAIN.to_string()]);
    assert_eq!(trusted.queries(), 1);
    assert_eq!(mirror.queries(), 1);
}

#[tokio::test]
async fn forging_resolver_is_not_discovered() {
    let trusted = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[BASELINE_ADDR])
        .await
        .unwrap();
    let forger = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[FORGED_ADDR])
        .await
        .unwrap();

    let report = run(config(&trusted, forger.port()), &["127.0.0.1"]).await.unwrap();

    assert!(report.servers.is_empty());
}

#[tokio::test]
async fn silent_resolver_times_out_without_failing_the_run() {
    let trusted = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[BASELINE_ADDR])
        .await
        .unwrap();
    let silent = FakeResolver::silent(loopback(1, 0)).await.unwrap();

    let done = Arc::new(AtomicUsize::new(0));
    let hook_done = done.clone();
    let hook: ProgressHook = Arc::new(move |_| {
        hook_done.fetch_add(1, Ordering::SeqCst);
    });

    let report = DiscoveryService::new(Arc::new(UdpTransport), config(&trusted, silent.port()))
        .perform_discovery(vec!["127.0.0.1".to_string()], Some(hook))
        .await
        .unwrap();

    assert!(report.servers.is_empty());
    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(silent.queries(), 1);
}

#[tokio::test]
async fn unreachable_baseline_is_reported_not_fatal() {
    let trusted = FakeResolver::silent(loopback(1, 0)).await.unwrap();
    let mirror = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[BASELINE_ADDR])
        .await
        .unwrap();

    let report = run(config(&trusted, mirror.port()), &["127.0.0.1"]).await.unwrap();

    assert!(report.servers.is_empty());
    assert_eq!(report.empty_baselines, vec![DOMAIN.to_string()]);
}

/// Zero usable lines abort the run before a single packet is sent.
#[tokio::test]
async fn unusable_targets_file_sends_nothing() {
    let trusted = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[BASELINE_ADDR])
        .await
        .unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not-an-ip\nlocalhost\n").unwrap();

    let candidates = input::read_candidates(file.path()).unwrap();
    let err = DiscoveryService::new(Arc::new(UdpTransport), config(&trusted, 53))
        .perform_discovery(candidates, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SetupError>(),
        Some(SetupError::NoUsableCandidates(3))
    ));
    assert_eq!(trusted.queries(), 0);
}

/// Several candidates on distinct loopback addresses sharing one port.
#[tokio::test]
#[cfg(target_os = "linux")]
async fn only_agreeing_candidates_are_discovered() {
    let trusted = FakeResolver::spawn(loopback(1, 0), DOMAIN, &[BASELINE_ADDR])
        .await
        .unwrap();
    let mirror = match FakeResolver::spawn(loopback(2, 0), DOMAIN, &[BASELINE_ADDR]).await {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Skipping multi-address test: cannot bind 127.0.0.2 ({e})");
            return;
        }
    };
    let port = mirror.port();
    let Ok(forger) = FakeResolver::spawn(loopback(3, port), DOMAIN, &[FORGED_ADDR]).await
    else {
        eprintln!("Skipping multi-address test: port {port} taken on 127.0.0.3");
        return;
    };

    let report = run(
        config(&trusted, port),
        &["127.0.0.2", "garbage", "127.0.0.3", "127.0.0.4", "127.0.0.2"],
    )
    .await
    .unwrap();

    assert_eq!(found(&report), HashSet::from([Ipv4Addr::new(127, 0, 0, 2)]));
    assert_eq!(report.servers.len(), 1);
    assert_eq!(report.probed, 5);
    assert_eq!(forger.queries(), 1);
}

use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use tracing::Instrument;

use crate::terminal::{colors, print, progress::ProbeProgress};
use snapr_common::{config::Config, input};
use snapr_core::discovery::{DiscoveryReport, DiscoveryService};
use snapr_core::network::transport::UdpTransport;
use snapr_core::scanner::DiscoveredServer;

type Detail = (String, ColoredString);

pub async fn discover(targets_file: Option<&Path>, cfg: &Config) -> anyhow::Result<()> {
    let candidates: Vec<String> = match targets_file {
        Some(path) => input::read_candidates(path)?,
        None => Vec::new(),
    };

    print::header("getting ready for discovery", cfg.quiet);

    let progress = ProbeProgress::new(candidates.len());
    let service = DiscoveryService::new(Arc::new(UdpTransport), cfg.clone());
    let report: DiscoveryReport = service
        .perform_discovery(candidates, Some(progress.hook()))
        .instrument(progress.span().clone())
        .await?;
    drop(progress);

    discovery_ends(&report, cfg);
    Ok(())
}

fn discovery_ends(report: &DiscoveryReport, cfg: &Config) {
    let mut servers: Vec<&DiscoveredServer> = report.servers.iter().collect();
    servers.sort_by_key(|server| server.addr);

    if servers.is_empty() {
        print::header("zero resolvers matched", cfg.quiet);
    } else {
        print::header("resolver discovery", cfg.quiet);
        print_servers(&servers, cfg);
    }
    print_summary(servers.len(), report, cfg);

    let addrs: Vec<Ipv4Addr> = servers.iter().map(|server| server.addr).collect();
    print::results(&addrs);
}

fn print_servers(servers: &[&DiscoveredServer], cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }
    for (idx, server) in servers.iter().enumerate() {
        print::tree_head(idx, &server.addr.to_string());
        let details: Vec<Detail> = vec![(
            "Matched".to_string(),
            server.matched_domains.join(", ").normal(),
        )];
        print::as_tree_one_level(details);
    }
}

fn print_summary(found: usize, report: &DiscoveryReport, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }
    let resolvers: ColoredString = format!("{found} matching resolvers").bold().green();
    let probed: ColoredString = format!("{} targets", report.probed).bold();
    let total_time: ColoredString = format_elapsed(report.elapsed).bold().yellow();
    let output: ColoredString =
        format!("Discovery Complete: {resolvers} out of {probed} in {total_time}")
            .color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
    print::fat_separator();
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

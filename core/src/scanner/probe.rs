use std::net::{Ipv4Addr, SocketAddrV4};

use snapr_common::network::candidate;
use tracing::trace;

use super::{ProbeContext, ProbeOutcome};

/// Evaluates one candidate against every known domain.
///
/// Returns `None` for candidates that are not IPv4 literals. Otherwise the
/// outcome lists the domains whose answers overlapped the baseline; an empty
/// list means the candidate did not match.
pub async fn probe(candidate: &str, ctx: &ProbeContext) -> Option<ProbeOutcome> {
    let addr: Ipv4Addr = candidate::parse_ipv4(candidate)?;
    let resolver = SocketAddrV4::new(addr, ctx.dns_port);
    let mut matched_domains: Vec<String> = Vec::new();

    for domain in &ctx.domains {
        match ctx.transport.query_a(resolver, domain, ctx.timeout).await {
            Ok(message) => {
                if message
                    .a_records()
                    .any(|answer| ctx.baseline.contains(domain, &answer))
                {
                    trace!("{addr} agrees with the baseline on {domain}");
                    matched_domains.push(domain.clone());
                }
            }
            Err(e) if e.is_timeout() => {
                trace!("{addr} timed out on {domain}, giving up");
                break;
            }
            Err(e) => {
                trace!("{addr} failed on {domain}: {e}");
            }
        }
    }

    Some(ProbeOutcome {
        addr,
        matched_domains,
    })
}

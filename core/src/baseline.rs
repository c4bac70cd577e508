//! Phase one: freezing what the trusted servers say about each known domain.

use std::time::Duration;

use snapr_common::network::{baseline::BaselineAnswerSet, server::TrustedServer};
use tracing::{debug, warn};

use crate::network::transport::DnsTransport;

/// Queries every trusted server for every domain, in order.
///
/// A timeout marks the server as unreachable and skips its remaining domains.
/// Any other failure only skips the current domain. Nothing here is fatal: a
/// domain nobody answered for ends up with an empty baseline.
pub async fn resolve_baselines(
    transport: &dyn DnsTransport,
    servers: &[TrustedServer],
    domains: &[String],
    timeout: Duration,
) -> BaselineAnswerSet {
    let mut baseline = BaselineAnswerSet::new();

    for server in servers {
        for domain in domains {
            match transport.query_a(server.addr(), domain, timeout).await {
                Ok(message) => {
                    let before: usize = baseline.answers(domain).len();
                    baseline.record(domain, message.a_records());
                    debug!(
                        "{server} returned {} addresses for {domain}",
                        baseline.answers(domain).len() - before
                    );
                }
                Err(e) if e.is_timeout() => {
                    warn!("{server} timed out on {domain}, skipping its remaining domains");
                    break;
                }
                Err(e) => {
                    warn!("Error when checking {domain} on {server}: {e}");
                }
            }
        }
    }

    baseline
}

//! Candidate hosts read from the target list.
//!
//! Candidates stay raw strings until a probe picks them up. Validation happens
//! per probe and is never cached.

use std::net::Ipv4Addr;

/// Parses a raw target line as an IPv4 literal.
///
/// Anything else (hostnames, IPv6, stray whitespace) yields `None` and the
/// candidate is skipped without a diagnostic.
pub fn parse_ipv4(candidate: &str) -> Option<Ipv4Addr> {
    candidate.parse::<Ipv4Addr>().ok()
}

/// Counts the candidates that would become probe subjects.
pub fn count_usable<S: AsRef<str>>(candidates: &[S]) -> usize {
    candidates
        .iter()
        .filter(|c| parse_ipv4(c.as_ref()).is_some())
        .count()
}

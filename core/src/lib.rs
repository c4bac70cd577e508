//! # snapr core
//!
//! The two-phase probing engine:
//!
//! 1. [`baseline`] asks the trusted servers for every known domain and freezes
//!    their answers.
//! 2. [`scanner`] probes every candidate under a concurrency limit and keeps
//!    those whose answers overlap the baseline.
//!
//! [`discovery::DiscoveryService`] sequences both phases. All DNS traffic goes
//! through the [`network::transport::DnsTransport`] seam.

pub mod baseline;
pub mod discovery;
pub mod network;
pub mod scanner;

#[cfg(test)]
mod testing;

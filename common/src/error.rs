//! Error taxonomy shared across the workspace.
//!
//! Only [`SetupError`] is fatal to a run. [`TransportError`] and [`DnsError`]
//! stay local to the query that raised them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run before any network activity.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("could not read targets file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no targets provided")]
    NoCandidates,

    #[error("none of the {0} targets is a valid IPv4 address")]
    NoUsableCandidates(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures of a single question/answer exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("query timed out")]
    Timeout,

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed response: {0}")]
    Malformed(#[from] DnsError),
}

impl TransportError {
    /// A timed out server is presumed unreachable for the rest of its domains.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Timeout => true,
            TransportError::Io(e) => e.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

/// Wire codec failures.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("could not encode query for {0}")]
    Encode(String),

    #[error("could not decode message: {0}")]
    Decode(String),

    #[error("message is a query, not a response")]
    NotAResponse,
}

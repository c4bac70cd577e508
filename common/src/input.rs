//! Loading the candidate list from disk.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::SetupError;
use crate::network::candidate;

/// Reads one candidate per line.
///
/// Lines are kept verbatim apart from the line terminator. Blank lines and
/// duplicates are not filtered here; invalid entries are skipped by the probe
/// that receives them.
pub fn read_candidates(path: &Path) -> Result<Vec<String>, SetupError> {
    let unreadable = |source| SetupError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let candidates = BufReader::new(file)
        .lines()
        .collect::<Result<Vec<String>, _>>()
        .map_err(unreadable)?;

    debug!("read {} lines from {}", candidates.len(), path.display());
    Ok(candidates)
}

/// Fails when nothing in `candidates` could ever be probed.
pub fn ensure_usable(candidates: &[String]) -> Result<(), SetupError> {
    if candidates.is_empty() {
        return Err(SetupError::NoCandidates);
    }
    if candidate::count_usable(candidates) == 0 {
        return Err(SetupError::NoUsableCandidates(candidates.len()));
    }
    Ok(())
}

//! Command path resolution.
//!
//! Network tools live in different places depending on the distribution
//! (`/sbin/ip` vs `/usr/bin/ip`, `ifconfig` missing entirely on modern
//! installs). [`resolve`] tries a list of well-known locations before
//! falling back to a `PATH` search.

use std::path::{Path, PathBuf};

use crate::logging::targets;

/// Return the first usable executable for `name`.
///
/// Each candidate is checked verbatim; the first one that is an executable
/// file wins. If none match, `name` is looked up on `PATH`. `None` means
/// the tool is unavailable, which callers treat as "skip this data" unless
/// the tool is essential.
pub fn resolve<P: AsRef<Path>>(name: &str, candidates: &[P]) -> Option<PathBuf> {
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if let Ok(path) = which::which(candidate) {
            tracing::trace!(target: targets::COMMAND, name, path = %path.display(), "resolved from candidate");
            return Some(path);
        }
    }

    match which::which(name) {
        Ok(path) => {
            tracing::trace!(target: targets::COMMAND, name, path = %path.display(), "resolved from PATH");
            Some(path)
        }
        Err(e) => {
            tracing::debug!(target: targets::COMMAND, name, error = %e, "command not found");
            None
        }
    }
}

/// Default candidate locations for a tool on Unix-like systems.
pub fn unix_candidates(name: &str) -> Vec<PathBuf> {
    ["/bin", "/sbin", "/usr/bin", "/usr/sbin"]
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .collect()
}

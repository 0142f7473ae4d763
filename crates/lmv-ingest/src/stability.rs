//! Waiting for a file transfer to finish.

use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

/// Result of waiting for a file to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// Two consecutive size samples matched.
    Stable,
    /// The wait was abandoned before the file settled.
    Interrupted,
}

/// Sample the size, wait `delay`, and sample again.
///
/// An I/O error on either sample counts as "stopped growing" so a file
/// deleted mid-check cannot stall the loop.
pub fn has_stopped_growing(path: &Path, delay: Duration) -> bool {
    let Ok(before) = std::fs::metadata(path).map(|m| m.len()) else {
        return true;
    };
    thread::sleep(delay);
    let Ok(after) = std::fs::metadata(path).map(|m| m.len()) else {
        return true;
    };
    trace!(path = %path.display(), before, after, "Size sampled");
    before == after
}

/// Block until the file stops growing.
///
/// `keep_waiting` is consulted before every sample; returning false abandons
/// the wait.
pub fn wait_until_stable(
    path: &Path,
    delay: Duration,
    keep_waiting: impl Fn() -> bool,
) -> Stability {
    let mut samples = 0usize;
    loop {
        if !keep_waiting() {
            return Stability::Interrupted;
        }
        if has_stopped_growing(path, delay) {
            return Stability::Stable;
        }
        samples += 1;
        debug!(path = %path.display(), samples, "File still growing, waiting");
    }
}

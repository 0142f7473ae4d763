use std::path::PathBuf;

use lmv_ingest::Destination;
use lmv_report::WrittenLogs;

/// What happened to one file that reached the routing stage.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// The file as it arrived in the watched folder.
    pub source: PathBuf,
    pub destination: Destination,
    /// Where the routed file now lives.
    pub routed_to: PathBuf,
    pub total_errors: usize,
    pub logs: Option<WrittenLogs>,
    /// True when a BOM-free copy was routed in place of the original.
    pub healed: bool,
}

impl ProcessOutcome {
    pub fn succeeded(&self) -> bool {
        self.destination == Destination::Success
    }
}

/// Counters for one watch session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub success: usize,
    pub error: usize,
}

impl WatchStats {
    pub fn record(&mut self, outcome: &ProcessOutcome) {
        if outcome.succeeded() {
            self.success += 1;
        } else {
            self.error += 1;
        }
    }

    /// Count a file that could not be processed to completion.
    pub fn record_failure(&mut self) {
        self.error += 1;
    }

    pub fn total(&self) -> usize {
        self.success + self.error
    }
}

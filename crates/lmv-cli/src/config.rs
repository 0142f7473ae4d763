//! Watch-loop configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use lmv_ingest::SizeLimits;
use serde::{Deserialize, Serialize};

/// Settings for the watch loop and the per-file pipeline.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Folder that is polled for new CSV files.
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Delay between directory polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Delay between the two size samples of the stability check, in milliseconds.
    #[serde(default = "default_stability_delay_ms")]
    pub stability_delay_ms: u64,

    /// Exit when no file arrives for this long after the first one (0 disables).
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Row count above which medium and large files show progress.
    #[serde(default = "default_progress_rows")]
    pub progress_rows: usize,

    /// File names containing any of these are never processed.
    #[serde(default = "default_skip_markers")]
    pub skip_markers: Vec<String>,

    #[serde(default)]
    pub limits: SizeLimits,
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from("./watch_folder")
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_stability_delay_ms() -> u64 {
    2000
}

fn default_idle_timeout_secs() -> u64 {
    10
}

fn default_progress_rows() -> usize {
    1000
}

fn default_skip_markers() -> Vec<String> {
    vec!["_comma_fixed".to_string()]
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir(),
            poll_interval_ms: default_poll_interval_ms(),
            stability_delay_ms: default_stability_delay_ms(),
            idle_timeout_secs: default_idle_timeout_secs(),
            progress_rows: default_progress_rows(),
            skip_markers: default_skip_markers(),
            limits: SizeLimits::default(),
        }
    }
}

impl WatchConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stability_delay(&self) -> Duration {
        Duration::from_millis(self.stability_delay_ms)
    }

    /// Idle timeout, or `None` when auto-exit is disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

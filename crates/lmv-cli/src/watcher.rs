//! The polling watch loop.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use lmv_ingest::{DirectorySnapshot, Stability, WatchLayout, is_skipped, wait_until_stable};
use tracing::{debug, error, info};

use crate::config::WatchConfig;
use crate::pipeline::{Stage, process_file};
use crate::types::WatchStats;

/// Polls the watched folder and processes arrivals one at a time.
pub struct Watcher<'a> {
    config: &'a WatchConfig,
    layout: WatchLayout,
    shutdown: &'a AtomicBool,
    stats: WatchStats,
    last_processed: Option<Instant>,
}

impl<'a> Watcher<'a> {
    pub fn new(config: &'a WatchConfig, shutdown: &'a AtomicBool) -> Self {
        Self {
            config,
            layout: WatchLayout::new(&config.watch_dir),
            shutdown,
            stats: WatchStats::default(),
            last_processed: None,
        }
    }

    pub fn layout(&self) -> &WatchLayout {
        &self.layout
    }

    /// Create the folders and process the files already present.
    pub fn sweep(&mut self) -> Result<DirectorySnapshot> {
        self.layout.ensure().context("prepare watch folder")?;
        let snapshot = self.snapshot()?;
        if !snapshot.is_empty() {
            info!(files = snapshot.len(), "Processing files already in the watch folder");
        }
        let existing: Vec<PathBuf> = snapshot.files().map(Path::to_path_buf).collect();
        self.process_all(&existing);
        Ok(snapshot)
    }

    /// Sweep, then poll until shutdown or the idle timeout.
    pub fn run(mut self) -> Result<WatchStats> {
        let mut previous = self.sweep()?;
        info!(dir = %self.layout.root().display(), "Watching for new files");

        while !self.stopping() {
            thread::sleep(self.config.poll_interval());

            let current = self.snapshot()?;
            let arrivals = current.arrivals(&previous);
            self.process_all(&arrivals);
            previous = current;

            if self.idle_expired() {
                info!("No new files arrived, finishing");
                break;
            }
        }

        Ok(self.stats)
    }

    /// Sweep once and return.
    pub fn run_once(mut self) -> Result<WatchStats> {
        self.sweep()?;
        Ok(self.stats)
    }

    fn snapshot(&self) -> Result<DirectorySnapshot> {
        DirectorySnapshot::capture(self.layout.root())
            .with_context(|| format!("scan {}", self.layout.root().display()))
    }

    fn process_all(&mut self, files: &[PathBuf]) {
        for path in files {
            if self.stopping() {
                return;
            }
            if is_skipped(path, &self.config.skip_markers) {
                debug!(file = %path.display(), "Skipping generated file");
                continue;
            }
            info!(stage = %Stage::Detected, file = %path.display(), "New file detected");
            self.process_one(path);
        }
    }

    fn process_one(&mut self, path: &Path) {
        debug!(stage = %Stage::Stabilizing, file = %path.display(), "Waiting for transfer to finish");
        let shutdown = self.shutdown;
        let stability = wait_until_stable(path, self.config.stability_delay(), || {
            !shutdown.load(Ordering::Relaxed)
        });
        if stability == Stability::Interrupted {
            return;
        }

        match process_file(path, &self.layout, self.config) {
            Ok(outcome) => self.stats.record(&outcome),
            Err(e) => {
                let message = format!("{e:#}");
                error!(file = %path.display(), error = %message, "File could not be processed");
                self.stats.record_failure();
            }
        }
        self.last_processed = Some(Instant::now());
    }

    fn stopping(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    fn idle_expired(&self) -> bool {
        match (self.config.idle_timeout(), self.last_processed) {
            (Some(timeout), Some(last)) => last.elapsed() >= timeout,
            _ => false,
        }
    }
}

//! Subcommand handlers for `watch`, `check` and `schemas`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use chrono::Local;
use comfy_table::Table;
use tracing::{info, warn};

use lmv_cli::config::WatchConfig;
use lmv_cli::pipeline::assess_file;
use lmv_cli::types::WatchStats;
use lmv_cli::watcher::Watcher;
use lmv_model::Schema;
use lmv_report::{render_details, render_summary};

use crate::cli::{CheckArgs, WatchArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_schemas() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Layout"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    for schema in Schema::all() {
        table.add_row(vec![
            schema.code().to_string(),
            schema.label().to_string(),
            schema.columns().join(","),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Validate one file in place. Returns true when it would be accepted.
pub fn run_check(args: &CheckArgs) -> Result<bool> {
    if !args.file.is_file() {
        bail!("file not found: {}", args.file.display());
    }
    let assessed = assess_file(&args.file, &WatchConfig::default());
    let assessment = &assessed.assessment;

    if assessment.is_valid() {
        println!("{}: no errors found", assessment.file_name);
        return Ok(true);
    }

    print!("{}", render_summary(assessment, None));
    if let Some(report) = assessment.report.as_ref().filter(|report| !report.passed()) {
        println!();
        print!("{}", render_details(&assessment.file_name, report));
    }
    Ok(false)
}

pub fn run_watch(args: &WatchArgs) -> Result<WatchStats> {
    let config = watch_config(args)?;
    let once = args.once;

    println!("Watching: {}", config.watch_dir.display());
    println!("Valid files go to success/, rejected files to error/, logs to logs/");
    if !once {
        println!("Press Ctrl+C to stop");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start runtime")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let stats = runtime.block_on(async {
        let signal = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, finishing the current file");
                signal.store(true, Ordering::Relaxed);
            }
        });

        let flag = Arc::clone(&shutdown);
        tokio::task::spawn_blocking(move || {
            let watcher = Watcher::new(&config, &flag);
            if once {
                watcher.run_once()
            } else {
                watcher.run()
            }
        })
        .await
        .context("watch loop aborted")?
    })?;
    runtime.shutdown_background();

    info!(
        success = stats.success,
        error = stats.error,
        total = stats.total(),
        "Watch session finished"
    );
    println!("Stopped at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    Ok(stats)
}

/// Config file first, then command-line overrides.
fn watch_config(args: &WatchArgs) -> Result<WatchConfig> {
    let mut config = match &args.config {
        Some(path) => WatchConfig::load(path)?,
        None => WatchConfig::default(),
    };
    if let Some(dir) = &args.dir {
        config.watch_dir = dir.clone();
    }
    if let Some(ms) = args.poll_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(ms) = args.stability_ms {
        config.stability_delay_ms = ms;
    }
    if let Some(secs) = args.idle_timeout {
        config.idle_timeout_secs = secs;
    }
    Ok(config)
}

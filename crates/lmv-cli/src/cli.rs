//! CLI argument definitions for the loyalty migration validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lmv",
    version,
    about = "Loyalty migration validator - Check contacts, points and vouchers CSV files",
    long_about = "Validate loyalty migration CSV files dropped into a watched folder.\n\n\
                  Valid files are moved to success/, rejected files to error/ with a\n\
                  summary log (and a row-level detail log) written to logs/."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw row content in trace output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Watch a folder and validate every CSV file that arrives.
    Watch(WatchArgs),

    /// Validate a single file and print its report without moving it.
    Check(CheckArgs),

    /// List the accepted file layouts.
    Schemas,
}

#[derive(Parser)]
pub struct WatchArgs {
    /// Folder to watch (default: ./watch_folder).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// JSON configuration file; flags given here take precedence.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Process the files already present and exit.
    #[arg(long = "once")]
    pub once: bool,

    /// Delay between folder polls, in milliseconds.
    #[arg(long = "poll-ms", value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// Delay between size samples when waiting for a transfer, in milliseconds.
    #[arg(long = "stability-ms", value_name = "MS")]
    pub stability_ms: Option<u64>,

    /// Exit after this many idle seconds once a file was processed (0 never exits).
    #[arg(long = "idle-timeout", value_name = "SECS")]
    pub idle_timeout: Option<u64>,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// The CSV file to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

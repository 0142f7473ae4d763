//! Per-file pipeline: from a stable file in the watched folder to a routed
//! file plus its validation logs.
//!
//! A file moves through [`Stage`]s in order. Any failure before validation
//! becomes a file-level [`Finding`], so every file ends up routed somewhere
//! and one bad file never stops the watch loop.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lmv_ingest::{
    Destination, IngestError, SizeClass, WatchLayout, check_file_size, decode_bytes,
    detect_layout, parse_csv, read_file_bytes, write_bom_free_copy,
};
use lmv_model::header_mismatch_message;
use lmv_report::{FileAssessment, Finding, write_reports};
use lmv_validate::{ReportBuilder, ValidationRun};
use tracing::{debug, error, info, info_span, trace, warn};

use crate::config::WatchConfig;
use crate::logging::redact_value;
use crate::types::ProcessOutcome;

/// Lifecycle of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detected,
    Stabilizing,
    SizeChecked,
    Decoded,
    FormatRepaired,
    Classified,
    Validated,
    Routed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Detected => "detected",
            Self::Stabilizing => "stabilizing",
            Self::SizeChecked => "size_checked",
            Self::Decoded => "decoded",
            Self::FormatRepaired => "format_repaired",
            Self::Classified => "classified",
            Self::Validated => "validated",
            Self::Routed => "routed",
        };
        f.write_str(name)
    }
}

/// Assessment of one file plus the bytes it was read from.
#[derive(Debug)]
pub struct AssessedFile {
    pub assessment: FileAssessment,
    /// Kept so a byte-order-mark-free copy can be written.
    bytes: Option<Vec<u8>>,
}

/// Run every check on `path` without touching the file.
pub fn assess_file(path: &Path, config: &WatchConfig) -> AssessedFile {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut assessment = FileAssessment::new(file_name.clone());

    let size_class = match check_file_size(path, &config.limits) {
        Ok((size, class)) => {
            debug!(stage = %Stage::SizeChecked, size, class = %class, "Size accepted");
            class
        }
        Err(IngestError::FileTooLarge { size, max_size, .. }) => {
            warn!(file = %file_name, size, max_size, "File exceeds size limit");
            assessment.push(Finding::FileTooLarge { size, max_size });
            return AssessedFile {
                assessment,
                bytes: None,
            };
        }
        Err(e) => return unreadable(assessment, &e),
    };

    let bytes = match read_file_bytes(path) {
        Ok(bytes) => bytes,
        Err(e) => return unreadable(assessment, &e),
    };
    let decoded = match decode_bytes(path, &bytes) {
        Ok(decoded) => decoded,
        Err(e) => return unreadable(assessment, &e),
    };
    debug!(stage = %Stage::Decoded, encoding = decoded.encoding.label(), "Decoded");

    if decoded.had_bom {
        assessment.push(Finding::ByteOrderMark);
    }
    let layout = detect_layout(&decoded.text);
    if layout.has_wrong_delimiter() {
        assessment.push(Finding::WrongDelimiter {
            header: layout.header.clone(),
        });
    }
    debug!(
        stage = %Stage::FormatRepaired,
        bom = decoded.had_bom,
        delimiter = %layout.delimiter,
        "Format checked"
    );

    let Some(schema) = layout.schema else {
        warn!(file = %file_name, "Header matches no known layout");
        assessment.push(Finding::HeaderMismatch {
            message: header_mismatch_message(&file_name, &layout.header),
        });
        return AssessedFile {
            assessment,
            bytes: Some(bytes),
        };
    };
    debug!(stage = %Stage::Classified, schema = %schema, "Layout recognized");

    let parsed = match parse_csv(path, &decoded.text, layout.delimiter) {
        Ok(parsed) => parsed,
        Err(e) => return unreadable(assessment, &e),
    };

    let mut run = ValidationRun::new();
    run.prepare(schema, &parsed.rows);

    let progress = progress_bar(size_class, parsed.row_count(), config.progress_rows);
    let mut builder = ReportBuilder::new(schema);
    if let Some(bar) = progress.clone() {
        builder = builder.with_progress(100, move |done, _| bar.set_position(done as u64));
    }
    let report = builder.build(&parsed.rows, &mut run);
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    for failure in report.failures() {
        trace!(row = failure.row, data = redact_value(&failure.raw), "Row failed");
    }
    debug!(
        stage = %Stage::Validated,
        schema = %schema,
        rows = report.rows_checked(),
        errors = report.total_errors(),
        "Rows validated"
    );

    assessment.report = Some(report);
    AssessedFile {
        assessment,
        bytes: Some(bytes),
    }
}

fn unreadable(mut assessment: FileAssessment, error: &IngestError) -> AssessedFile {
    warn!(file = %assessment.file_name, error = %error, "File could not be read");
    assessment.push(Finding::Unreadable {
        reason: error.to_string(),
    });
    AssessedFile {
        assessment,
        bytes: None,
    }
}

fn progress_bar(class: SizeClass, rows: usize, threshold: usize) -> Option<ProgressBar> {
    if !class.wants_progress() || rows <= threshold {
        return None;
    }
    let bar = ProgressBar::new(rows as u64);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} rows") {
        bar.set_style(style);
    }
    bar.set_message(format!("Validating {class} file"));
    Some(bar)
}

/// Assess, log and route one stable file.
///
/// Every routed file gets a summary log. When a byte-order mark is the only
/// defect, a corrected copy is written, validated once more and routed
/// instead; the original is deleted.
pub fn process_file(
    path: &Path,
    layout: &WatchLayout,
    config: &WatchConfig,
) -> Result<ProcessOutcome> {
    let span = info_span!("file", file = %path.display());
    let _guard = span.enter();
    process(path, layout, config, true)
}

fn process(
    path: &Path,
    layout: &WatchLayout,
    config: &WatchConfig,
    allow_heal: bool,
) -> Result<ProcessOutcome> {
    let AssessedFile { assessment, bytes } = assess_file(path, config);

    if allow_heal
        && assessment.only_bom()
        && let Some(bytes) = bytes.as_deref()
    {
        match write_bom_free_copy(path, bytes) {
            Ok(copy) => {
                info!(copy = %copy.display(), "Byte-order mark was the only defect, revalidating copy");
                let mut outcome = process(&copy, layout, config, false)?;
                discard_original(path);
                outcome.source = path.to_path_buf();
                outcome.healed = true;
                return Ok(outcome);
            }
            Err(e) => error!(error = %e, "Could not write corrected copy"),
        }
    }

    finish(path, layout, &assessment)
}

/// Delete a file whose corrected copy was already routed.
///
/// Returns false when the file could not be removed; the copy's outcome
/// stands either way.
fn discard_original(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Could not remove original after routing corrected copy");
            false
        }
    }
}

fn finish(path: &Path, layout: &WatchLayout, assessment: &FileAssessment) -> Result<ProcessOutcome> {
    let destination = if assessment.is_valid() {
        Destination::Success
    } else {
        Destination::Error
    };

    let logs = match write_reports(&layout.logs_dir(), assessment) {
        Ok(logs) => Some(logs),
        Err(e) => {
            error!(error = %e, "Could not write validation log");
            None
        }
    };

    let routed_to = layout
        .route(path, destination)
        .with_context(|| format!("route {}", path.display()))?;

    let total_errors = assessment.total_errors();
    if destination == Destination::Success {
        info!(stage = %Stage::Routed, to = %routed_to.display(), "File passed validation");
    } else {
        warn!(
            stage = %Stage::Routed,
            to = %routed_to.display(),
            errors = total_errors,
            "File failed validation"
        );
    }

    Ok(ProcessOutcome {
        source: path.to_path_buf(),
        destination,
        routed_to,
        total_errors,
        logs,
        healed: false,
    })
}

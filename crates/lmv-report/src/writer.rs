//! Writing logs into the logs folder.

use std::path::{Path, PathBuf};

use lmv_ingest::{file_stem, unique_file_name};
use tracing::info;

use crate::assessment::FileAssessment;
use crate::error::{ReportError, Result};
use crate::render::{render_details, render_summary};

/// Paths of the logs written for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenLogs {
    pub summary: PathBuf,
    /// Present when row-level errors were itemized.
    pub details: Option<PathBuf>,
}

/// Write the summary log and, when rows failed, the detail log.
///
/// Names derive from the assessed file's stem and never overwrite an
/// existing log: `points.txt`, then `points_1.txt`, and so on. The detail
/// log is named after the summary log with a `_details` suffix.
pub fn write_reports(logs_dir: &Path, assessment: &FileAssessment) -> Result<WrittenLogs> {
    let stem = file_stem(Path::new(&assessment.file_name));
    let summary_name = unique_file_name(logs_dir, &stem, "txt");
    let summary_path = logs_dir.join(&summary_name);

    let details = match assessment.report.as_ref() {
        Some(report) if !report.passed() => {
            let summary_stem = file_stem(Path::new(&summary_name));
            let name = unique_file_name(logs_dir, &format!("{summary_stem}_details"), "txt");
            let path = logs_dir.join(&name);
            write_log(&path, &render_details(&assessment.file_name, report))?;
            Some((name, path))
        }
        _ => None,
    };

    let details_name = details.as_ref().map(|(name, _)| name.as_str());
    write_log(&summary_path, &render_summary(assessment, details_name))?;

    info!(
        file = %assessment.file_name,
        log = %summary_path.display(),
        errors = assessment.total_errors(),
        "Wrote validation log"
    );

    Ok(WrittenLogs {
        summary: summary_path,
        details: details.map(|(_, path)| path),
    })
}

fn write_log(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| ReportError::LogWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

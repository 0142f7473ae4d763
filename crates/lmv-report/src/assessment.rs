//! File-level findings and the combined assessment of one file.

use std::fmt;

use lmv_ingest::format_file_size;
use lmv_validate::ValidationReport;
use serde::Serialize;

/// A defect of the file as a whole, found before or instead of row checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The file started with a UTF-8 byte-order mark.
    ByteOrderMark,
    /// The header only matched with semicolons; holds the header fields.
    WrongDelimiter { header: Vec<String> },
    /// The header matched no layout; holds the full diagnostic.
    HeaderMismatch { message: String },
    /// The file exceeded the size ceiling and was not read.
    FileTooLarge { size: u64, max_size: u64 },
    /// The file could not be read, decoded, or parsed.
    Unreadable { reason: String },
}

impl Finding {
    /// The message recorded for this finding.
    pub fn message(&self) -> String {
        match self {
            Self::ByteOrderMark => {
                "The file started with a Byte Order Mark (BOM), which is not supported.".to_string()
            }
            Self::WrongDelimiter { header } => format!(
                "The file uses semicolon (;) separators, but comma (,) is the accepted \
                 format.\n\nFound: {}\nExpected: {}",
                header.join("; "),
                header.join(", ")
            ),
            Self::HeaderMismatch { message } => message.clone(),
            Self::FileTooLarge { size, max_size } => format!(
                "File too large: {} (Maximum: {})",
                format_file_size(*size),
                format_file_size(*max_size)
            ),
            Self::Unreadable { reason } => format!("The file could not be read: {reason}"),
        }
    }

    pub fn is_byte_order_mark(&self) -> bool {
        matches!(self, Self::ByteOrderMark)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Everything known about one processed file.
#[derive(Debug, Clone)]
pub struct FileAssessment {
    /// Name shown in the logs.
    pub file_name: String,
    /// File-level findings in the order they were detected.
    pub findings: Vec<Finding>,
    /// Row validation result; absent when the header never classified.
    pub report: Option<ValidationReport>,
}

impl FileAssessment {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            findings: Vec::new(),
            report: None,
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn timestamp_error_count(&self) -> usize {
        self.report
            .as_ref()
            .map_or(0, ValidationReport::timestamp_error_count)
    }

    pub fn validation_error_count(&self) -> usize {
        self.report
            .as_ref()
            .map_or(0, ValidationReport::validation_error_count)
    }

    /// File-level findings plus both row-level counts.
    pub fn total_errors(&self) -> usize {
        self.findings.len() + self.timestamp_error_count() + self.validation_error_count()
    }

    /// True if row validation produced failing rows.
    pub fn has_row_errors(&self) -> bool {
        self.report.as_ref().is_some_and(|report| !report.passed())
    }

    /// Valid only when the header classified and nothing at all was found.
    pub fn is_valid(&self) -> bool {
        self.report.is_some() && self.findings.is_empty() && !self.has_row_errors()
    }

    /// True when a byte-order mark is the single defect of the file.
    pub fn only_bom(&self) -> bool {
        self.report.is_some()
            && self.total_errors() == 1
            && self.findings.iter().any(Finding::is_byte_order_mark)
    }

    pub fn find(&self, predicate: impl Fn(&Finding) -> bool) -> Option<&Finding> {
        self.findings.iter().find(|finding| predicate(finding))
    }
}

//! Plain-text rendering of summary and detail logs.

use lmv_validate::{RowFailure, ValidationReport};

use crate::assessment::{FileAssessment, Finding};

const SUMMARY_WIDTH: usize = 60;
const DETAIL_WIDTH: usize = 80;
const SECTION_RULE: usize = 40;
const ROW_RULE: usize = 50;

/// One labeled block of the summary log.
struct Section {
    title: &'static str,
    issue: String,
    /// Extra diagnostic printed under the issue line.
    detail: Option<String>,
    solution: &'static str,
}

fn sections(assessment: &FileAssessment) -> Vec<Section> {
    let mut sections = Vec::new();

    if assessment.find(Finding::is_byte_order_mark).is_some() {
        sections.push(Section {
            title: "BYTE ORDER MARK (BOM) ERROR",
            issue: "The file started with a Byte Order Mark (BOM)".to_string(),
            detail: None,
            solution: "Remove the BOM from the file and save as UTF-8 without BOM",
        });
    }

    if let Some(finding) = assessment.find(|f| matches!(f, Finding::WrongDelimiter { .. })) {
        sections.push(Section {
            title: "SEPARATOR FORMAT ERROR",
            issue: "File uses incorrect separator".to_string(),
            detail: Some(finding.message()),
            solution: "Replace all semicolons (;) with commas (,) in the file",
        });
    }

    if let Some(finding) = assessment.find(|f| matches!(f, Finding::FileTooLarge { .. })) {
        sections.push(Section {
            title: "FILE SIZE ERROR",
            issue: finding.message(),
            detail: None,
            solution: "Split the file into smaller chunks and submit them separately",
        });
    }

    if let Some(finding) = assessment.find(|f| matches!(f, Finding::Unreadable { .. })) {
        sections.push(Section {
            title: "FILE READ ERROR",
            issue: finding.message(),
            detail: None,
            solution: "Save the file as UTF-8 comma-separated text and submit it again",
        });
    }

    let timestamp_errors = assessment.timestamp_error_count();
    if timestamp_errors > 0 {
        sections.push(Section {
            title: "TIMESTAMP FORMAT ERRORS",
            issue: format!("Found {timestamp_errors} timestamp errors"),
            detail: None,
            solution: "Common issues: UNIX timestamp is in seconds instead of milliseconds",
        });
    }

    let validation_errors = assessment.validation_error_count();
    if validation_errors > 0 {
        sections.push(Section {
            title: "DATA VALIDATION ERRORS",
            issue: format!("Found {validation_errors} data validation errors"),
            detail: None,
            solution: "Common issues: Invalid field values, empty required fields, incorrect format",
        });
    }

    if let Some(finding) = assessment.find(|f| matches!(f, Finding::HeaderMismatch { .. })) {
        sections.push(Section {
            title: "HEADER FORMAT ERROR",
            issue: "Headers don't match expected format".to_string(),
            detail: Some(finding.message()),
            solution: "Update headers to match one of the expected formats above",
        });
    }

    sections
}

/// Render the summary log.
///
/// `details_name` is the file name of the detail log, when one was written.
pub fn render_summary(assessment: &FileAssessment, details_name: Option<&str>) -> String {
    let banner = "=".repeat(SUMMARY_WIDTH);
    let mut lines = vec![
        banner.clone(),
        format!("VALIDATION REPORT FOR: {}", assessment.file_name),
        banner.clone(),
        String::new(),
        format!("TOTAL ERRORS FOUND: {}", assessment.total_errors()),
        String::new(),
    ];

    for (index, section) in sections(assessment).into_iter().enumerate() {
        lines.push(format!("{}. {}", index + 1, section.title));
        lines.push("-".repeat(SECTION_RULE));
        lines.push(format!("Issue: {}", section.issue));
        if let Some(detail) = section.detail {
            lines.push(detail);
        }
        lines.push(format!("Solution: {}", section.solution));
        lines.push(String::new());
        lines.push(String::new());
    }

    lines.push(banner.clone());
    if let Some(details_name) = details_name {
        lines.push(format!(
            "Details: See {details_name} for specific rows and error details"
        ));
        lines.push(banner);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the itemized detail log: one numbered block per failing row.
pub fn render_details(file_name: &str, report: &ValidationReport) -> String {
    let banner = "=".repeat(DETAIL_WIDTH);
    let mut lines = vec![
        banner.clone(),
        format!("DETAILED VALIDATION ERRORS FOR: {file_name}"),
        banner.clone(),
        String::new(),
    ];

    for (index, failure) in report.failures().iter().enumerate() {
        push_failure(&mut lines, index + 1, failure);
        lines.push(banner.clone());
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_failure(lines: &mut Vec<String>, number: usize, failure: &RowFailure) {
    lines.push(format!("#{number}. ROW {} VALIDATION ERRORS", failure.row));
    lines.push("-".repeat(ROW_RULE));
    for (index, message) in failure.messages.iter().enumerate() {
        lines.push(format!("   {}. {message}", index + 1));
    }
    lines.push(String::new());
    lines.push(format!("   Row Data: {}", failure.raw));
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmv_model::{RawRow, Schema};
    use lmv_validate::{ReportBuilder, ValidationRun};

    fn voucher_report(expirations: &[&str]) -> ValidationReport {
        let rows: Vec<RawRow> = expirations
            .iter()
            .enumerate()
            .map(|(i, expiration)| {
                RawRow::new(
                    i + 2,
                    ["u1", "", "yearly", "Deal", "tag", "C1", *expiration]
                        .iter()
                        .map(|f| f.to_string())
                        .collect(),
                )
            })
            .collect();
        ReportBuilder::new(Schema::Vouchers).build(&rows, &mut ValidationRun::at(1_750_000_000_000))
    }

    #[test]
    fn test_summary_sections_in_order() {
        let mut assessment = FileAssessment::new("vouchers.csv");
        assessment.push(Finding::ByteOrderMark);
        assessment.push(Finding::WrongDelimiter {
            header: vec!["a".to_string(), "b".to_string()],
        });
        assessment.report = Some(voucher_report(&["1800000000", "1700000000000"]));

        let summary = render_summary(&assessment, Some("vouchers_details.txt"));
        assert!(summary.starts_with(&"=".repeat(60)));
        assert!(summary.contains("VALIDATION REPORT FOR: vouchers.csv"));
        assert!(summary.contains("TOTAL ERRORS FOUND: 4"));

        let bom = summary.find("1. BYTE ORDER MARK (BOM) ERROR").unwrap();
        let separator = summary.find("2. SEPARATOR FORMAT ERROR").unwrap();
        let timestamp = summary.find("3. TIMESTAMP FORMAT ERRORS").unwrap();
        let data = summary.find("4. DATA VALIDATION ERRORS").unwrap();
        assert!(bom < separator && separator < timestamp && timestamp < data);

        assert!(summary.contains("Found 1 timestamp errors"));
        assert!(summary.contains("Details: See vouchers_details.txt"));
        assert!(summary.is_ascii());
    }

    #[test]
    fn test_summary_header_mismatch() {
        let mut assessment = FileAssessment::new("x.csv");
        assessment.push(Finding::HeaderMismatch {
            message: "The header in file x.csv does not match any of the expected formats"
                .to_string(),
        });

        let summary = render_summary(&assessment, None);
        assert!(summary.contains("TOTAL ERRORS FOUND: 1"));
        assert!(summary.contains("1. HEADER FORMAT ERROR"));
        assert!(summary.contains("does not match any of the expected formats"));
        assert!(!summary.contains("Details:"));
    }

    #[test]
    fn test_details_blocks() {
        let report = voucher_report(&["1800000000000", "soon"]);
        let details = render_details("vouchers.csv", &report);

        assert!(details.contains("DETAILED VALIDATION ERRORS FOR: vouchers.csv"));
        assert!(details.contains("#1. ROW 3 VALIDATION ERRORS"));
        assert!(details.contains("   1. Column 'expiration' should be an integer"));
        assert!(details.contains("   Row Data: u1,,yearly,Deal,tag,C1,soon"));
        assert!(!details.contains("#2."));
    }
}

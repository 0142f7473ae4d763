//! Whole-file validation report.

use std::fmt;

use lmv_model::{RawRow, RowOutcome, Schema};
use serde::Serialize;
use tracing::{debug, trace};

use crate::context::ValidationRun;
use crate::rules::rule_set_for;

/// A row that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// 1-indexed row number (the header is row 1).
    pub row: usize,
    /// The row as it appeared in the file.
    pub raw: String,
    /// Every violation message, in check order.
    pub messages: Vec<String>,
    /// Messages of the violations tagged as timestamp-unit errors.
    pub timestamp_unit: Vec<String>,
    /// True if at least one violation is not a timestamp-unit error.
    pub has_general: bool,
}

impl RowFailure {
    fn from_outcome(row: &RawRow, outcome: &RowOutcome) -> Self {
        Self {
            row: row.number,
            raw: row.raw.clone(),
            messages: outcome.messages(),
            timestamp_unit: outcome
                .timestamp_unit_errors()
                .map(|error| error.message.clone())
                .collect(),
            has_general: outcome.has_general_errors(),
        }
    }

    /// The row-error line: `Error: <msg>; <msg> -> Row <n>: <raw>`.
    pub fn formatted(&self) -> String {
        format!(
            "Error: {} -> Row {}: {}",
            self.messages.join("; "),
            self.row,
            self.raw
        )
    }
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Aggregated outcome of validating every row of one file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    schema: Schema,
    rows_checked: usize,
    failures: Vec<RowFailure>,
    timestamp_error_count: usize,
    validation_error_count: usize,
}

impl ValidationReport {
    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn rows_checked(&self) -> usize {
        self.rows_checked
    }

    /// Failing rows, in file order.
    pub fn failures(&self) -> &[RowFailure] {
        &self.failures
    }

    /// Number of individual timestamp-unit violations.
    pub fn timestamp_error_count(&self) -> usize {
        self.timestamp_error_count
    }

    /// Number of failing rows carrying at least one general violation.
    pub fn validation_error_count(&self) -> usize {
        self.validation_error_count
    }

    pub fn total_errors(&self) -> usize {
        self.timestamp_error_count + self.validation_error_count
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// One formatted line per failing row.
    pub fn formatted_errors(&self) -> Vec<String> {
        self.failures.iter().map(RowFailure::formatted).collect()
    }

    /// Timestamp-unit messages paired with their row numbers.
    pub fn timestamp_errors(&self) -> impl Iterator<Item = (usize, &str)> {
        self.failures.iter().flat_map(|failure| {
            failure
                .timestamp_unit
                .iter()
                .map(move |message| (failure.row, message.as_str()))
        })
    }
}

/// Row-count progress callback: `(rows_done, rows_total)`.
pub type ProgressFn<'a> = Box<dyn FnMut(usize, usize) + 'a>;

/// Runs a layout's rule set over every row of a file.
pub struct ReportBuilder<'a> {
    schema: Schema,
    progress_every: usize,
    progress: Option<ProgressFn<'a>>,
}

impl fmt::Debug for ReportBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportBuilder")
            .field("schema", &self.schema)
            .field("progress_every", &self.progress_every)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl<'a> ReportBuilder<'a> {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            progress_every: 0,
            progress: None,
        }
    }

    /// Invoke `callback` every `every` rows and once after the last row.
    pub fn with_progress(mut self, every: usize, callback: impl FnMut(usize, usize) + 'a) -> Self {
        self.progress_every = every.max(1);
        self.progress = Some(Box::new(callback));
        self
    }

    /// Validate every row. Never stops at the first failure.
    ///
    /// Identifier pre-passes are the caller's job; see
    /// [`ValidationRun::prepare`].
    pub fn build(mut self, rows: &[RawRow], run: &mut ValidationRun) -> ValidationReport {
        let rules = rule_set_for(self.schema);
        let total = rows.len();

        let mut failures = Vec::new();
        let mut timestamp_error_count = 0;
        let mut validation_error_count = 0;

        for (index, row) in rows.iter().enumerate() {
            let outcome = rules.validate(row, run);
            if !outcome.is_valid() {
                trace!(row = row.number, errors = outcome.errors().len(), "Row failed");
                let failure = RowFailure::from_outcome(row, &outcome);
                timestamp_error_count += failure.timestamp_unit.len();
                if failure.has_general {
                    validation_error_count += 1;
                }
                failures.push(failure);
            }

            let done = index + 1;
            if let Some(progress) = self.progress.as_mut()
                && (done % self.progress_every == 0 || done == total)
            {
                progress(done, total);
            }
        }

        debug!(
            schema = %self.schema,
            rows = total,
            failed_rows = failures.len(),
            timestamp_errors = timestamp_error_count,
            "Validation complete"
        );

        ValidationReport {
            schema: self.schema,
            rows_checked: total,
            failures,
            timestamp_error_count,
            validation_error_count,
        }
    }
}

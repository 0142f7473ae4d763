//! Row-level input and validation outcome types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One parsed CSV record, positionally aligned to a schema.
///
/// The field count may differ from the schema; that is itself a violation
/// reported by the row validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-indexed row number in the file (the header is row 1).
    pub number: usize,
    /// Field values as parsed, untrimmed.
    pub fields: Vec<String>,
    /// The record re-rendered with the file's delimiter, for reports.
    pub raw: String,
}

impl RawRow {
    /// Creates a row, rendering `raw` from the fields with a comma delimiter.
    pub fn new(number: usize, fields: Vec<String>) -> Self {
        let raw = render_record(&fields, ',');
        Self {
            number,
            fields,
            raw,
        }
    }

    /// Creates a row rendered with the file's own delimiter.
    pub fn with_delimiter(number: usize, fields: Vec<String>, delimiter: char) -> Self {
        let raw = render_record(&fields, delimiter);
        Self {
            number,
            fields,
            raw,
        }
    }

    /// Field at `index`, or the empty string when the row is too short.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Renders fields back into a single delimited line, quoting where needed.
pub(crate) fn render_record(fields: &[String], delimiter: char) -> String {
    fields
        .iter()
        .map(|field| {
            if field.contains(delimiter) || field.contains('"') || field.contains('\n') {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                field.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

/// Classification of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Row alignment is broken (wrong column count).
    Structural,
    /// Business-rule violation on a well-formed row.
    General,
    /// A timestamp expressed in the wrong unit or format.
    TimestampUnit,
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Column name, or `row` for structural errors.
    pub context: String,
    /// Human-readable message.
    pub message: String,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            context: "row".to_string(),
            message: message.into(),
            kind: ErrorKind::Structural,
        }
    }

    pub fn general(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: column.into(),
            message: message.into(),
            kind: ErrorKind::General,
        }
    }

    pub fn timestamp_unit(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: column.into(),
            message: message.into(),
            kind: ErrorKind::TimestampUnit,
        }
    }

    pub fn is_timestamp_unit(&self) -> bool {
        self.kind == ErrorKind::TimestampUnit
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every violation found for one row, in check order.
///
/// An empty outcome means the row is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    errors: Vec<FieldError>,
}

impl RowOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome holding a single structural error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::structural(message)],
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages of all violations, in order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Violations tagged as timestamp-unit errors.
    pub fn timestamp_unit_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(|e| e.is_timestamp_unit())
    }

    /// True if any violation is not a timestamp-unit error.
    pub fn has_general_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.is_timestamp_unit())
    }

    pub fn is_structural(&self) -> bool {
        self.errors.iter().any(|e| e.kind == ErrorKind::Structural)
    }

    /// Joined messages, as written to the row-error line.
    pub fn summary(&self) -> String {
        self.messages().join("; ")
    }
}

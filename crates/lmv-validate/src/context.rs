//! Per-file validation state.
//!
//! Rule sets are stateless. Anything that must be remembered across rows of
//! one file lives in a [`ValidationRun`], created fresh for every file so
//! nothing leaks between files.

use std::collections::BTreeMap;

use lmv_model::{RawRow, Schema};
use tracing::debug;

use crate::timestamp::now_millis;

/// Identifiers that count as missing.
pub fn is_null_identifier(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "NULL" || trimmed == "null"
}

/// Result of looking up an identifier for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierStatus {
    Unique,
    /// The identifier occurs on several rows; all known row numbers in file order.
    Duplicate { rows: Vec<usize> },
}

/// Occurrences of primary identifiers within one file.
///
/// When [`prepare`](Self::prepare)d with every row up front, each occurrence
/// of a duplicated identifier reports as a duplicate, the first one
/// included. Without preparation the registry works incrementally: the first
/// occurrence registers and later occurrences are flagged.
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    occurrences: BTreeMap<String, Vec<usize>>,
    prepared: bool,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every non-null identifier of `rows` found at `column`.
    ///
    /// Rows whose field count differs from `expected_len` are skipped; their
    /// alignment is broken and the value at `column` is not an identifier.
    pub fn prepare<'a>(
        &mut self,
        rows: impl IntoIterator<Item = &'a RawRow>,
        column: usize,
        expected_len: usize,
    ) {
        self.occurrences.clear();
        for row in rows {
            if row.len() != expected_len {
                continue;
            }
            let id = row.field(column);
            if is_null_identifier(id) {
                continue;
            }
            self.occurrences
                .entry(id.to_string())
                .or_default()
                .push(row.number);
        }
        self.prepared = true;
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Look up `id` as seen on `row`.
    pub fn check(&mut self, id: &str, row: usize) -> IdentifierStatus {
        if self.prepared {
            return match self.occurrences.get(id) {
                Some(rows) if rows.len() > 1 => IdentifierStatus::Duplicate { rows: rows.clone() },
                _ => IdentifierStatus::Unique,
            };
        }

        let rows = self.occurrences.entry(id.to_string()).or_default();
        if !rows.contains(&row) {
            rows.push(row);
        }
        if rows.len() > 1 {
            IdentifierStatus::Duplicate { rows: rows.clone() }
        } else {
            IdentifierStatus::Unique
        }
    }

    /// Identifiers seen more than once, with their rows.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.occurrences
            .iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(id, rows)| (id.as_str(), rows.as_slice()))
    }

    pub fn clear(&mut self) {
        self.occurrences.clear();
        self.prepared = false;
    }
}

/// Scratch state for validating one file.
#[derive(Debug, Clone)]
pub struct ValidationRun {
    /// Reference instant for past/future checks, fixed for the whole file.
    pub now_ms: i64,
    pub identifiers: IdentifierRegistry,
}

impl Default for ValidationRun {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRun {
    /// A run anchored at the current wall-clock time.
    pub fn new() -> Self {
        Self::at(now_millis())
    }

    /// A run anchored at a fixed instant.
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms,
            identifiers: IdentifierRegistry::new(),
        }
    }

    /// File-wide pre-pass run before row validation.
    ///
    /// For contacts this scans every row for identifiers so duplicates are
    /// flagged on all of their rows. Other layouts need no pre-pass.
    pub fn prepare(&mut self, schema: Schema, rows: &[RawRow]) {
        if schema != Schema::Contacts {
            return;
        }
        self.identifiers.prepare(rows, 0, schema.column_count());
        let duplicates = self.identifiers.duplicates().count();
        debug!(
            rows = rows.len(),
            duplicates, "Identifier pre-pass complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(number: usize, id: &str) -> RawRow {
        RawRow::new(
            number,
            vec![
                id.to_string(),
                "TRUE".to_string(),
                "1600000000000".to_string(),
                String::new(),
                String::new(),
                String::new(),
                "FALSE".to_string(),
            ],
        )
    }

    #[test]
    fn test_null_identifiers() {
        assert!(is_null_identifier(""));
        assert!(is_null_identifier("  "));
        assert!(is_null_identifier("NULL"));
        assert!(is_null_identifier("null"));
        assert!(!is_null_identifier("user-1"));
    }

    #[test]
    fn test_incremental_flags_later_occurrences() {
        let mut registry = IdentifierRegistry::new();
        assert_eq!(registry.check("a", 2), IdentifierStatus::Unique);
        assert_eq!(registry.check("b", 3), IdentifierStatus::Unique);
        assert_eq!(
            registry.check("a", 4),
            IdentifierStatus::Duplicate { rows: vec![2, 4] }
        );
    }

    #[test]
    fn test_prepared_flags_every_occurrence() {
        let rows = vec![contact(2, "a"), contact(3, "b"), contact(4, "a")];
        let mut registry = IdentifierRegistry::new();
        registry.prepare(&rows, 0, 7);

        assert_eq!(
            registry.check("a", 2),
            IdentifierStatus::Duplicate { rows: vec![2, 4] }
        );
        assert_eq!(registry.check("b", 3), IdentifierStatus::Unique);
        assert_eq!(
            registry.check("a", 4),
            IdentifierStatus::Duplicate { rows: vec![2, 4] }
        );
        assert_eq!(registry.duplicates().count(), 1);
    }

    #[test]
    fn test_prepare_skips_misaligned_and_null_rows() {
        let short = RawRow::new(3, vec!["a".to_string()]);
        let rows = vec![contact(2, "a"), short, contact(4, "NULL"), contact(5, "NULL")];
        let mut registry = IdentifierRegistry::new();
        registry.prepare(&rows, 0, 7);

        assert_eq!(registry.check("a", 2), IdentifierStatus::Unique);
        assert_eq!(registry.duplicates().count(), 0);
    }

    #[test]
    fn test_run_prepare_only_for_contacts() {
        let rows = vec![contact(2, "a"), contact(3, "a")];
        let mut run = ValidationRun::at(0);
        run.prepare(Schema::Vouchers, &rows);
        assert!(!run.identifiers.is_prepared());

        run.prepare(Schema::Contacts, &rows);
        assert!(run.identifiers.is_prepared());
    }

    #[test]
    fn test_clear_resets_registry() {
        let mut registry = IdentifierRegistry::new();
        registry.check("a", 2);
        registry.check("a", 3);
        registry.clear();
        assert!(!registry.is_prepared());
        assert_eq!(registry.duplicates().count(), 0);
    }
}

//! Business-rule validation for loyalty migration files.
//!
//! Each of the three layouts has a [`RuleSet`] that checks one row and
//! collects every violation it finds. [`ReportBuilder`] runs the matching
//! rule set over a whole file and aggregates the failures into a
//! [`ValidationReport`].
//!
//! # Example
//!
//! ```ignore
//! use lmv_model::Schema;
//! use lmv_validate::{ReportBuilder, ValidationRun};
//!
//! let mut run = ValidationRun::new();
//! run.prepare(Schema::Contacts, &rows);
//! let report = ReportBuilder::new(Schema::Contacts).build(&rows, &mut run);
//! assert!(report.passed());
//! ```

mod context;
mod fields;
mod report;
mod rules;
mod timestamp;

// === Run Context ===
pub use context::{IdentifierRegistry, IdentifierStatus, ValidationRun, is_null_identifier};

// === Field Helpers ===
pub use fields::{has_decimal_separator, needs_quoting};

// === Rule Sets ===
pub use rules::{ContactsRules, PointsRules, RuleSet, VouchersRules, rule_set_for};

// === Reports ===
pub use report::{ReportBuilder, RowFailure, ValidationReport};

// === Timestamps ===
pub use timestamp::{
    FROM_DATE_MS, TILL_DATE_MS, TimestampVerdict, classify_unit, is_in_past, now_millis,
};

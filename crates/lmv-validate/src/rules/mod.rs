//! Row rule sets, one per layout.
//!
//! Every rule set first checks the column count. A misaligned row gets a
//! single structural error and nothing else; otherwise every remaining check
//! runs and all violations are collected.

mod contacts;
mod points;
mod vouchers;

pub use contacts::ContactsRules;
pub use points::PointsRules;
pub use vouchers::VouchersRules;

use lmv_model::{FieldError, RawRow, RowOutcome, Schema};

use crate::context::ValidationRun;
use crate::fields::has_decimal_separator;
use crate::timestamp::{TimestampVerdict, classify_unit, is_in_past};

/// Validation rules for one layout.
pub trait RuleSet: Send + Sync {
    /// The layout these rules apply to.
    fn schema(&self) -> Schema;

    /// Validate one row, collecting every violation.
    fn validate(&self, row: &RawRow, run: &mut ValidationRun) -> RowOutcome;
}

static CONTACTS: ContactsRules = ContactsRules;
static POINTS: PointsRules = PointsRules;
static VOUCHERS: VouchersRules = VouchersRules;

/// Rule set for a classified layout.
pub fn rule_set_for(schema: Schema) -> &'static dyn RuleSet {
    match schema {
        Schema::Contacts => &CONTACTS,
        Schema::Points => &POINTS,
        Schema::Vouchers => &VOUCHERS,
    }
}

/// Structural check shared by every layout.
///
/// Returns the structural outcome when the row does not have exactly the
/// layout's number of columns.
pub(crate) fn check_column_count(schema: Schema, row: &RawRow) -> Option<RowOutcome> {
    let expected = schema.column_count();
    let found = row.len();

    if found == expected {
        return None;
    }

    let message = if found > expected {
        format!(
            "Row has {found} columns but should have {expected}. This often indicates unquoted \
             commas in text fields; fields containing commas must be enclosed in double quotes."
        )
    } else {
        format!("Row has {found} columns but should have {expected}")
    };
    Some(RowOutcome::structural(message))
}

/// Which side of "now" a timestamp column must fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    Past,
    Future,
}

impl Expect {
    fn word(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Future => "future",
        }
    }
}

/// Validate a millisecond timestamp column.
///
/// Decimal separators and seconds-scale values are recorded as
/// timestamp-unit errors; every other rejected verdict is a general error. Values with millisecond shape also get the past/future check, so
/// an out-of-range value that is on the wrong side of now reports both.
pub(crate) fn check_millis(
    column: &str,
    raw: &str,
    expect: Expect,
    now_ms: i64,
    outcome: &mut RowOutcome,
) {
    let value = raw.trim();

    let (has_decimal, decimal_message) = has_decimal_separator(value);
    if has_decimal {
        outcome.push(FieldError::timestamp_unit(
            column,
            format!("Column '{column}': {decimal_message}"),
        ));
        return;
    }

    let Ok(parsed) = value.parse::<i64>() else {
        outcome.push(FieldError::general(
            column,
            format!("Column '{column}' should be an integer (UNIX timestamp in milliseconds)"),
        ));
        return;
    };

    let verdict = classify_unit(parsed);
    if verdict == TimestampVerdict::Seconds {
        outcome.push(FieldError::timestamp_unit(
            column,
            format!("Column '{column}': {}", verdict.reason()),
        ));
        return;
    }
    if !verdict.is_valid() {
        outcome.push(FieldError::general(
            column,
            format!("Column '{column}': {}", verdict.reason()),
        ));
    }
    if !verdict.is_millisecond_shaped() {
        return;
    }

    let (past, _) = is_in_past(parsed, now_ms);
    let wrong_side = match expect {
        Expect::Past => !past,
        Expect::Future => past,
    };
    if wrong_side {
        let actual = if past { "in the past" } else { "not in the past" };
        outcome.push(FieldError::general(
            column,
            format!(
                "Column '{column}' should be a {} UNIX timestamp in milliseconds (value is {actual})",
                expect.word()
            ),
        ));
    }
}

/// True when a value is absent after trimming.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

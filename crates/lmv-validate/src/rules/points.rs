use lmv_model::{FieldError, RawRow, RowOutcome, Schema};

use super::{Expect, RuleSet, check_column_count, check_millis, is_blank};
use crate::context::ValidationRun;
use crate::fields::{has_decimal_separator, needs_quoting};

/// Rules for point grant rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointsRules;

/// Parsed state of an optional numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Amount {
    Empty,
    Value(f64),
    Invalid,
}

impl Amount {
    fn is_positive(self) -> bool {
        matches!(self, Self::Value(value) if value > 0.0)
    }
}

impl RuleSet for PointsRules {
    fn schema(&self) -> Schema {
        Schema::Points
    }

    fn validate(&self, row: &RawRow, run: &mut ValidationRun) -> RowOutcome {
        if let Some(structural) = check_column_count(Schema::Points, row) {
            return structural;
        }

        let mut outcome = RowOutcome::new();

        let amounts = [
            integer_amount("pointsToSpend", row.field(1), &mut outcome),
            integer_amount("statusPoints", row.field(2), &mut outcome),
            float_amount("cashback", row.field(3), &mut outcome),
        ];
        let all_parsed = amounts.iter().all(|amount| *amount != Amount::Invalid);
        if all_parsed && !amounts.iter().any(|amount| amount.is_positive()) {
            outcome.push(FieldError::general(
                "pointsToSpend",
                "At least one of 'pointsToSpend', 'statusPoints', or 'cashback' must have a \
                 valid positive value.",
            ));
        }

        if !is_blank(row.field(4)) {
            outcome.push(FieldError::general(
                "allocatedAt",
                "Column 'allocatedAt' must be empty",
            ));
        }

        let expire_at = row.field(5);
        let set_plan_expiration = row.field(6).trim();
        if set_plan_expiration.eq_ignore_ascii_case("true") {
            if !is_blank(expire_at) {
                outcome.push(FieldError::general(
                    "expireAt",
                    "If setPlanExpiration is TRUE, expireAt should be empty",
                ));
            }
        } else if set_plan_expiration.eq_ignore_ascii_case("false") {
            if is_blank(expire_at) {
                outcome.push(FieldError::general(
                    "expireAt",
                    "Column 'expireAt' is required when setPlanExpiration is FALSE",
                ));
            } else {
                check_millis("expireAt", expire_at, Expect::Future, run.now_ms, &mut outcome);
            }
        } else {
            outcome.push(FieldError::general(
                "setPlanExpiration",
                "setPlanExpiration should be either TRUE or FALSE",
            ));
        }

        for (index, column) in [(7, "reason"), (8, "title"), (9, "description")] {
            let (needs, message) = needs_quoting(row.field(index));
            if needs {
                outcome.push(FieldError::general(
                    column,
                    format!("Column '{column}': {message}"),
                ));
            }
        }

        if !is_blank(row.field(9)) && is_blank(row.field(8)) {
            outcome.push(FieldError::general(
                "description",
                "Column 'description' requires 'title' to be set",
            ));
        }

        outcome
    }
}

fn integer_amount(column: &str, raw: &str, outcome: &mut RowOutcome) -> Amount {
    let value = raw.trim();
    if value.is_empty() {
        return Amount::Empty;
    }

    let (has_decimal, decimal_message) = has_decimal_separator(value);
    if has_decimal {
        outcome.push(FieldError::general(
            column,
            format!("Column '{column}': {decimal_message}"),
        ));
        return Amount::Invalid;
    }

    match value.parse::<i64>() {
        Ok(parsed) if parsed < 0 => {
            outcome.push(FieldError::general(
                column,
                format!("Column '{column}' must not be negative"),
            ));
            Amount::Invalid
        }
        Ok(parsed) => Amount::Value(parsed as f64),
        Err(_) => {
            outcome.push(FieldError::general(
                column,
                format!("Column '{column}' should be an integer."),
            ));
            Amount::Invalid
        }
    }
}

fn float_amount(column: &str, raw: &str, outcome: &mut RowOutcome) -> Amount {
    let value = raw.trim();
    if value.is_empty() {
        return Amount::Empty;
    }

    match value.parse::<f64>() {
        Ok(parsed) if !parsed.is_finite() => {
            outcome.push(FieldError::general(
                column,
                format!("Column '{column}' should be a float."),
            ));
            Amount::Invalid
        }
        Ok(parsed) if parsed < 0.0 => {
            outcome.push(FieldError::general(
                column,
                format!("Column '{column}' must not be negative"),
            ));
            Amount::Invalid
        }
        Ok(parsed) => Amount::Value(parsed),
        Err(_) => {
            outcome.push(FieldError::general(
                column,
                format!("Column '{column}' should be a float."),
            ));
            Amount::Invalid
        }
    }
}

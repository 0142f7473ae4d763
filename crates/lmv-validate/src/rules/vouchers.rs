use lmv_model::{FieldError, RawRow, RowOutcome, Schema};

use super::{Expect, RuleSet, check_column_count, check_millis, is_blank};
use crate::context::ValidationRun;
use crate::fields::needs_quoting;

/// Accepted `voucherType` values.
pub const VOUCHER_TYPES: &[&str] = &["one_time", "yearly"];

/// Rules for voucher rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct VouchersRules;

impl RuleSet for VouchersRules {
    fn schema(&self) -> Schema {
        Schema::Vouchers
    }

    fn validate(&self, row: &RawRow, run: &mut ValidationRun) -> RowOutcome {
        if let Some(structural) = check_column_count(Schema::Vouchers, row) {
            return structural;
        }

        let mut outcome = RowOutcome::new();

        if is_blank(row.field(0)) && is_blank(row.field(1)) {
            outcome.push(FieldError::general(
                "userId",
                "Column 'userId' and 'externalId' should not be empty at the same time",
            ));
        }

        if !VOUCHER_TYPES.contains(&row.field(2)) {
            outcome.push(FieldError::general(
                "voucherType",
                "Column 'voucherType' should be either 'one_time' or 'yearly'",
            ));
        }

        let name = row.field(3);
        if is_blank(name) {
            outcome.push(FieldError::general(
                "voucherName",
                "Column 'voucherName' should not be empty",
            ));
        } else {
            let (needs, message) = needs_quoting(name);
            if needs {
                outcome.push(FieldError::general(
                    "voucherName",
                    format!("Column 'voucherName': {message}"),
                ));
            }
        }

        for (index, column) in [(4, "iconName"), (5, "code")] {
            if is_blank(row.field(index)) {
                outcome.push(FieldError::general(
                    column,
                    format!("Column '{column}' should not be empty"),
                ));
            }
        }

        check_millis("expiration", row.field(6), Expect::Future, run.now_ms, &mut outcome);

        outcome
    }
}

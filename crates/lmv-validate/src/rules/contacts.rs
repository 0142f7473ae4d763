use lmv_model::{FieldError, RawRow, RowOutcome, Schema};

use super::{Expect, RuleSet, check_column_count, check_millis, is_blank};
use crate::context::{IdentifierStatus, ValidationRun, is_null_identifier};

/// Rules for contact migration rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactsRules;

impl RuleSet for ContactsRules {
    fn schema(&self) -> Schema {
        Schema::Contacts
    }

    fn validate(&self, row: &RawRow, run: &mut ValidationRun) -> RowOutcome {
        if let Some(structural) = check_column_count(Schema::Contacts, row) {
            return structural;
        }

        let mut outcome = RowOutcome::new();

        let user_id = row.field(0);
        if is_null_identifier(user_id) {
            outcome.push(FieldError::general(
                "userId",
                "Column 'userId' should not be empty or NULL",
            ));
        } else if let IdentifierStatus::Duplicate { rows } =
            run.identifiers.check(user_id, row.number)
        {
            let rows = rows
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            outcome.push(FieldError::general(
                "userId",
                format!("Duplicate userId found: {user_id} (rows {rows})"),
            ));
        }

        if row.field(1) != "TRUE" {
            outcome.push(FieldError::general(
                "shouldJoin",
                "Column 'shouldJoin' should be 'TRUE'",
            ));
        }

        check_millis("joinDate", row.field(2), Expect::Past, run.now_ms, &mut outcome);

        // Tier timings are set upstream once a record was processed.
        for (index, column) in [(4, "tierEntryAt"), (5, "tierCalcAt")] {
            if !is_blank(row.field(index)) {
                outcome.push(FieldError::general(
                    column,
                    format!("Column '{column}' should be empty"),
                ));
            }
        }

        if !matches!(row.field(6), "TRUE" | "FALSE") {
            outcome.push(FieldError::general(
                "shouldReward",
                "Column 'shouldReward' should be 'TRUE' or 'FALSE'",
            ));
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_750_000_000_000;
    const PAST: &str = "1700000000000";

    fn row(number: usize, fields: [&str; 7]) -> RawRow {
        RawRow::new(number, fields.iter().map(|f| f.to_string()).collect())
    }

    fn validate(row: &RawRow) -> RowOutcome {
        ContactsRules.validate(row, &mut ValidationRun::at(NOW))
    }

    #[test]
    fn test_valid_contact() {
        let outcome = validate(&row(2, ["u1", "TRUE", PAST, "Gold", "", "", "FALSE"]));
        assert!(outcome.is_valid(), "{}", outcome.summary());
    }

    #[test]
    fn test_null_user_id() {
        for id in ["", "NULL", "null"] {
            let outcome = validate(&row(2, [id, "TRUE", PAST, "", "", "", "TRUE"]));
            assert_eq!(outcome.errors().len(), 1);
            assert_eq!(outcome.errors()[0].context, "userId");
        }
    }

    #[test]
    fn test_collects_every_violation() {
        let outcome = validate(&row(
            2,
            ["u1", "FALSE", "abc", "", "1700000000000", "x", "maybe"],
        ));
        let contexts: Vec<&str> = outcome.errors().iter().map(|e| e.context.as_str()).collect();
        assert_eq!(
            contexts,
            vec!["shouldJoin", "joinDate", "tierEntryAt", "tierCalcAt", "shouldReward"]
        );
    }

    #[test]
    fn test_future_join_date() {
        let outcome = validate(&row(2, ["u1", "TRUE", "1800000000000", "", "", "", "TRUE"]));
        assert!(outcome.summary().contains("should be a past UNIX timestamp"));
    }

    #[test]
    fn test_join_date_in_seconds() {
        let outcome = validate(&row(2, ["u1", "TRUE", "1700000000", "", "", "", "TRUE"]));
        assert_eq!(outcome.timestamp_unit_errors().count(), 1);
        assert!(!outcome.has_general_errors());
    }

    #[test]
    fn test_incremental_duplicate_flags_second() {
        let mut run = ValidationRun::at(NOW);
        let first = ContactsRules.validate(&row(2, ["u1", "TRUE", PAST, "", "", "", "TRUE"]), &mut run);
        let second = ContactsRules.validate(&row(3, ["u1", "TRUE", PAST, "", "", "", "TRUE"]), &mut run);
        assert!(first.is_valid());
        assert_eq!(second.summary(), "Duplicate userId found: u1 (rows 2, 3)");
    }

    #[test]
    fn test_wrong_column_count_is_structural_only() {
        let short = RawRow::new(2, vec!["u1".to_string(), "NOPE".to_string()]);
        let outcome = validate(&short);
        assert_eq!(outcome.errors().len(), 1);
        assert!(outcome.is_structural());
    }
}

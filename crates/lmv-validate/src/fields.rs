//! Field-level predicates shared by the rule sets.

use std::sync::LazyLock;

use regex::Regex;

/// A number with exactly one `,` or `.` followed by digits.
///
/// Thousands-separated integers (`1,234,567`) carry more than one separator
/// and do not match.
static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d*([.,])\d+$").expect("Invalid decimal regex"));

/// Check whether a value looks like a decimal number where an integer was expected.
pub fn has_decimal_separator(text: &str) -> (bool, &'static str) {
    let Some(captures) = DECIMAL_REGEX.captures(text.trim()) else {
        return (false, "");
    };

    match captures.get(1).map(|m| m.as_str()) {
        Some(",") => (
            true,
            "Value uses a comma as decimal separator; only whole numbers are allowed (no decimal values).",
        ),
        _ => (
            true,
            "Value contains a decimal point; only whole numbers are allowed (no decimal values).",
        ),
    }
}

/// Check whether free text contains a comma that would break column alignment.
pub fn needs_quoting(text: &str) -> (bool, &'static str) {
    if text.contains(',') {
        (
            true,
            "Value contains commas which can break CSV column alignment. Enclose the field in \
             double quotes or remove the commas.",
        )
    } else {
        (false, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_has_no_decimal() {
        assert!(!has_decimal_separator("").0);
    }

    #[test]
    fn test_comma_decimal_detected() {
        let (has_decimal, message) = has_decimal_separator("123,45");
        assert!(has_decimal);
        assert!(message.to_lowercase().contains("comma"));
    }

    #[test]
    fn test_period_decimal_detected() {
        let (has_decimal, message) = has_decimal_separator("123.45");
        assert!(has_decimal);
        assert!(message.to_lowercase().contains("decimal point"));

        assert!(has_decimal_separator(".5").0);
        assert!(has_decimal_separator("-1.5").0);
    }

    #[test]
    fn test_integer_has_no_decimal() {
        assert!(!has_decimal_separator("12345").0);
    }

    #[test]
    fn test_thousands_separators_not_decimal() {
        assert!(!has_decimal_separator("1,234,567").0);
        assert!(!has_decimal_separator("1.234.567").0);
    }

    #[test]
    fn test_trailing_separator_not_decimal() {
        assert!(!has_decimal_separator("123.").0);
        assert!(!has_decimal_separator("abc.def").0);
    }

    #[test]
    fn test_needs_quoting() {
        assert!(!needs_quoting("").0);
        assert!(!needs_quoting("Hello World").0);

        let (needs, message) = needs_quoting("Hello, World");
        assert!(needs);
        assert!(message.to_lowercase().contains("commas"));
    }
}

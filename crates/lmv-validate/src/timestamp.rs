//! Millisecond UNIX timestamp classification.
//!
//! Migration exports frequently carry timestamps in the wrong unit. Rather
//! than reporting a generic "invalid timestamp", the classifier guesses which
//! unit was actually used from the number of decimal digits so the operator
//! knows how to correct the value.

use std::fmt;

use chrono::Utc;

/// Lower bound of the accepted range: 1970-01-02T00:00:00Z in milliseconds.
pub const FROM_DATE_MS: i64 = 86_400 * 1000;

/// Upper bound (exclusive) of the accepted range: 2100-01-01T00:00:00Z in milliseconds.
pub const TILL_DATE_MS: i64 = 4_102_444_800 * 1000;

/// Result of classifying an integer as a millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampVerdict {
    /// 13 digits within the accepted calendar range.
    Valid,
    Negative,
    /// 1-5 digits.
    DaysScale { digits: u32 },
    /// 6-8 digits.
    MinutesOrHours { digits: u32 },
    /// 10 digits.
    Seconds,
    /// 12 digits.
    TruncatedMilliseconds,
    /// 13 digits outside the accepted calendar range.
    OutOfRange,
    /// 16 digits.
    Microseconds,
    /// 19 or more digits.
    Nanoseconds { digits: u32 },
    /// Any other digit count.
    Unrecognized { digits: u32 },
}

impl TimestampVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// True when the value looks like a timestamp in some other time unit.
    pub fn is_unit_error(&self) -> bool {
        matches!(
            self,
            Self::DaysScale { .. }
                | Self::MinutesOrHours { .. }
                | Self::Seconds
                | Self::TruncatedMilliseconds
                | Self::Microseconds
                | Self::Nanoseconds { .. }
        )
    }

    /// True when the value has millisecond shape, in range or not.
    ///
    /// Past/future checks are only meaningful for these values.
    pub fn is_millisecond_shaped(&self) -> bool {
        matches!(self, Self::Valid | Self::OutOfRange)
    }

    /// Human-readable explanation.
    pub fn reason(&self) -> String {
        match self {
            Self::Valid => "Timestamp is a valid UNIX millisecond timestamp.".to_string(),
            Self::Negative => {
                "Timestamp is negative; UNIX timestamps in milliseconds must be positive."
                    .to_string()
            }
            Self::DaysScale { digits } => format!(
                "Timestamp has {digits} digits and appears to be in days format instead of \
                 milliseconds (expected 13 digits)."
            ),
            Self::MinutesOrHours { digits } => format!(
                "Timestamp has {digits} digits and appears to be in minutes/hours format \
                 instead of milliseconds (expected 13 digits)."
            ),
            Self::Seconds => "Timestamp has 10 digits and appears to be in seconds instead of \
                              milliseconds (multiply by 1000)."
                .to_string(),
            Self::TruncatedMilliseconds => "Timestamp has 12 digits and appears to be \
                                            truncated milliseconds (expected 13 digits)."
                .to_string(),
            Self::OutOfRange => "Timestamp is outside valid date range (1970-01-02 to \
                                 2100-01-01)."
                .to_string(),
            Self::Microseconds => "Timestamp has 16 digits and appears to be in microseconds \
                                   instead of milliseconds (divide by 1000)."
                .to_string(),
            Self::Nanoseconds { digits } => format!(
                "Timestamp has {digits} digits and appears to be in nanoseconds instead of \
                 milliseconds (divide by 1000000)."
            ),
            Self::Unrecognized { digits } => format!(
                "Timestamp has {digits} digits; format not recognized (expected a 13-digit \
                 UNIX timestamp in milliseconds)."
            ),
        }
    }
}

impl fmt::Display for TimestampVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// Classify an integer by digit count and, for 13 digits, calendar range.
pub fn classify_unit(value: i64) -> TimestampVerdict {
    if value < 0 {
        return TimestampVerdict::Negative;
    }

    let digits = value.checked_ilog10().map_or(1, |log| log + 1);
    match digits {
        1..=5 => TimestampVerdict::DaysScale { digits },
        6..=8 => TimestampVerdict::MinutesOrHours { digits },
        10 => TimestampVerdict::Seconds,
        12 => TimestampVerdict::TruncatedMilliseconds,
        13 if (FROM_DATE_MS..TILL_DATE_MS).contains(&value) => TimestampVerdict::Valid,
        13 => TimestampVerdict::OutOfRange,
        16 => TimestampVerdict::Microseconds,
        19.. => TimestampVerdict::Nanoseconds { digits },
        _ => TimestampVerdict::Unrecognized { digits },
    }
}

/// Whether `value` lies strictly before `now_ms`.
pub fn is_in_past(value: i64, now_ms: i64) -> (bool, &'static str) {
    if value < now_ms {
        (true, "Timestamp is in the past.")
    } else {
        (false, "Timestamp is not in the past.")
    }
}

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

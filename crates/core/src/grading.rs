//! Grade value rule.
//!
//! A grade goes through four checks, in order, stopping at the first failure:
//!
//! 1. the submitted value parses as a decimal with at most two fractional digits
//! 2. the value lies in `[0, 10]`
//! 3. no grade exists yet for the same student and activity (creation only)
//! 4. the student is enrolled in the activity's subject
//!
//! Checks 1 and 2 are pure and live here. Checks 3 and 4 need the database and
//! are run by [`GradeService`](crate::services::GradeService), which reports
//! their failures with the same [`GradeRejection`] type.

use std::borrow::Cow;

use gradebook_common::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Lowest accepted grade.
pub const MIN_GRADE: Decimal = Decimal::ZERO;

/// Highest accepted grade.
pub const MAX_GRADE: Decimal = Decimal::TEN;

/// Number of fractional digits a grade is stored with.
pub const GRADE_SCALE: u32 = 2;

/// Reason a grade was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeRejection {
    #[error("'{0}' is not a valid grade")]
    InvalidNumber(String),

    #[error("grade {0} is outside the range 0 to 10")]
    OutOfRange(Decimal),

    #[error("the student already has a grade for this activity")]
    DuplicateGrade,

    #[error("the student is not enrolled in the activity's subject")]
    NotEnrolled,
}

impl GradeRejection {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidNumber(_) => "INVALID_GRADE",
            Self::OutOfRange(_) => "GRADE_OUT_OF_RANGE",
            Self::DuplicateGrade => "DUPLICATE_GRADE",
            Self::NotEnrolled => "NOT_ENROLLED",
        }
    }
}

impl From<GradeRejection> for AppError {
    fn from(rejection: GradeRejection) -> Self {
        let message = rejection.to_string();
        match rejection {
            GradeRejection::InvalidNumber(_) => Self::InvalidGrade(message),
            GradeRejection::OutOfRange(_) => Self::GradeOutOfRange(message),
            GradeRejection::DuplicateGrade => Self::DuplicateGrade(message),
            GradeRejection::NotEnrolled => Self::NotEnrolled(message),
        }
    }
}

/// A grade as submitted by a client: either a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawGrade {
    Text(String),
    Number(serde_json::Number),
}

impl RawGrade {
    /// The submitted value as text.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl From<&str> for RawGrade {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Parse a submitted grade (check 1).
///
/// Accepts an optional sign, digits and at most one `.`. Surrounding
/// whitespace is ignored. Trailing fractional zeros do not count towards the
/// two-digit limit, so `8.500` is accepted as `8.50`. The digit count is
/// taken from the text, never from a rounded decimal.
pub fn parse_grade_value(raw: &str) -> Result<Decimal, GradeRejection> {
    let invalid = || GradeRejection::InvalidNumber(raw.to_string());
    let trimmed = raw.trim();

    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    let well_formed = !digits.is_empty()
        && digits != "."
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if !well_formed {
        return Err(invalid());
    }

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > GRADE_SCALE as usize {
        return Err(invalid());
    }

    let sign = if trimmed.starts_with('-') { "-" } else { "" };
    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    };

    let mut value = Decimal::from_str_exact(&normalized).map_err(|_| invalid())?;
    if value.is_zero() {
        value.set_sign_positive(true);
    }
    value.rescale(GRADE_SCALE);

    Ok(value)
}

/// Check that a grade lies in `[0, 10]` (check 2).
pub fn check_range(value: Decimal) -> Result<Decimal, GradeRejection> {
    if value < MIN_GRADE || value > MAX_GRADE {
        return Err(GradeRejection::OutOfRange(value));
    }
    Ok(value)
}

/// Run checks 1 and 2.
pub fn validate_value(raw: &str) -> Result<Decimal, GradeRejection> {
    parse_grade_value(raw).and_then(check_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_accepts_values_in_range() {
        assert_eq!(validate_value("8.5").unwrap().to_string(), "8.50");
        assert_eq!(validate_value("0").unwrap().to_string(), "0.00");
        assert_eq!(validate_value("10").unwrap().to_string(), "10.00");
        assert_eq!(validate_value("10.00").unwrap(), dec("10"));
        assert_eq!(validate_value(" 7 ").unwrap(), dec("7"));
        assert_eq!(validate_value(".5").unwrap(), dec("0.5"));
        assert_eq!(validate_value("5.").unwrap(), dec("5"));
        assert_eq!(validate_value("8.500").unwrap().to_string(), "8.50");
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(validate_value("-0").unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        for raw in ["", "   ", "abc", "7,5", "1_0", "1e1", "NaN", ".", "1.2.3", "--1", "8 5"] {
            assert!(
                matches!(parse_grade_value(raw), Err(GradeRejection::InvalidNumber(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_extra_precision() {
        assert!(matches!(
            parse_grade_value("8.505"),
            Err(GradeRejection::InvalidNumber(_))
        ));

        for raw in [
            "10.00000000000000000000000000001",
            "9.999999999999999999999999999999",
            "-0.000000000000000000000000000001",
            "0.0000000000000000000000000000000000001",
            "1.234500000000000000000000000000000",
        ] {
            assert!(
                matches!(validate_value(raw), Err(GradeRejection::InvalidNumber(_))),
                "{raw} must be rejected as an invalid number"
            );
        }

        assert_eq!(
            validate_value("9.990000000000000000000000000000000").unwrap(),
            dec("9.99")
        );
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            validate_value("11"),
            Err(GradeRejection::OutOfRange(dec("11.00")))
        );
        assert!(matches!(
            validate_value("10.01"),
            Err(GradeRejection::OutOfRange(_))
        ));
        assert!(matches!(
            validate_value("-0.01"),
            Err(GradeRejection::OutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_failure_wins_over_range() {
        assert!(matches!(
            validate_value("100.001"),
            Err(GradeRejection::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_raw_grade_accepts_string_and_number() {
        let text: RawGrade = serde_json::from_str("\"8.5\"").unwrap();
        let number: RawGrade = serde_json::from_str("8.5").unwrap();
        let integer: RawGrade = serde_json::from_str("9").unwrap();

        assert_eq!(validate_value(&text.as_text()).unwrap(), dec("8.5"));
        assert_eq!(validate_value(&number.as_text()).unwrap(), dec("8.5"));
        assert_eq!(validate_value(&integer.as_text()).unwrap(), dec("9"));
    }

    #[test]
    fn test_rejection_codes_and_conversion() {
        assert_eq!(GradeRejection::DuplicateGrade.code(), "DUPLICATE_GRADE");

        let err: AppError = GradeRejection::NotEnrolled.into();
        assert_eq!(err.error_code(), "NOT_ENROLLED");

        let err: AppError = GradeRejection::OutOfRange(dec("11")).into();
        assert_eq!(err.error_code(), "GRADE_OUT_OF_RANGE");
        assert_eq!(GradeRejection::OutOfRange(dec("11")).code(), err.error_code());
    }
}

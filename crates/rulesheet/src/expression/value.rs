//! Runtime values seen by the condition evaluator.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::input::{Scalar, datetime_to_serial, format_datetime, format_number};

/// A value produced while evaluating a condition.
///
/// Text is always held lower-cased, so every textual comparison is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

impl Value {
    pub fn text(s: &str) -> Self {
        Value::Text(s.to_lowercase())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            Value::Date(_) => true,
        }
    }

    /// Numeric reading of the value; `NaN` when there is none.
    ///
    /// Blank text reads as zero. Dates read as their serial day number.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => f64::NAN,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Text(s) => parse_number(s),
            Value::Date(d) => datetime_to_serial(d),
        }
    }

    /// Text reading used for concatenation and membership; `Null` is empty.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Date(d) => format_datetime(d),
        }
    }

    /// The choices of a `a|b|c` text value, trimmed.
    pub fn alternatives(&self) -> Option<Vec<&str>> {
        match self {
            Value::Text(s) if s.contains('|') => Some(s.split('|').map(str::trim).collect()),
            _ => None,
        }
    }

    /// `==`: equality after coercing mixed operands.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, Value::Text(s)) | (Value::Text(s), Value::Null) => s.is_empty(),
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Date(d), Value::Text(s)) | (Value::Text(s), Value::Date(d)) => {
                format_datetime(d) == *s
            }
            (a, b) => a.to_number() == b.to_number(),
        }
    }

    /// `===`: equality without coercion.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`; `None` when incomparable.
    ///
    /// Two texts compare lexicographically, two dates chronologically, a date
    /// against text by its ISO form. Everything else compares numerically.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Date(d), Value::Text(s)) => Some(format_datetime(d).as_str().cmp(s.as_str())),
            (Value::Text(s), Value::Date(d)) => Some(s.as_str().cmp(format_datetime(d).as_str())),
            (a, b) => a.to_number().partial_cmp(&b.to_number()),
        }
    }
}

/// Read text as a number. Only plain decimal notation is accepted.
fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let plain = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !plain {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Number(n) => Value::Number(*n),
            Scalar::Text(s) => Value::text(s),
            Scalar::Date(d) => Value::Date(*d),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            other => f.write_str(&other.to_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_text_is_lowercased() {
        let v = Value::from(&Scalar::Text("Pending".into()));
        assert_eq!(v, Value::Text("pending".into()));
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Number(100.0).loose_eq(&Value::text("100")));
        assert!(Value::text("1e2").loose_eq(&Value::Number(100.0)));
        assert!(Value::Null.loose_eq(&Value::text("")));
        assert!(!Value::Null.loose_eq(&Value::Number(0.0)));
        assert!(Value::Bool(true).loose_eq(&Value::Number(1.0)));
        assert!(date(2023, 3, 15).loose_eq(&Value::text("2023-03-15")));
        assert!(!Value::text("abc").loose_eq(&Value::Number(0.0)));
    }

    #[test]
    fn test_strict_equality() {
        assert!(!Value::Number(100.0).strict_eq(&Value::text("100")));
        assert!(Value::text("a").strict_eq(&Value::text("a")));
        assert!(!Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(
            Value::text("apple").compare(&Value::text("banana")),
            Some(Ordering::Less)
        );
        // Two texts compare as text even when both look numeric.
        assert_eq!(
            Value::text("10").compare(&Value::text("9")),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Number(10.0).compare(&Value::text("9")),
            Some(Ordering::Greater)
        );
        assert_eq!(
            date(2024, 1, 5).compare(&Value::text("2023-12-31")),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Null.compare(&Value::Number(1.0)), None);
        assert_eq!(Value::text("abc").compare(&Value::Number(1.0)), None);
    }

    #[test]
    fn test_alternatives() {
        let v = Value::text("Paid | Pending");
        assert_eq!(v.alternatives(), Some(vec!["paid", "pending"]));
        assert_eq!(Value::text("paid").alternatives(), None);
        assert_eq!(Value::Number(1.0).alternatives(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::text("").is_truthy());
        assert!(Value::text("0").is_truthy());
        assert!(date(2020, 1, 1).is_truthy());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::text("  ").to_number(), 0.0);
        assert_eq!(Value::text("2.5").to_number(), 2.5);
        assert!(Value::text("inf").to_number().is_nan());
        assert_eq!(date(1899, 12, 31).to_number(), 1.0);
    }
}

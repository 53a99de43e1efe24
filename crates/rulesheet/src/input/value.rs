//! Cell scalars and spreadsheet serial-date conversion.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shared `Null` for lookups that miss.
pub(crate) static NULL: Scalar = Scalar::Null;

/// Milliseconds in one spreadsheet day unit.
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Plain decimal numbers as they appear in exported sheets.
///
/// Values with a leading zero (`007`, `00123`) are identifiers, not numbers.
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(0|[1-9][0-9]*)?(\.[0-9]+)?([eE][+-]?[0-9]+)?$").unwrap()
});

/// Day zero of the spreadsheet serial-date system.
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert a spreadsheet serial date into a calendar date-time.
///
/// Day 0 is 1899-12-30 and each unit is one calendar day; the fractional part
/// maps to a sub-day offset with millisecond resolution. Returns `None` for
/// non-finite serials and results outside chrono's range.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let offset = TimeDelta::try_milliseconds(millis as i64)?;
    serial_epoch().checked_add_signed(offset)
}

/// Inverse of [`serial_to_datetime`].
pub fn datetime_to_serial(value: &NaiveDateTime) -> f64 {
    let delta = *value - serial_epoch();
    delta.num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Format a number the way a spreadsheet cell displays it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let label = if value > 0.0 { "Infinity" } else { "-Infinity" };
        label.to_string()
    } else if value == 0.0 {
        // Avoid "-0".
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Format a date-time, dropping the time part at midnight.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Runtime kind of a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Text,
    Number,
    Date,
    Null,
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Scalar {
    /// Blank or absent cell.
    #[default]
    Null,
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

impl Scalar {
    /// Build a scalar from raw cell text.
    ///
    /// Blank text becomes `Null`. With `infer_numbers`, plain decimal text
    /// becomes `Number`; anything else stays `Text` untouched.
    pub fn infer(raw: &str, infer_numbers: bool) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Scalar::Null;
        }
        if infer_numbers && has_digit(trimmed) && NUMBER_PATTERN.is_match(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return Scalar::Number(n);
                }
            }
        }
        Scalar::Text(raw.to_string())
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Null => ScalarKind::Null,
            Scalar::Number(_) => ScalarKind::Number,
            Scalar::Text(_) => ScalarKind::Text,
            Scalar::Date(_) => ScalarKind::Date,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Display text of the value; `Null` is the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Number(n) => format_number(*n),
            Scalar::Text(s) => s.clone(),
            Scalar::Date(d) => format_datetime(d),
        }
    }

    /// Convert a numeric serial into a date; other values pass through.
    pub fn into_serial_date(self) -> Self {
        match self {
            Scalar::Number(n) => match serial_to_datetime(n) {
                Some(date) => Scalar::Date(date),
                None => Scalar::Number(n),
            },
            other => other,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Scalar::Date(value)
    }
}

fn has_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

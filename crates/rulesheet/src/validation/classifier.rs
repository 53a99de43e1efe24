//! Relaxed matching of cell values against expected type tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::input::{Scalar, ScalarKind, format_number};
use crate::schema::ExpectedType;

/// Short alphanumeric codes and plain unsigned decimals (`C1`, `AB12.5`, `100`).
static GENERAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]*\.?[0-9]+$|^[0-9]*\.?[0-9]+$").unwrap());

/// The class a value was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeClass {
    Text,
    Number,
    Date,
    Amount,
    General,
    Null,
}

impl TypeClass {
    pub fn label(&self) -> &'static str {
        match self {
            TypeClass::Text => "text",
            TypeClass::Number => "number",
            TypeClass::Date => "date",
            TypeClass::Amount => "amount",
            TypeClass::General => "general",
            TypeClass::Null => "null",
        }
    }
}

impl From<ScalarKind> for TypeClass {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Text => TypeClass::Text,
            ScalarKind::Number => TypeClass::Number,
            ScalarKind::Date => TypeClass::Date,
            ScalarKind::Null => TypeClass::Null,
        }
    }
}

/// Outcome of classifying one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub class: TypeClass,
    pub matched: bool,
}

impl Classification {
    fn matched(class: TypeClass) -> Self {
        Self {
            class,
            matched: true,
        }
    }

    fn mismatched(class: TypeClass) -> Self {
        Self {
            class,
            matched: false,
        }
    }

    /// Error message for a mismatch, `None` when the value matched.
    pub fn message(&self, expected: &ExpectedType) -> Option<String> {
        if self.matched {
            None
        } else {
            Some(format!("Expected {}, got {}", expected, self.class.label()))
        }
    }
}

/// Decides whether a cell satisfies its column's expected type.
///
/// Resolution order, first hit wins:
/// 1. text expected `text`, number expected `number`;
/// 2. blank cells (tolerated unless `flag_blank_cells`);
/// 3. text or numbers shaped like a short code or plain decimal are
///    `general`, which satisfies any expected type;
/// 4. dates expected `date`, numbers expected `amount`;
/// 5. anything else is a mismatch reported with its runtime kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeClassifier {
    flag_blank_cells: bool,
}

impl TypeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report blank cells as `null` mismatches instead of tolerating them.
    pub fn with_flag_blank_cells(mut self, flag: bool) -> Self {
        self.flag_blank_cells = flag;
        self
    }

    pub fn classify(&self, expected: &ExpectedType, value: &Scalar) -> Classification {
        match (value, expected) {
            (Scalar::Text(s), ExpectedType::Text) if !is_blank(s) => {
                return Classification::matched(TypeClass::Text);
            }
            (Scalar::Number(_), ExpectedType::Number) => {
                return Classification::matched(TypeClass::Number);
            }
            _ => {}
        }

        if is_blank_value(value) {
            return if self.flag_blank_cells {
                Classification::mismatched(TypeClass::Null)
            } else {
                Classification::matched(TypeClass::Null)
            };
        }

        let general = match value {
            Scalar::Text(s) => GENERAL_PATTERN.is_match(s),
            Scalar::Number(n) => GENERAL_PATTERN.is_match(&format_number(*n)),
            _ => false,
        };
        if general {
            return Classification::matched(TypeClass::General);
        }

        match (value, expected) {
            (Scalar::Date(_), ExpectedType::Date) => Classification::matched(TypeClass::Date),
            (Scalar::Number(_), ExpectedType::Amount) => {
                Classification::matched(TypeClass::Amount)
            }
            _ => Classification::mismatched(value.kind().into()),
        }
    }

    pub fn matches(&self, expected: &ExpectedType, value: &Scalar) -> bool {
        self.classify(expected, value).matched
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn is_blank_value(value: &Scalar) -> bool {
    match value {
        Scalar::Null => true,
        Scalar::Text(s) => is_blank(s),
        _ => false,
    }
}

//! Expected-type tokens declared in the type map.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Expected data type for a mapped column.
///
/// The vocabulary is open: unrecognized tokens are kept (lower-cased) and
/// only ever match values classified as general.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedType {
    Text,
    Number,
    Date,
    Amount,
    General,
    Other(String),
}

impl ExpectedType {
    /// Parse a type token, case-insensitively.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim().to_lowercase();
        match token.as_str() {
            "text" => ExpectedType::Text,
            "number" => ExpectedType::Number,
            "date" => ExpectedType::Date,
            "amount" => ExpectedType::Amount,
            "general" => ExpectedType::General,
            _ => ExpectedType::Other(token),
        }
    }

    /// Lower-case token as it appears in error messages.
    pub fn token(&self) -> &str {
        match self {
            ExpectedType::Text => "text",
            ExpectedType::Number => "number",
            ExpectedType::Date => "date",
            ExpectedType::Amount => "amount",
            ExpectedType::General => "general",
            ExpectedType::Other(token) => token,
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

//! Column → expected-type map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{Sheet, normalize_column_name};

use super::types::ExpectedType;

/// Expected type per normalized column name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMap {
    entries: IndexMap<String, ExpectedType>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a DataMap sheet: `columnName | typeToken` from row 2 on.
    ///
    /// Rows with fewer than two cells are skipped. A later entry for the same
    /// column replaces the earlier one.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let mut map = TypeMap::new();
        for row in &sheet.rows {
            if row.len() < 2 {
                continue;
            }
            let column = row[0].to_text();
            let token = row[1].to_text();
            if column.trim().is_empty() {
                continue;
            }
            map.insert(&column, ExpectedType::from_token(&token));
        }
        map
    }

    /// Insert an entry, normalizing the column name.
    pub fn insert(&mut self, column: &str, expected: ExpectedType) {
        self.entries.insert(normalize_column_name(column), expected);
    }

    /// Builder form of [`TypeMap::insert`] taking a raw token.
    pub fn with(mut self, column: &str, token: &str) -> Self {
        self.insert(column, ExpectedType::from_token(token));
        self
    }

    pub fn get(&self, column: &str) -> Option<&ExpectedType> {
        self.entries.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExpectedType)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Normalized row records.

use indexmap::IndexMap;
use serde::Serialize;

use super::value::{NULL, Scalar};

/// Canonical form of a column name: trimmed, lower-cased, whitespace removed.
///
/// This is the join key between input headers, type-map entries and the
/// identifiers used in rule conditions.
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One input record keyed by normalized column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: IndexMap<String, Scalar>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, normalizing the column name.
    pub fn insert(&mut self, column: &str, value: Scalar) {
        self.values.insert(normalize_column_name(column), value);
    }

    /// Builder form of [`Row::insert`].
    pub fn with(mut self, column: &str, value: impl Into<Scalar>) -> Self {
        self.insert(column, value.into());
        self
    }

    /// Look up a value by already-normalized column name.
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.values.get(column)
    }

    /// Value of a column, `Null` when absent.
    pub fn value(&self, column: &str) -> &Scalar {
        self.values.get(column).unwrap_or(&NULL)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Scalar)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, Scalar)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column.as_ref(), value);
        }
        row
    }
}

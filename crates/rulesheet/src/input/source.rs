//! Sheet abstraction and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::Scalar;

/// Metadata about a source sheet file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// One sheet of a workbook: a header row followed by data rows.
///
/// Rows keep their raw width; a row may be shorter than the header list
/// (trailing blank cells) and, for rule sheets, longer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name (file stem for delimited exports).
    pub name: String,
    /// Header cells of row 1, in original form.
    pub headers: Vec<String>,
    /// Data rows from row 2 onward.
    pub rows: Vec<Vec<Scalar>>,
}

impl Sheet {
    /// Create a new sheet.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Scalar> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Copy of this sheet keeping only the given rows, in the given order.
    pub fn select_rows(&self, name: impl Into<String>, indices: &[usize]) -> Sheet {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Sheet::new(name, self.headers.clone(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Sheet {
        Sheet::new(
            "Input",
            vec!["Claim No".into(), "Amount".into()],
            vec![
                vec![Scalar::from("C1"), Scalar::Number(100.0)],
                vec![Scalar::from("C2")],
                vec![Scalar::from("C3"), Scalar::Number(5.0)],
            ],
        )
    }

    #[test]
    fn test_cell_lookup() {
        let sheet = sheet();
        assert_eq!(sheet.get(1, 1), None);
        assert_eq!(sheet.get(2, 1), Some(&Scalar::Number(5.0)));
    }

    #[test]
    fn test_select_rows_keeps_headers() {
        let sheet = sheet();
        let picked = sheet.select_rows("Picked", &[2, 0, 9]);
        assert_eq!(picked.name, "Picked");
        assert_eq!(picked.headers, sheet.headers);
        assert_eq!(picked.row_count(), 2);
        assert_eq!(picked.get(0, 0), Some(&Scalar::from("C3")));
    }
}

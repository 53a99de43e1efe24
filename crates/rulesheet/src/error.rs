//! Error types for the rulesheet library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rulesheet operations.
///
/// Only structural and catastrophic failures surface here. Per-cell type
/// mismatches and failing conditions are reported as
/// [`ErrorRecord`](crate::ErrorRecord)s instead.
#[derive(Debug, Error)]
pub enum RulesheetError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty sheet or no data to validate.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A required rules sheet is absent from the workbook.
    #[error("Missing sheet: {0}")]
    MissingSheet(String),

    /// A data row does not fit the declared header list.
    #[error("Malformed row {row}: {cells} cells for {headers} headers")]
    MalformedRow {
        row: usize,
        cells: usize,
        headers: usize,
    },

    /// Failure writing report files.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for rulesheet operations.
pub type Result<T> = std::result::Result<T, RulesheetError>;

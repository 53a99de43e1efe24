//! Rulesheet: rule-driven validation of spreadsheet rows.
//!
//! Rows exported from a spreadsheet are checked against two independently
//! authored rule sets:
//!
//! - a **type map** declaring the expected data type of each column, and
//! - **condition rules**, each a guard condition followed by checks that must
//!   hold whenever the guard does (`status==paid|pending` style expressions).
//!
//! Every violation becomes an [`ErrorRecord`]; the merged
//! [`ValidationSummary`] and a [`ProcessedWorkbook`] partitioning rows by
//! error category are the outputs.
//!
//! # Example
//!
//! ```no_run
//! use rulesheet::Rulesheet;
//!
//! let rulesheet = Rulesheet::new();
//! let result = rulesheet.validate_files("claims.csv", "rules/").unwrap();
//!
//! println!("Valid rows: {}", result.summary.valid_rows);
//! println!("Errors: {}", result.summary.errors.len());
//! ```

pub mod error;
pub mod expression;
pub mod input;
pub mod report;
pub mod schema;
pub mod validation;

mod rulesheet;

pub use crate::rulesheet::{
    CategoryCounts, Rulesheet, RulesheetConfig, ValidationResult, ValidationSummary,
};
pub use error::{Result, RulesheetError};
pub use expression::{Expression, ExpressionError};
pub use input::{Row, Scalar, Sheet, SourceMetadata, Workbook};
pub use report::ProcessedWorkbook;
pub use schema::{ExpectedType, Rule, RuleSet, TypeMap};
pub use validation::{ErrorCategory, ErrorRecord, ValidationOutcome, Validator};

//! Error records for rule violations.

use serde::{Deserialize, Serialize};

use crate::input::Scalar;

/// Which validator produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCategory {
    /// Cell value does not match the type declared in the type map.
    DataType,
    /// A condition rule failed for the row.
    Condition,
}

impl ErrorCategory {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::DataType => "Data Type",
            ErrorCategory::Condition => "Condition",
        }
    }

    /// Name of the output sheet collecting rows with this kind of error.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ErrorCategory::DataType => "DataTypeErrors",
            ErrorCategory::Condition => "ConditionErrors",
        }
    }
}

/// One reported violation, attributable to a row and column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Zero-based index of the row in the input.
    pub row: usize,
    pub category: ErrorCategory,
    /// Value of the row's claim column, when it has one.
    pub claim_number: Option<String>,
    /// Column the error is attributed to: the type-map key for type errors,
    /// the declared sheet header for condition errors.
    pub header: String,
    /// The offending cell value.
    pub value: Scalar,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rule_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Condition text as authored, for condition errors.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub condition: Option<String>,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(
        row: usize,
        category: ErrorCategory,
        header: impl Into<String>,
        value: Scalar,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            category,
            claim_number: None,
            header: header.into(),
            value,
            rule_no: None,
            description: None,
            condition: None,
            message: message.into(),
        }
    }

    /// Set the claim number; blank values are left unset.
    pub fn with_claim_number(mut self, claim: &Scalar) -> Self {
        self.claim_number = if claim.is_null() {
            None
        } else {
            Some(claim.to_text())
        };
        self
    }

    /// Set the rule number and description.
    pub fn with_rule(mut self, rule_no: impl Into<String>, description: impl Into<String>) -> Self {
        self.rule_no = Some(rule_no.into());
        self.description = Some(description.into());
        self
    }

    /// Set the condition text.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

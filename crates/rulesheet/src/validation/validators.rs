//! Validators that check normalized rows against the type map and the
//! condition rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::expression::{Expression, ExpressionError};
use crate::input::{Row, normalize_column_name};
use crate::schema::{Rule, RuleSet, TypeMap, normalize_condition};

use super::classifier::TypeClassifier;
use super::record::{ErrorCategory, ErrorRecord};

/// Counts and errors from one validator over a row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Rows that produced no error.
    pub valid_rows: usize,
    /// Rows that produced at least one error.
    pub invalid_rows: usize,
    /// Every error, in row order.
    pub errors: Vec<ErrorRecord>,
}

impl ValidationOutcome {
    /// Account for one row and its errors.
    fn record_row(&mut self, errors: Vec<ErrorRecord>) {
        if errors.is_empty() {
            self.valid_rows += 1;
        } else {
            self.invalid_rows += 1;
            self.errors.extend(errors);
        }
    }
}

/// Trait for validators.
pub trait Validator {
    /// Category attached to every error this validator reports.
    fn category(&self) -> ErrorCategory;

    /// Run validation over every row.
    fn validate(&self, rows: &[Row]) -> ValidationOutcome;
}

/// Checks every mapped column of every row against its expected type.
pub struct DataTypeValidator {
    type_map: TypeMap,
    classifier: TypeClassifier,
    claim_column: String,
}

impl DataTypeValidator {
    pub fn new(type_map: TypeMap, claim_column: &str) -> Self {
        Self {
            type_map,
            classifier: TypeClassifier::new(),
            claim_column: normalize_column_name(claim_column),
        }
    }

    pub fn with_classifier(mut self, classifier: TypeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    fn check_row(&self, index: usize, row: &Row) -> Vec<ErrorRecord> {
        let mut errors = Vec::new();

        for (column, expected) in self.type_map.iter() {
            let value = row.value(column);
            let classification = self.classifier.classify(expected, value);
            if let Some(message) = classification.message(expected) {
                errors.push(
                    ErrorRecord::new(index, ErrorCategory::DataType, column, value.clone(), message)
                        .with_claim_number(row.value(&self.claim_column)),
                );
            }
        }

        errors
    }
}

impl Validator for DataTypeValidator {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::DataType
    }

    fn validate(&self, rows: &[Row]) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        for (index, row) in rows.iter().enumerate() {
            outcome.record_row(self.check_row(index, row));
        }
        outcome
    }
}

/// A declared header and the whole-word pattern finding it in condition text.
struct HeaderMatcher {
    /// Header as written in the sheet.
    name: String,
    /// Normalized column key.
    column: String,
    pattern: Regex,
}

/// A condition parsed once, with the header it is attributed to.
struct CompiledCondition {
    /// Text as authored, used in error messages.
    text: String,
    /// First declared header the normalized text mentions as a whole word.
    header: Option<(String, String)>,
    parsed: std::result::Result<Expression, ExpressionError>,
}

impl CompiledCondition {
    fn evaluate(&self, row: &Row) -> std::result::Result<bool, ExpressionError> {
        match &self.parsed {
            Ok(expression) => expression.is_satisfied(row),
            Err(e) => Err(e.clone()),
        }
    }
}

struct CompiledRule {
    rule_no: String,
    description: String,
    guard: CompiledCondition,
    checks: Vec<CompiledCondition>,
}

/// Result of checking a rule's guard against a row.
enum GuardDecision {
    Applies,
    Skip,
    Failed(ExpressionError),
}

/// Evaluates condition rules row by row.
///
/// The first condition of a rule is its guard: when it is false the rule does
/// not apply to the row. Otherwise the remaining conditions are evaluated in
/// order and the first that fails (or cannot be parsed or evaluated) yields
/// one error for the rule; the rest of that rule is skipped.
///
/// A condition only takes part when its normalized text mentions one of the
/// declared headers as a whole word. A guard that mentions none applies to
/// every row.
pub struct ConditionRuleValidator {
    rules: Vec<CompiledRule>,
    claim_column: String,
}

impl ConditionRuleValidator {
    /// Compile the rules against the sheet's declared headers.
    pub fn new(rules: &RuleSet, headers: &[String], claim_column: &str) -> Result<Self> {
        let matchers = header_matchers(headers)?;

        let rules = rules
            .iter()
            .filter_map(|rule| compile_rule(rule, &matchers))
            .collect();

        Ok(Self {
            rules,
            claim_column: normalize_column_name(claim_column),
        })
    }

    fn check_guard(&self, rule: &CompiledRule, row: &Row) -> GuardDecision {
        if rule.guard.header.is_none() {
            return GuardDecision::Applies;
        }
        match rule.guard.evaluate(row) {
            Ok(true) => GuardDecision::Applies,
            Ok(false) => GuardDecision::Skip,
            Err(e) => GuardDecision::Failed(e),
        }
    }

    fn check_row(&self, index: usize, row: &Row) -> Vec<ErrorRecord> {
        let mut errors = Vec::new();

        for rule in &self.rules {
            match self.check_guard(rule, row) {
                GuardDecision::Applies => {}
                GuardDecision::Skip => {
                    debug!(row = index, rule = %rule.rule_no, "guard not met, rule skipped");
                    continue;
                }
                GuardDecision::Failed(e) => {
                    warn!(
                        row = index,
                        rule = %rule.rule_no,
                        condition = %rule.guard.text,
                        error = %e,
                        "guard could not be evaluated"
                    );
                    errors.push(self.violation(index, row, rule, &rule.guard));
                    continue;
                }
            }

            for check in &rule.checks {
                if check.header.is_none() {
                    continue;
                }
                match check.evaluate(row) {
                    Ok(true) => {}
                    Ok(false) => {
                        errors.push(self.violation(index, row, rule, check));
                        break;
                    }
                    Err(e) => {
                        warn!(
                            row = index,
                            rule = %rule.rule_no,
                            condition = %check.text,
                            error = %e,
                            "condition could not be evaluated"
                        );
                        errors.push(self.violation(index, row, rule, check));
                        break;
                    }
                }
            }
        }

        errors
    }

    fn violation(
        &self,
        index: usize,
        row: &Row,
        rule: &CompiledRule,
        condition: &CompiledCondition,
    ) -> ErrorRecord {
        let (header, column) = condition.header.clone().unwrap_or_default();
        let value = row.value(&column).clone();
        ErrorRecord::new(
            index,
            ErrorCategory::Condition,
            header,
            value,
            format!("Condition failed: {}", condition.text),
        )
        .with_claim_number(row.value(&self.claim_column))
        .with_rule(&rule.rule_no, &rule.description)
        .with_condition(&condition.text)
    }
}

impl Validator for ConditionRuleValidator {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Condition
    }

    fn validate(&self, rows: &[Row]) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        for (index, row) in rows.iter().enumerate() {
            outcome.record_row(self.check_row(index, row));
        }
        outcome
    }
}

/// Whole-word matchers for each non-blank normalized header, in order.
fn header_matchers(headers: &[String]) -> Result<Vec<HeaderMatcher>> {
    let mut matchers = Vec::new();
    for header in headers {
        let column = normalize_column_name(header);
        if column.is_empty() {
            continue;
        }
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&column)))?;
        matchers.push(HeaderMatcher {
            name: header.trim().to_string(),
            column,
            pattern,
        });
    }
    Ok(matchers)
}

fn compile_condition(text: &str, matchers: &[HeaderMatcher]) -> CompiledCondition {
    let normalized = normalize_condition(text);
    let header = matchers
        .iter()
        .find(|m| m.pattern.is_match(&normalized))
        .map(|m| (m.name.clone(), m.column.clone()));

    CompiledCondition {
        text: text.to_string(),
        header,
        parsed: Expression::parse(&normalized),
    }
}

fn compile_rule(rule: &Rule, matchers: &[HeaderMatcher]) -> Option<CompiledRule> {
    let (guard, checks) = rule.conditions.split_first()?;
    Some(CompiledRule {
        rule_no: rule.rule_no.clone(),
        description: rule.rule_description.clone(),
        guard: compile_condition(guard, matchers),
        checks: checks
            .iter()
            .map(|check| compile_condition(check, matchers))
            .collect(),
    })
}

/// Runs a set of validators over the same rows.
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Add a validator; validators run in the order they were added.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Run every validator and return each outcome with its category.
    pub fn validate(&self, rows: &[Row]) -> Vec<(ErrorCategory, ValidationOutcome)> {
        self.validators
            .iter()
            .map(|validator| (validator.category(), validator.validate(rows)))
            .collect()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

//! Main Rulesheet struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RulesheetError};
use crate::input::{Parser, ParserConfig, Row, Sheet, SourceMetadata, Workbook, normalize_column_name};
use crate::report::ProcessedWorkbook;
use crate::schema::{RuleSet, TypeMap};
use crate::validation::{
    ConditionRuleValidator, DataTypeValidator, ErrorCategory, ErrorRecord, TypeClassifier,
    ValidationEngine,
};

/// Configuration for a validation run.
#[derive(Debug, Clone)]
pub struct RulesheetConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Column whose value identifies a row in error records.
    pub claim_column: String,
    /// Report blank cells as type mismatches.
    pub flag_blank_cells: bool,
    /// Columns whose normalized name contains this marker hold serial dates.
    pub date_column_marker: String,
}

impl Default for RulesheetConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            claim_column: "claimno".to_string(),
            flag_blank_cells: false,
            date_column_marker: "date".to_string(),
        }
    }
}

/// Invalid-row counts per validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub data_type: usize,
    pub condition: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: ErrorCategory) -> usize {
        match category {
            ErrorCategory::DataType => self.data_type,
            ErrorCategory::Condition => self.condition,
        }
    }
}

/// Merged outcome of one validation run.
///
/// `valid_rows` comes from the data-type check alone while `invalid_rows`
/// adds up both validators, so a row failing both is counted twice and the
/// two need not sum to `total_rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub invalid_rows_by_category: CategoryCounts,
    /// Rows that passed every condition rule.
    pub condition_valid_rows: usize,
    /// Data-type errors first, then condition errors, each in row order.
    pub errors: Vec<ErrorRecord>,
}

impl ValidationSummary {
    /// Whether no validator reported anything.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors_in(&self, category: ErrorCategory) -> impl Iterator<Item = &ErrorRecord> {
        self.errors.iter().filter(move |e| e.category == category)
    }

    /// Indices of rows with at least one error of the category, ascending.
    pub fn rows_with_errors(&self, category: ErrorCategory) -> Vec<usize> {
        let mut rows: Vec<usize> = self.errors_in(category).map(|e| e.row).collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }
}

/// Everything produced by validating files on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Metadata about the input sheet file.
    pub source: SourceMetadata,
    /// Metadata about the rule sheet files.
    pub rule_sources: Vec<SourceMetadata>,
    pub summary: ValidationSummary,
    /// Input rows partitioned by error category.
    #[serde(skip)]
    pub workbook: ProcessedWorkbook,
}

/// The validation orchestrator.
pub struct Rulesheet {
    config: RulesheetConfig,
    parser: Parser,
}

impl Rulesheet {
    /// Create a new instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(RulesheetConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: RulesheetConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &RulesheetConfig {
        &self.config
    }

    /// Turn sheet rows into normalized [`Row`]s.
    ///
    /// Short rows are padded with blanks. Cells in date columns holding a
    /// number are read as serial dates. A row with more cells than headers
    /// fails the whole run.
    pub fn normalize_rows(&self, sheet: &Sheet) -> Result<Vec<Row>> {
        let columns: Vec<String> = sheet.headers.iter().map(|h| normalize_column_name(h)).collect();
        let marker = normalize_column_name(&self.config.date_column_marker);
        let date_columns: Vec<bool> = columns
            .iter()
            .map(|c| !marker.is_empty() && c.contains(&marker))
            .collect();

        debug!(
            sheet = %sheet.name,
            date_columns = date_columns.iter().filter(|d| **d).count(),
            "normalizing rows"
        );

        let mut rows = Vec::with_capacity(sheet.rows.len());
        for (index, cells) in sheet.rows.iter().enumerate() {
            if cells.len() > columns.len() {
                return Err(RulesheetError::MalformedRow {
                    row: index,
                    cells: cells.len(),
                    headers: columns.len(),
                });
            }

            let mut row = Row::new();
            for (position, column) in columns.iter().enumerate() {
                if column.is_empty() {
                    continue;
                }
                let mut value = cells.get(position).cloned().unwrap_or_default();
                if date_columns[position] {
                    value = value.into_serial_date();
                }
                row.insert(column, value);
            }
            rows.push(row);
        }

        Ok(rows)
    }

    /// Validate a data sheet against a type map and condition rules.
    pub fn validate(
        &self,
        data: &Sheet,
        type_map: &TypeMap,
        rules: &RuleSet,
    ) -> Result<ValidationSummary> {
        let rows = self.normalize_rows(data)?;

        let classifier = TypeClassifier::new().with_flag_blank_cells(self.config.flag_blank_cells);
        let engine = ValidationEngine::new()
            .with_validator(
                DataTypeValidator::new(type_map.clone(), &self.config.claim_column)
                    .with_classifier(classifier),
            )
            .with_validator(ConditionRuleValidator::new(
                rules,
                &data.headers,
                &self.config.claim_column,
            )?);

        let mut summary = ValidationSummary {
            total_rows: rows.len(),
            ..ValidationSummary::default()
        };

        for (category, outcome) in engine.validate(&rows) {
            match category {
                ErrorCategory::DataType => {
                    summary.valid_rows = outcome.valid_rows;
                    summary.invalid_rows_by_category.data_type = outcome.invalid_rows;
                }
                ErrorCategory::Condition => {
                    summary.condition_valid_rows = outcome.valid_rows;
                    summary.invalid_rows_by_category.condition = outcome.invalid_rows;
                }
            }
            summary.invalid_rows += outcome.invalid_rows;
            summary.errors.extend(outcome.errors);
        }

        info!(
            total = summary.total_rows,
            valid = summary.valid_rows,
            invalid = summary.invalid_rows,
            data_type_errors = summary.errors_in(ErrorCategory::DataType).count(),
            condition_errors = summary.errors_in(ErrorCategory::Condition).count(),
            "validation complete"
        );

        Ok(summary)
    }

    /// Validate a data sheet against a rules workbook.
    ///
    /// Fails before validating anything when the workbook lacks the DataMap
    /// or ConditionRule sheet.
    pub fn validate_workbook(&self, data: &Sheet, rules: &Workbook) -> Result<ValidationSummary> {
        let type_map = TypeMap::from_sheet(rules.data_map()?);
        let rule_set = RuleSet::from_sheet(rules.condition_rules()?);

        debug!(
            mapped_columns = type_map.len(),
            rules = rule_set.len(),
            "loaded rules workbook"
        );

        self.validate(data, &type_map, &rule_set)
    }

    /// Validate an input file against the rule sheets in a directory.
    pub fn validate_files(
        &self,
        input: impl AsRef<Path>,
        rules_dir: impl AsRef<Path>,
    ) -> Result<ValidationResult> {
        let rules = Workbook::from_dir(rules_dir, &self.parser)?;
        let (data, source) = self.parser.parse_file(input)?;

        let summary = self.validate_workbook(&data, &rules)?;
        let workbook = ProcessedWorkbook::build(&data, &summary);

        Ok(ValidationResult {
            source,
            rule_sources: rules.sources().to_vec(),
            summary,
            workbook,
        })
    }
}

impl Default for Rulesheet {
    fn default() -> Self {
        Self::new()
    }
}

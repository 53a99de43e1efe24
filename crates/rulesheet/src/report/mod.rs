//! Output artifact: the input rows partitioned by error category.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{Result, RulesheetError};
use crate::input::Sheet;
use crate::rulesheet::ValidationSummary;
use crate::validation::ErrorCategory;

/// Name of the sheet holding every input row.
pub const ORIGINAL_SHEET: &str = "Original";

/// File name of the JSON summary written next to the sheets.
pub const SUMMARY_FILE: &str = "summary.json";

/// The validated input plus one sheet per error category.
///
/// Error sheets list each failing row once, in input order, and are left out
/// when no row has an error of that category.
#[derive(Debug, Clone, Default)]
pub struct ProcessedWorkbook {
    sheets: Vec<Sheet>,
    summary: ValidationSummary,
}

impl ProcessedWorkbook {
    pub fn build(original: &Sheet, summary: &ValidationSummary) -> Self {
        let mut sheets = vec![Sheet::new(
            ORIGINAL_SHEET,
            original.headers.clone(),
            original.rows.clone(),
        )];

        for category in [ErrorCategory::DataType, ErrorCategory::Condition] {
            let rows = summary.rows_with_errors(category);
            if !rows.is_empty() {
                sheets.push(original.select_rows(category.sheet_name(), &rows));
            }
        }

        Self {
            sheets,
            summary: summary.clone(),
        }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn summary(&self) -> &ValidationSummary {
        &self.summary
    }

    /// Write each sheet as `<name>.csv` and the summary as JSON into `dir`.
    ///
    /// Returns the paths written, sheets first.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                RulesheetError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let mut written = Vec::with_capacity(self.sheets.len() + 1);
        for sheet in &self.sheets {
            let path = dir.join(format!("{}.csv", sheet.name));
            write_sheet(sheet, &path)?;
            written.push(path);
        }

        let path = dir.join(SUMMARY_FILE);
        let file = File::create(&path).map_err(|e| {
            RulesheetError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.summary)?;
        written.push(path);

        Ok(written)
    }
}

fn write_sheet(sheet: &Sheet, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)?;

    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row.iter().map(|cell| cell.to_text()))?;
    }
    writer.flush().map_err(|e| RulesheetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Scalar;
    use crate::validation::ErrorRecord;

    fn input() -> Sheet {
        Sheet::new(
            "claims",
            vec!["Claim No".into(), "Amount".into()],
            vec![
                vec![Scalar::from("C1"), Scalar::Number(100.0)],
                vec![Scalar::from("C2"), Scalar::from("abc")],
                vec![Scalar::from("C3"), Scalar::Number(-1.0)],
            ],
        )
    }

    fn summary() -> ValidationSummary {
        let error = |row, category| {
            ErrorRecord::new(row, category, "amount", Scalar::Null, "failed")
        };
        ValidationSummary {
            total_rows: 3,
            valid_rows: 2,
            invalid_rows: 2,
            errors: vec![
                error(1, ErrorCategory::DataType),
                error(1, ErrorCategory::DataType),
                error(2, ErrorCategory::Condition),
            ],
            ..ValidationSummary::default()
        }
    }

    #[test]
    fn test_partitions_rows_by_category() {
        let workbook = ProcessedWorkbook::build(&input(), &summary());
        let names: Vec<&str> = workbook.sheets().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Original", "DataTypeErrors", "ConditionErrors"]);

        let type_errors = workbook.sheet("DataTypeErrors").unwrap();
        assert_eq!(type_errors.row_count(), 1);
        assert_eq!(type_errors.rows[0][0], Scalar::from("C2"));
        assert_eq!(workbook.sheet("Original").unwrap().row_count(), 3);
    }

    #[test]
    fn test_empty_error_sheets_omitted() {
        let clean = ValidationSummary {
            total_rows: 3,
            valid_rows: 3,
            ..ValidationSummary::default()
        };
        let workbook = ProcessedWorkbook::build(&input(), &clean);
        assert_eq!(workbook.sheets().len(), 1);
    }

    #[test]
    fn test_save_writes_sheets_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report");
        let written = ProcessedWorkbook::build(&input(), &summary())
            .save(&out)
            .unwrap();

        assert_eq!(written.len(), 4);
        let original = fs::read_to_string(out.join("Original.csv")).unwrap();
        assert_eq!(original, "Claim No,Amount\nC1,100\nC2,abc\nC3,-1\n");

        let json = fs::read_to_string(out.join(SUMMARY_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalRows"], 3);
        assert_eq!(value["errors"].as_array().unwrap().len(), 3);
    }
}

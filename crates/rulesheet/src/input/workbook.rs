//! Named collections of sheets.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RulesheetError};
use super::parser::Parser;
use super::source::{Sheet, SourceMetadata};

/// File extensions read as sheets when loading a directory.
const SHEET_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "psv"];

/// Names accepted for the type-map sheet (compared after [`sheet_key`]).
const DATA_MAP_NAMES: &[&str] = &["datamap", "map", "datatypes"];

/// Names accepted for the condition-rule sheet.
const CONDITION_RULE_NAMES: &[&str] = &["conditionrule", "conditionrules", "rules"];

/// Canonical form of a sheet name for lookup.
fn sheet_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// An ordered set of sheets, e.g. the two-sheet rules workbook.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    sources: Vec<SourceMetadata>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Workbook::push`].
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.push(sheet);
        self
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Load every delimited file in `dir` as a sheet, ordered by file name.
    pub fn from_dir(dir: impl AsRef<Path>, parser: &Parser) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| RulesheetError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RulesheetError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            let is_sheet = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SHEET_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
            if path.is_file() && is_sheet {
                paths.push(path);
            }
        }
        paths.sort();

        Self::from_files(&paths, parser)
    }

    /// Load the given files as sheets, in order.
    pub fn from_files(paths: &[PathBuf], parser: &Parser) -> Result<Self> {
        let mut workbook = Workbook::new();
        for path in paths {
            let (sheet, source) = parser.parse_file(path)?;
            workbook.sheets.push(sheet);
            workbook.sources.push(source);
        }
        Ok(workbook)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Metadata for sheets that were read from files.
    pub fn sources(&self) -> &[SourceMetadata] {
        &self.sources
    }

    /// Find a sheet by name, ignoring case, spaces and punctuation.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        let key = sheet_key(name);
        self.sheets.iter().find(|s| sheet_key(&s.name) == key)
    }

    /// The sheet mapping columns to expected data types.
    pub fn data_map(&self) -> Result<&Sheet> {
        self.find_any(DATA_MAP_NAMES)
            .ok_or_else(|| RulesheetError::MissingSheet("DataMap".to_string()))
    }

    /// The sheet holding condition rules.
    pub fn condition_rules(&self) -> Result<&Sheet> {
        self.find_any(CONDITION_RULE_NAMES)
            .ok_or_else(|| RulesheetError::MissingSheet("ConditionRule".to_string()))
    }

    fn find_any(&self, names: &[&str]) -> Option<&Sheet> {
        names.iter().find_map(|name| self.sheet(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str) -> Sheet {
        Sheet::new(name, vec!["a".to_string()], Vec::new())
    }

    #[test]
    fn test_rule_sheets_found_by_name() {
        let workbook = Workbook::new()
            .with_sheet(sheet("Condition_Rule"))
            .with_sheet(sheet("Data Map"));

        assert_eq!(workbook.data_map().unwrap().name, "Data Map");
        assert_eq!(workbook.condition_rules().unwrap().name, "Condition_Rule");
    }

    #[test]
    fn test_missing_sheet_fails_fast() {
        let workbook = Workbook::new().with_sheet(sheet("DataMap"));
        assert!(matches!(
            workbook.condition_rules(),
            Err(RulesheetError::MissingSheet(name)) if name == "ConditionRule"
        ));
    }
}

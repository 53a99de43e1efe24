//! CSV/TSV sheet parser with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Result, RulesheetError};
use super::source::{Sheet, SourceMetadata};
use super::value::Scalar;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
    /// Read plain decimal cells as numbers instead of text.
    pub infer_numbers: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            infer_numbers: true,
        }
    }
}

/// Parses delimited sheet exports.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a sheet named after the file stem.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Sheet, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| RulesheetError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| RulesheetError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sheet = self.parse_bytes(&name, &contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            sheet.row_count(),
            sheet.column_count(),
        );

        Ok((sheet, source))
    }

    /// Parse in-memory text, detecting the delimiter unless configured.
    pub fn parse_str(&self, name: &str, text: &str) -> Result<Sheet> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(text.as_bytes())?,
        };
        self.parse_bytes(name, text.as_bytes(), delimiter)
    }

    /// Parse bytes directly. Row 1 is the header row.
    fn parse_bytes(&self, name: &str, bytes: &[u8], delimiter: u8) -> Result<Sheet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(RulesheetError::EmptyData(format!(
                "Sheet '{}' has no header row",
                name
            )));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row: Vec<Scalar> = record
                .iter()
                .map(|cell| Scalar::infer(cell, self.config.infer_numbers))
                .collect();

            // Trailing blanks past the header width are export noise.
            while row.len() > headers.len() && row.last().is_some_and(Scalar::is_null) {
                row.pop();
            }

            rows.push(row);
        }

        Ok(Sheet::new(name, headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(RulesheetError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins. '|' also appears inside
        // membership conditions, so it never gets the consistency bonus.
        let score = if consistent && delim != b'|' {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_membership_pipes() {
        let data = b"RuleNo,Description,Condition1,Condition2\n\
                     R1,Status check,type=='x',status==paid|pending\n\
                     R2,Other,type=='y',status!=void|draft\n";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"Claim No,Amount,Status\nC1,100,Paid\nC2,abc,\n";
        let sheet = parser.parse_bytes("Input", data, b',').unwrap();

        assert_eq!(sheet.headers, vec!["Claim No", "Amount", "Status"]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.get(0, 0), Some(&Scalar::from("C1")));
        assert_eq!(sheet.get(0, 1), Some(&Scalar::Number(100.0)));
        assert_eq!(sheet.get(1, 1), Some(&Scalar::from("abc")));
        assert_eq!(sheet.get(1, 2), Some(&Scalar::Null));
    }

    #[test]
    fn test_parse_without_number_inference() {
        let parser = Parser::with_config(ParserConfig {
            infer_numbers: false,
            ..ParserConfig::default()
        });
        let sheet = parser.parse_bytes("Input", b"amount\n100\n", b',').unwrap();
        assert_eq!(sheet.get(0, 0), Some(&Scalar::from("100")));
    }

    #[test]
    fn test_trailing_blank_cells_dropped() {
        let parser = Parser::new();
        let sheet = parser.parse_bytes("Input", b"a,b\n1,2,,\n1,2,3\n", b',').unwrap();
        assert_eq!(sheet.rows[0].len(), 2);
        assert_eq!(sheet.rows[1].len(), 3);
    }

    #[test]
    fn test_parse_str_detects_delimiter() {
        let parser = Parser::new();
        let sheet = parser.parse_str("Map", "Column\tType\nAmount\tnumber\n").unwrap();
        assert_eq!(sheet.name, "Map");
        assert_eq!(sheet.get(0, 1), Some(&Scalar::from("number")));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_str("Empty", "\n\n"),
            Err(RulesheetError::EmptyData(_))
        ));
    }
}

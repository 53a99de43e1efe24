//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rulesheet: validate spreadsheet rows against type and condition rules
#[derive(Parser)]
#[command(name = "rulesheet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a data sheet against a rules directory
    Validate {
        /// Path to the data sheet (CSV/TSV)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory holding the DataMap and ConditionRule sheets
        #[arg(short, long, value_name = "RULES_DIR")]
        rules: PathBuf,

        /// Directory to write the processed workbook to
        #[arg(short, long, value_name = "OUT_DIR")]
        output: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Column identifying each row in error reports
        #[arg(long, default_value = "claimno")]
        claim_column: String,

        /// Report blank cells as type errors
        #[arg(long)]
        flag_blank_cells: bool,

        /// Maximum number of errors to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Check that every condition in the rules directory parses
    Lint {
        /// Directory holding the DataMap and ConditionRule sheets
        #[arg(value_name = "RULES_DIR")]
        rules: PathBuf,
    },
}

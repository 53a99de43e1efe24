//! Validate command - check a data sheet against a rules directory.

use std::path::PathBuf;

use colored::Colorize;
use rulesheet::{ErrorCategory, Rulesheet, RulesheetConfig};
use tracing::debug;

pub struct ValidateArgs {
    pub input: PathBuf,
    pub rules: PathBuf,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub claim_column: String,
    pub flag_blank_cells: bool,
    pub limit: usize,
    pub verbose: bool,
}

pub fn run(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.exists() {
        return Err(format!("File not found: {}", args.input.display()).into());
    }
    if !args.rules.is_dir() {
        return Err(format!("Rules directory not found: {}", args.rules.display()).into());
    }

    let config = RulesheetConfig {
        claim_column: args.claim_column,
        flag_blank_cells: args.flag_blank_cells,
        ..RulesheetConfig::default()
    };
    let result = Rulesheet::with_config(config).validate_files(&args.input, &args.rules)?;

    if let Some(ref dir) = args.output {
        let written = result.workbook.save(dir)?;
        for path in &written {
            debug!(path = %path.display(), "wrote report file");
        }
        if !args.json {
            println!(
                "{} {} files to {}",
                "Wrote".green().bold(),
                written.len(),
                dir.display().to_string().white()
            );
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
        return Ok(());
    }

    let summary = &result.summary;

    println!(
        "{} {}",
        "Validated".cyan().bold(),
        result.source.file.white()
    );
    if args.verbose {
        for source in &result.rule_sources {
            println!("  rules: {} ({})", source.file, source.hash);
        }
    }
    println!();

    println!("Total rows:   {}", summary.total_rows.to_string().white().bold());
    println!("Valid rows:   {}", summary.valid_rows.to_string().green());
    println!("Invalid rows: {}", summary.invalid_rows.to_string().red());
    for category in [ErrorCategory::DataType, ErrorCategory::Condition] {
        println!(
            "  {:12} {} rows, {} errors",
            category.label(),
            summary.invalid_rows_by_category.get(category),
            summary.errors_in(category).count()
        );
    }

    if summary.is_clean() {
        println!();
        println!("{}", "No errors found.".green());
        return Ok(());
    }

    println!();
    println!("{}", "Errors:".yellow().bold());
    for error in summary.errors.iter().take(args.limit) {
        let claim = error.claim_number.as_deref().unwrap_or("-");
        let rule = error
            .rule_no
            .as_deref()
            .map(|r| format!(" [rule {}]", r))
            .unwrap_or_default();
        println!(
            "  row {:<5} {:12} {:16} {}{}",
            error.row + 1,
            claim,
            error.header.cyan(),
            error.message,
            rule.dimmed()
        );
    }

    let remaining = summary.errors.len().saturating_sub(args.limit);
    if remaining > 0 {
        println!("  ... and {} more", remaining);
    }

    Ok(())
}

//! Lint command - parse every rule without validating any data.

use std::path::PathBuf;

use colored::Colorize;
use rulesheet::expression::Expression;
use rulesheet::input::{Parser, Workbook};
use rulesheet::schema::normalize_condition;
use rulesheet::{ExpectedType, RuleSet, TypeMap};

pub fn run(rules: PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !rules.is_dir() {
        return Err(format!("Rules directory not found: {}", rules.display()).into());
    }

    let workbook = Workbook::from_dir(&rules, &Parser::new())?;
    let type_map = TypeMap::from_sheet(workbook.data_map()?);
    let rule_set = RuleSet::from_sheet(workbook.condition_rules()?);

    println!(
        "{} {} mapped columns, {} rules",
        "Checking".cyan().bold(),
        type_map.len(),
        rule_set.len()
    );

    for (column, expected) in type_map.iter() {
        if let ExpectedType::Other(token) = expected {
            println!(
                "  {} column {} has unknown type '{}'",
                "warning:".yellow(),
                column.cyan(),
                token
            );
        }
    }

    let mut failures = 0;
    for rule in rule_set.iter() {
        for condition in &rule.conditions {
            match Expression::parse(&normalize_condition(condition)) {
                Ok(expression) => {
                    if verbose {
                        println!("  {} {} {}", "ok".green(), rule.rule_no, expression.expr());
                    }
                }
                Err(e) => {
                    failures += 1;
                    println!(
                        "  {} rule {}: {}\n    {}",
                        "error:".red().bold(),
                        rule.rule_no,
                        condition,
                        e.to_string().lines().collect::<Vec<_>>().join("\n    ")
                    );
                }
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} conditions failed to parse", failures).into());
    }

    println!("{}", "All conditions parse.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn rules_dir(conditions: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("DataMap.csv"), "Column,Type\nAmount,number\n").unwrap();
        fs::write(
            dir.path().join("ConditionRule.csv"),
            format!("RuleNo,Description,Condition1,Condition2\n{}\n", conditions),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_lint_accepts_valid_rules() {
        let dir = rules_dir("R1,paid,Status == Paid|Settled,Amount > 0");
        assert!(run(dir.path().to_path_buf(), false).is_ok());
    }

    #[test]
    fn test_lint_reports_syntax_errors() {
        let dir = rules_dir("R1,broken,Status ==,Amount > 0");
        let err = run(dir.path().to_path_buf(), false).unwrap_err();
        assert!(err.to_string().contains("1 conditions failed"));
    }

    #[test]
    fn test_lint_missing_dir() {
        assert!(run(PathBuf::from("/nonexistent/rules"), false).is_err());
    }
}

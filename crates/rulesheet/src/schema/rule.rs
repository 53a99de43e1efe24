//! Condition rules read from the ConditionRule sheet.

use serde::{Deserialize, Serialize};

use crate::input::Sheet;

/// Canonical form of a condition's text.
///
/// Whitespace outside quoted literals is removed and the whole text is
/// lower-cased, so header names written as `Claim No` match the normalized
/// column `claimno`. Quoted literals keep their inner spacing, and escaped
/// characters keep their case until the literal is decoded.
pub fn normalize_condition(condition: &str) -> String {
    let mut out = String::with_capacity(condition.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in condition.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    // `\N` and `\n` decode differently; keep the case.
                    escaped = false;
                    out.push(ch);
                    continue;
                }
                if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
                out.extend(ch.to_lowercase());
            }
            None => {
                if ch.is_whitespace() {
                    continue;
                }
                if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                }
                out.extend(ch.to_lowercase());
            }
        }
    }

    out
}

/// A numbered rule: a guard condition followed by the checks it gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub rule_no: String,
    pub rule_description: String,
    /// Condition texts as authored; the first is the guard.
    pub conditions: Vec<String>,
}

impl Rule {
    pub fn new(
        rule_no: impl Into<String>,
        rule_description: impl Into<String>,
        conditions: Vec<String>,
    ) -> Self {
        Self {
            rule_no: rule_no.into(),
            rule_description: rule_description.into(),
            conditions,
        }
    }
}

/// Ordered rules; order matters because rules are reported in sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a ConditionRule sheet:
    /// `ruleNo | description | cond1 | cond2 | ...` from row 2 on.
    ///
    /// Rows with fewer than three cells are skipped, blank condition cells are
    /// dropped, and rules left without any condition are skipped.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let mut rules = RuleSet::new();
        for row in &sheet.rows {
            if row.len() < 3 {
                continue;
            }
            let conditions: Vec<String> = row[2..]
                .iter()
                .map(|cell| cell.to_text())
                .filter(|text| !text.trim().is_empty())
                .collect();
            if conditions.is_empty() {
                continue;
            }
            rules.push(Rule::new(row[0].to_text(), row[1].to_text(), conditions));
        }
        rules
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

//! Fuzz target for condition expressions.
//!
//! Parsing arbitrary condition text and evaluating whatever parses must
//! never panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rulesheet::expression::Expression;
use rulesheet::schema::normalize_condition;
use rulesheet::Row;

#[derive(Arbitrary, Debug)]
struct Input {
    condition: String,
    status: String,
    amount: f64,
}

fuzz_target!(|input: Input| {
    if input.condition.len() > 1_000 {
        return;
    }

    let normalized = normalize_condition(&input.condition);
    if let Ok(expression) = Expression::parse(&normalized) {
        let row = Row::new()
            .with("status", input.status.as_str())
            .with("amount", input.amount);
        let _ = expression.is_satisfied(&row);
    }
});

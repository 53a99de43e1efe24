//! Condition expressions: parsing and evaluation against a row.
//!
//! Conditions are small infix expressions over row fields, for example
//! `claimtype=='motor'&&amount>0`. A right-hand operand of the form
//! `paid|pending` is a set of alternatives: `==` tests membership and `!=`
//! tests non-membership.

mod ast;
mod eval;
mod parser;
mod value;

use thiserror::Error;

use crate::input::Row;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use eval::evaluate;
pub use parser::parse_condition;
pub use value::Value;

/// Failure to parse or evaluate a condition.
///
/// These never abort a validation run; a failing condition is reported as a
/// violation of its rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Operator '{0}' cannot be used with multiple values")]
    UnsupportedAlternativesOperator(BinaryOperator),
}

/// A parsed condition together with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    expr: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        Ok(Self {
            source: source.to_string(),
            expr: parse_condition(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn evaluate(&self, row: &Row) -> Result<Value, ExpressionError> {
        evaluate(&self.expr, row)
    }

    /// Whether the condition holds for the row (truthiness of its value).
    pub fn is_satisfied(&self, row: &Row) -> Result<bool, ExpressionError> {
        Ok(self.evaluate(row)?.is_truthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::normalize_condition;

    #[test]
    fn test_escaped_capital_in_literal() {
        let expr = Expression::parse(&normalize_condition(r"Path == 'C:\New'")).unwrap();
        assert_eq!(expr.is_satisfied(&Row::new().with("Path", "C:New")), Ok(true));
        assert_eq!(expr.is_satisfied(&Row::new().with("Path", "c:\new")), Ok(false));
    }

    #[test]
    fn test_negative_number_alternatives() {
        let expr = Expression::parse("x==-1|2").unwrap();
        assert_eq!(expr.is_satisfied(&Row::new().with("x", -1.0)), Ok(true));
        assert_eq!(expr.is_satisfied(&Row::new().with("x", 2.0)), Ok(true));
        assert_eq!(expr.is_satisfied(&Row::new().with("x", 1.0)), Ok(false));

        let negated = Expression::parse("amount>-5").unwrap();
        assert_eq!(negated.is_satisfied(&Row::new().with("amount", 0.0)), Ok(true));
    }

    #[test]
    fn test_expression_round_trip() {
        let expr = Expression::parse("status==paid|pending").unwrap();
        assert_eq!(expr.source(), "status==paid|pending");

        let pending = Row::new().with("Status", "PENDING");
        let closed = Row::new().with("Status", "Closed");
        assert_eq!(expr.is_satisfied(&pending), Ok(true));
        assert_eq!(expr.is_satisfied(&closed), Ok(false));
    }

    #[test]
    fn test_error_messages() {
        let err = ExpressionError::UnsupportedAlternativesOperator(BinaryOperator::Lt);
        assert_eq!(err.to_string(), "Operator '<' cannot be used with multiple values");
        assert!(Expression::parse("status=").is_err());
    }
}

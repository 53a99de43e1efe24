//! Tree-walking evaluator for parsed conditions.

use crate::input::Row;

use super::ExpressionError;
use super::ast::{BinaryOperator, Expr, UnaryOperator};
use super::value::Value;

/// Evaluate an expression against one row.
///
/// Identifiers resolve to the row's field of the same normalized name;
/// fields the row lacks evaluate to `Null`.
pub fn evaluate(expr: &Expr, row: &Row) -> Result<Value, ExpressionError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Identifier(name) => Ok(row.get(name).map(Value::from).unwrap_or(Value::Null)),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, row)?;
            Ok(match op {
                UnaryOperator::Not => Value::Bool(!value.is_truthy()),
                UnaryOperator::Neg => Value::Number(-value.to_number()),
            })
        }
        Expr::Binary { op, left, right } => evaluate_binary(*op, left, right, row),
    }
}

fn evaluate_binary(
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    row: &Row,
) -> Result<Value, ExpressionError> {
    // Logical operators short-circuit.
    match op {
        BinaryOperator::And => {
            if !evaluate(left, row)?.is_truthy() {
                return Ok(Value::Bool(false));
            }
            return Ok(Value::Bool(evaluate(right, row)?.is_truthy()));
        }
        BinaryOperator::Or => {
            if evaluate(left, row)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(evaluate(right, row)?.is_truthy()));
        }
        _ => {}
    }

    let left = evaluate(left, row)?;
    let right = evaluate(right, row)?;

    if let Some(choices) = right.alternatives() {
        let needle = left.to_text();
        let found = choices.iter().any(|choice| *choice == needle.trim());
        return match op {
            BinaryOperator::Eq => Ok(Value::Bool(found)),
            BinaryOperator::NotEq => Ok(Value::Bool(!found)),
            other => Err(ExpressionError::UnsupportedAlternativesOperator(other)),
        };
    }

    let value = match op {
        BinaryOperator::Eq => Value::Bool(left.loose_eq(&right)),
        BinaryOperator::NotEq => Value::Bool(!left.loose_eq(&right)),
        BinaryOperator::StrictEq => Value::Bool(left.strict_eq(&right)),
        BinaryOperator::StrictNotEq => Value::Bool(!left.strict_eq(&right)),
        BinaryOperator::Lt => Value::Bool(left.compare(&right).is_some_and(|o| o.is_lt())),
        BinaryOperator::LtEq => Value::Bool(left.compare(&right).is_some_and(|o| o.is_le())),
        BinaryOperator::Gt => Value::Bool(left.compare(&right).is_some_and(|o| o.is_gt())),
        BinaryOperator::GtEq => Value::Bool(left.compare(&right).is_some_and(|o| o.is_ge())),
        BinaryOperator::Add => add(&left, &right),
        BinaryOperator::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOperator::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOperator::And | BinaryOperator::Or => {
            return Err(ExpressionError::UnsupportedOperator(op.to_string()));
        }
    };
    Ok(value)
}

/// `+` concatenates when either side is textual, otherwise adds.
fn add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Text(_) | Value::Date(_), _) | (_, Value::Text(_) | Value::Date(_)) => {
            Value::Text(format!("{}{}", left.to_text(), right.to_text()))
        }
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

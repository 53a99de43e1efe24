//! Condition text → [`Expr`], via the pest grammar in `grammar.pest`.

use once_cell::sync::Lazy;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::input::normalize_column_name;

use super::ExpressionError;
use super::ast::{BinaryOperator, Expr, UnaryOperator};
use super::value::Value;

#[derive(Parser)]
#[grammar = "expression/grammar.pest"]
struct ConditionParser;

static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::or, Assoc::Left))
        .op(Op::infix(Rule::and, Assoc::Left))
        .op(Op::infix(Rule::eq, Assoc::Left)
            | Op::infix(Rule::ne, Assoc::Left)
            | Op::infix(Rule::strict_eq, Assoc::Left)
            | Op::infix(Rule::strict_ne, Assoc::Left))
        .op(Op::infix(Rule::lt, Assoc::Left)
            | Op::infix(Rule::le, Assoc::Left)
            | Op::infix(Rule::gt, Assoc::Left)
            | Op::infix(Rule::ge, Assoc::Left))
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::rem, Assoc::Left))
        .op(Op::prefix(Rule::not) | Op::prefix(Rule::neg))
});

/// Parse one condition into an expression tree.
///
/// Identifiers are normalized to column keys and text literals are
/// lower-cased, matching how row values are compared.
pub fn parse_condition(input: &str) -> Result<Expr, ExpressionError> {
    let mut pairs = ConditionParser::parse(Rule::condition, input)
        .map_err(|e| ExpressionError::Syntax(e.to_string()))?;

    let expr = pairs
        .next()
        .and_then(|condition| condition.into_inner().next())
        .ok_or_else(|| ExpressionError::Syntax("empty condition".to_string()))?;

    build_expr(expr.into_inner())
}

fn build_expr(pairs: Pairs<Rule>) -> Result<Expr, ExpressionError> {
    PRATT
        .map_primary(build_primary)
        .map_prefix(|op, operand| {
            let op = match op.as_rule() {
                Rule::not => UnaryOperator::Not,
                Rule::neg => UnaryOperator::Neg,
                other => return Err(ExpressionError::UnsupportedOperator(format!("{:?}", other))),
            };
            Ok(Expr::unary(op, operand?))
        })
        .map_infix(|left, op, right| {
            let op = binary_operator(&op)?;
            Ok(Expr::binary(op, left?, right?))
        })
        .parse(pairs)
}

fn binary_operator(pair: &Pair<Rule>) -> Result<BinaryOperator, ExpressionError> {
    let op = match pair.as_rule() {
        Rule::or => BinaryOperator::Or,
        Rule::and => BinaryOperator::And,
        Rule::eq => BinaryOperator::Eq,
        Rule::ne => BinaryOperator::NotEq,
        Rule::strict_eq => BinaryOperator::StrictEq,
        Rule::strict_ne => BinaryOperator::StrictNotEq,
        Rule::lt => BinaryOperator::Lt,
        Rule::le => BinaryOperator::LtEq,
        Rule::gt => BinaryOperator::Gt,
        Rule::ge => BinaryOperator::GtEq,
        Rule::add => BinaryOperator::Add,
        Rule::sub => BinaryOperator::Sub,
        Rule::mul => BinaryOperator::Mul,
        Rule::div => BinaryOperator::Div,
        Rule::rem => BinaryOperator::Rem,
        _ => return Err(ExpressionError::UnsupportedOperator(pair.as_str().to_string())),
    };
    Ok(op)
}

fn build_primary(pair: Pair<Rule>) -> Result<Expr, ExpressionError> {
    match pair.as_rule() {
        Rule::expr => build_expr(pair.into_inner()),
        Rule::number => {
            let n = pair
                .as_str()
                .parse::<f64>()
                .map_err(|e| ExpressionError::Syntax(format!("invalid number: {}", e)))?;
            Ok(Expr::Literal(Value::Number(n)))
        }
        Rule::string => Ok(Expr::Literal(Value::text(&string_content(pair)))),
        Rule::boolean => Ok(Expr::Literal(Value::Bool(pair.as_str() == "true"))),
        Rule::null => Ok(Expr::Literal(Value::Null)),
        Rule::identifier => Ok(Expr::Identifier(normalize_column_name(pair.as_str()))),
        Rule::alternatives => {
            let choices: Vec<String> = pair
                .into_inner()
                .map(|choice| match choice.as_rule() {
                    Rule::string => string_content(choice),
                    _ => choice.as_str().to_string(),
                })
                .collect();
            Ok(Expr::Literal(Value::text(&choices.join("|"))))
        }
        other => Err(ExpressionError::Syntax(format!(
            "unexpected {:?} at '{}'",
            other,
            pair.as_str()
        ))),
    }
}

/// Unquoted, unescaped content of a string literal.
fn string_content(pair: Pair<Rule>) -> String {
    let raw = pair
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or_default();

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::Identifier(name.to_string())
    }

    fn text(s: &str) -> Expr {
        Expr::Literal(Value::text(s))
    }

    fn num(n: f64) -> Expr {
        Expr::Literal(Value::Number(n))
    }

    #[test]
    fn test_simple_comparison() {
        let expr = parse_condition("status=='paid'").unwrap();
        assert_eq!(expr, Expr::binary(BinaryOperator::Eq, ident("status"), text("paid")));
    }

    #[test]
    fn test_bare_alternatives() {
        let expr = parse_condition("status==Paid|Pending").unwrap();
        assert_eq!(
            expr,
            Expr::binary(BinaryOperator::Eq, ident("status"), text("paid|pending"))
        );
    }

    #[test]
    fn test_signed_alternatives() {
        let expr = parse_condition("x==-1|2").unwrap();
        assert_eq!(expr, Expr::binary(BinaryOperator::Eq, ident("x"), text("-1|2")));

        let expr = parse_condition("x>-1").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Gt,
                ident("x"),
                Expr::unary(UnaryOperator::Neg, num(1.0))
            )
        );
    }

    #[test]
    fn test_quoted_alternatives() {
        let expr = parse_condition("status != 'Not Paid' | 'void'").unwrap();
        assert_eq!(
            expr,
            Expr::binary(BinaryOperator::NotEq, ident("status"), text("not paid|void"))
        );
    }

    #[test]
    fn test_alternatives_stop_at_logical_or() {
        let expr = parse_condition("a==x|y||b==1").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::Or,
                Expr::binary(BinaryOperator::Eq, ident("a"), text("x|y")),
                Expr::binary(BinaryOperator::Eq, ident("b"), num(1.0)),
            )
        );
    }

    #[test]
    fn test_precedence() {
        let expr = parse_condition("a+b*2>10&&c<=d").unwrap();
        let sum = Expr::binary(
            BinaryOperator::Add,
            ident("a"),
            Expr::binary(BinaryOperator::Mul, ident("b"), num(2.0)),
        );
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::And,
                Expr::binary(BinaryOperator::Gt, sum, num(10.0)),
                Expr::binary(BinaryOperator::LtEq, ident("c"), ident("d")),
            )
        );
    }

    #[test]
    fn test_parentheses_and_prefix() {
        let expr = parse_condition("!(a===b) && -x < 0").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOperator::And,
                Expr::unary(
                    UnaryOperator::Not,
                    Expr::binary(BinaryOperator::StrictEq, ident("a"), ident("b"))
                ),
                Expr::binary(
                    BinaryOperator::Lt,
                    Expr::unary(UnaryOperator::Neg, ident("x")),
                    num(0.0)
                ),
            )
        );
    }

    #[test]
    fn test_keywords_and_escapes() {
        assert_eq!(
            parse_condition("flag==true").unwrap(),
            Expr::binary(BinaryOperator::Eq, ident("flag"), Expr::Literal(Value::Bool(true)))
        );
        assert_eq!(
            parse_condition("note!=undefined").unwrap(),
            Expr::binary(BinaryOperator::NotEq, ident("note"), Expr::Literal(Value::Null))
        );
        assert_eq!(
            parse_condition(r"name=='o\'brien'").unwrap(),
            Expr::binary(BinaryOperator::Eq, ident("name"), text("o'brien"))
        );
        // A keyword prefix does not swallow an identifier.
        assert_eq!(parse_condition("nullable").unwrap(), ident("nullable"));
    }

    #[test]
    fn test_syntax_errors() {
        for bad in ["", "status==", "status='paid'", "(a==b", "a==b)", "a===="] {
            assert!(
                matches!(parse_condition(bad), Err(ExpressionError::Syntax(_))),
                "expected syntax error for {:?}",
                bad
            );
        }
    }
}

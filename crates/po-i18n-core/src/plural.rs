use alloc::string::String;
use core::fmt;

use crate::plural_lexer::PluralError;
use crate::plural_parser::{BinaryOp, Expr, UnaryOp, parse_expression};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralExpression {
    source: String,
    root: Expr,
}

impl PluralExpression {
    // Surrounding whitespace and a trailing ';' are ignored.
    pub fn compile(input: &str) -> Result<Self, PluralError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
        let root = parse_expression(trimmed)?;
        Ok(Self {
            source: String::from(trimmed),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    pub fn eval(&self, n: u64) -> usize {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        eval_expr(&self.root, n)
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for PluralExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, &self.root)
    }
}

pub fn germanic_plural(n: u64) -> usize {
    if n == 1 { 0 } else { 1 }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PluralRule {
    #[default]
    Germanic,
    Expression(PluralExpression),
}

impl PluralRule {
    pub fn from_formula(formula: Option<&str>) -> (Self, Option<PluralError>) {
        let Some(formula) = formula else {
            return (PluralRule::Germanic, None);
        };
        match PluralExpression::compile(formula) {
            Ok(expr) => (PluralRule::Expression(expr), None),
            Err(err) => (PluralRule::Germanic, Some(err)),
        }
    }

    pub fn index(&self, n: u64) -> usize {
        match self {
            PluralRule::Germanic => germanic_plural(n),
            PluralRule::Expression(expr) => expr.eval(n),
        }
    }

    pub fn expression(&self) -> Option<&PluralExpression> {
        match self {
            PluralRule::Germanic => None,
            PluralRule::Expression(expr) => Some(expr),
        }
    }
}

fn eval_expr(expr: &Expr, n: i64) -> Option<i64> {
    match expr {
        Expr::Literal(value) => Some(*value),
        Expr::Var => Some(n),
        Expr::Unary { op, operand } => {
            let value = eval_expr(operand, n)?;
            match op {
                UnaryOp::Not => Some(truth(value == 0)),
                UnaryOp::Neg => value.checked_neg(),
            }
        }
        Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, n),
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            if eval_expr(cond, n)? != 0 {
                eval_expr(then, n)
            } else {
                eval_expr(otherwise, n)
            }
        }
    }
}

fn eval_binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, n: i64) -> Option<i64> {
    let left = eval_expr(lhs, n)?;
    // && and || short-circuit like C.
    match op {
        BinaryOp::And if left == 0 => return Some(0),
        BinaryOp::Or if left != 0 => return Some(1),
        _ => {}
    }
    let right = eval_expr(rhs, n)?;
    match op {
        BinaryOp::Mul => left.checked_mul(right),
        BinaryOp::Div => left.checked_div(right),
        BinaryOp::Rem => left.checked_rem(right),
        BinaryOp::Add => left.checked_add(right),
        BinaryOp::Sub => left.checked_sub(right),
        BinaryOp::Lt => Some(truth(left < right)),
        BinaryOp::Le => Some(truth(left <= right)),
        BinaryOp::Gt => Some(truth(left > right)),
        BinaryOp::Ge => Some(truth(left >= right)),
        BinaryOp::Eq => Some(truth(left == right)),
        BinaryOp::Ne => Some(truth(left != right)),
        BinaryOp::BitAnd => Some(left & right),
        BinaryOp::BitOr => Some(left | right),
        BinaryOp::And | BinaryOp::Or => Some(truth(right != 0)),
    }
}

fn truth(value: bool) -> i64 {
    i64::from(value)
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Literal(value) => write!(f, "{value}"),
        Expr::Var => f.write_str("n"),
        Expr::Unary { op, operand } => {
            f.write_str(match op {
                UnaryOp::Not => "!",
                UnaryOp::Neg => "-",
            })?;
            write_operand(f, operand)
        }
        Expr::Binary { op, lhs, rhs } => {
            write_operand(f, lhs)?;
            write!(f, " {} ", op.symbol())?;
            write_operand(f, rhs)
        }
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            write_operand(f, cond)?;
            f.write_str(" ? ")?;
            write_operand(f, then)?;
            f.write_str(" : ")?;
            write_expr(f, otherwise)
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Literal(_) | Expr::Var | Expr::Unary { .. } => write_expr(f, expr),
        _ => {
            f.write_str("(")?;
            write_expr(f, expr)?;
            f.write_str(")")
        }
    }
}

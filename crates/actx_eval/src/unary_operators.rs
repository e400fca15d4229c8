//! Built-in unary operator implementations.

use actx_ir::UnaryOp;
use actx_value::{fault, EvalResult, Value};

fn not_defined(op: UnaryOp, operand: &Value) -> EvalResult {
    Err(fault::invalid_operation(format!(
        "operator `{}` cannot be applied to {operand}",
        op.as_symbol()
    )))
}

macro_rules! integer_unary {
    ($name:ident, $t:ty, $wrap:path) => {
        fn $name(op: UnaryOp, a: $t) -> EvalResult {
            match op {
                UnaryOp::Negate => Ok($wrap(a.wrapping_neg())),
                UnaryOp::NegateChecked => a
                    .checked_neg()
                    .map($wrap)
                    .ok_or_else(|| fault::overflow("negation")),
                UnaryOp::UnaryPlus => Ok($wrap(a)),
                UnaryOp::Not | UnaryOp::OnesComplement => Ok($wrap(!a)),
                UnaryOp::Increment => Ok($wrap(a.wrapping_add(1))),
                UnaryOp::Decrement => Ok($wrap(a.wrapping_sub(1))),
            }
        }
    };
}

integer_unary!(eval_int_unary, i32, Value::Int);
integer_unary!(eval_long_unary, i64, Value::Long);

/// Evaluate a built-in unary operator on a non-lifted operand.
pub(crate) fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match (op, operand) {
        (_, Value::Int(a)) => eval_int_unary(op, *a),
        (_, Value::Long(a)) => eval_long_unary(op, *a),
        (UnaryOp::Negate | UnaryOp::NegateChecked, Value::Double(a)) => Ok(Value::Double(-a)),
        (UnaryOp::UnaryPlus, Value::Double(a)) => Ok(Value::Double(*a)),
        (UnaryOp::Increment, Value::Double(a)) => Ok(Value::Double(a + 1.0)),
        (UnaryOp::Decrement, Value::Double(a)) => Ok(Value::Double(a - 1.0)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => not_defined(op, operand),
    }
}

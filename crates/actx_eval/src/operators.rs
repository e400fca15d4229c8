//! Built-in binary operator implementations.
//!
//! Dispatch is on the runtime operand pair; the static resolution in
//! [`crate::resolve`] guarantees the pair matches the operator, so the
//! fallthrough arm only fires when a user callable returned a value of the
//! wrong type.
//!
//! Unchecked integer arithmetic wraps. Checked arithmetic reports
//! [`FaultKind::Overflow`](actx_value::FaultKind::Overflow); integer division
//! and remainder always check for zero.

use actx_ir::BinaryOp;
use actx_value::{fault, EvalResult, Value};

/// Wrap a checked arithmetic result, reporting overflow.
#[inline]
fn checked_arith<T>(result: Option<T>, wrap: fn(T) -> Value, op_name: &str) -> EvalResult {
    result.map(wrap).ok_or_else(|| fault::overflow(op_name))
}

/// Division-like operation: zero divisor first, then overflow.
#[inline]
fn checked_div<T>(
    is_zero: bool,
    op: impl FnOnce() -> Option<T>,
    wrap: fn(T) -> Value,
    op_name: &str,
) -> EvalResult {
    if is_zero {
        return Err(fault::divide_by_zero());
    }
    checked_arith(op(), wrap, op_name)
}

fn not_defined(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    Err(fault::invalid_operation(format!(
        "operator `{}` cannot be applied to {left} and {right}",
        op.as_symbol()
    )))
}

/// Evaluate a built-in binary operator on non-lifted operands.
pub(crate) fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    if op.is_shift() {
        return eval_shift(op, left, right);
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(op, *a, *b),
        (Value::Long(a), Value::Long(b)) => eval_long_binary(op, *a, *b),
        (Value::Double(a), Value::Double(b)) => eval_double_binary(op, *a, *b),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(op, *a, *b),
        (Value::Char(a), Value::Char(b)) => compare(op, a, b),
        (Value::Byte(a), Value::Byte(b)) => compare(op, a, b),
        (Value::Str(_) | Value::Null, Value::Str(_) | Value::Null) if op == BinaryOp::Add => {
            Ok(concat(left, right))
        }
        _ if op.is_equality() => Ok(Value::Bool((left == right) == (op == BinaryOp::Equal))),
        _ => not_defined(op, left, right),
    }
}

/// Comparison operators shared by every ordered primitive.
fn compare<T: PartialOrd>(op: BinaryOp, a: &T, b: &T) -> EvalResult {
    let result = match op {
        BinaryOp::Equal => a == b,
        BinaryOp::NotEqual => a != b,
        BinaryOp::LessThan => a < b,
        BinaryOp::LessThanOrEqual => a <= b,
        BinaryOp::GreaterThan => a > b,
        BinaryOp::GreaterThanOrEqual => a >= b,
        _ => {
            return Err(fault::invalid_operation(format!(
                "operator `{}` is not a comparison",
                op.as_symbol()
            )))
        }
    };
    Ok(Value::Bool(result))
}

macro_rules! integer_binary {
    ($name:ident, $t:ty, $wrap:path) => {
        fn $name(op: BinaryOp, a: $t, b: $t) -> EvalResult {
            match op {
                BinaryOp::Add => Ok($wrap(a.wrapping_add(b))),
                BinaryOp::Subtract => Ok($wrap(a.wrapping_sub(b))),
                BinaryOp::Multiply => Ok($wrap(a.wrapping_mul(b))),
                BinaryOp::AddChecked => checked_arith(a.checked_add(b), $wrap, "addition"),
                BinaryOp::SubtractChecked => {
                    checked_arith(a.checked_sub(b), $wrap, "subtraction")
                }
                BinaryOp::MultiplyChecked => {
                    checked_arith(a.checked_mul(b), $wrap, "multiplication")
                }
                BinaryOp::Divide => checked_div(b == 0, || a.checked_div(b), $wrap, "division"),
                BinaryOp::Modulo => {
                    checked_div(b == 0, || a.checked_rem(b), $wrap, "remainder")
                }
                BinaryOp::And => Ok($wrap(a & b)),
                BinaryOp::Or => Ok($wrap(a | b)),
                BinaryOp::ExclusiveOr => Ok($wrap(a ^ b)),
                _ => compare(op, &a, &b),
            }
        }
    };
}

integer_binary!(eval_int_binary, i32, Value::Int);
integer_binary!(eval_long_binary, i64, Value::Long);

fn eval_double_binary(op: BinaryOp, a: f64, b: f64) -> EvalResult {
    match op {
        BinaryOp::Add | BinaryOp::AddChecked => Ok(Value::Double(a + b)),
        BinaryOp::Subtract | BinaryOp::SubtractChecked => Ok(Value::Double(a - b)),
        BinaryOp::Multiply | BinaryOp::MultiplyChecked => Ok(Value::Double(a * b)),
        BinaryOp::Divide => Ok(Value::Double(a / b)),
        BinaryOp::Modulo => Ok(Value::Double(a % b)),
        BinaryOp::Power => Ok(Value::Double(a.powf(b))),
        BinaryOp::And | BinaryOp::Or | BinaryOp::ExclusiveOr => {
            not_defined(op, &Value::Double(a), &Value::Double(b))
        }
        _ => compare(op, &a, &b),
    }
}

fn eval_bool_binary(op: BinaryOp, a: bool, b: bool) -> EvalResult {
    match op {
        BinaryOp::And => Ok(Value::Bool(a & b)),
        BinaryOp::Or => Ok(Value::Bool(a | b)),
        BinaryOp::ExclusiveOr => Ok(Value::Bool(a ^ b)),
        BinaryOp::Equal => Ok(Value::Bool(a == b)),
        BinaryOp::NotEqual => Ok(Value::Bool(a != b)),
        _ => not_defined(op, &Value::Bool(a), &Value::Bool(b)),
    }
}

/// Shifts take an `int` count; only the low bits of the count are used.
#[expect(
    clippy::cast_sign_loss,
    reason = "shift counts are masked like the host does"
)]
fn eval_shift(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let Value::Int(count) = right else {
        return not_defined(op, left, right);
    };
    let count = *count as u32;
    match (op, left) {
        (BinaryOp::LeftShift, Value::Int(a)) => Ok(Value::Int(a.wrapping_shl(count))),
        (BinaryOp::RightShift, Value::Int(a)) => Ok(Value::Int(a.wrapping_shr(count))),
        (BinaryOp::LeftShift, Value::Long(a)) => Ok(Value::Long(a.wrapping_shl(count))),
        (BinaryOp::RightShift, Value::Long(a)) => Ok(Value::Long(a.wrapping_shr(count))),
        _ => not_defined(op, left, right),
    }
}

/// String concatenation; `null` concatenates as the empty string.
fn concat(left: &Value, right: &Value) -> Value {
    let left = left.as_str().unwrap_or_default();
    let right = right.as_str().unwrap_or_default();
    let mut text = String::with_capacity(left.len() + right.len());
    text.push_str(left);
    text.push_str(right);
    Value::string(text)
}

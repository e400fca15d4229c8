//! Textual rendering of expression shapes.
//!
//! [`write_shape`] writes the punctuation of a single node and delegates each
//! operand to a callback, so the same layout serves the plain rendering
//! below and the annotated rendering of active trees. Constants render as
//! `{C}` and parameters by name.

use std::fmt;

use actx_stack::ensure_sufficient_stack;

use crate::{Callee, Expr, ExprKind, UnaryOp};

/// Callback writing operand `slot` (see [`Expr::operands`]).
pub type WriteOperand<'a> = dyn FnMut(&mut fmt::Formatter<'_>, usize, &Expr) -> fmt::Result + 'a;

fn write_list(
    f: &mut fmt::Formatter<'_>,
    args: &[Expr],
    first_slot: usize,
    operand: &mut WriteOperand<'_>,
) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        operand(f, first_slot + i, arg)?;
    }
    Ok(())
}

/// Write `expr`'s own syntax, rendering operands through `operand`.
pub fn write_shape(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr,
    operand: &mut WriteOperand<'_>,
) -> fmt::Result {
    match expr.kind() {
        ExprKind::Constant { .. } => f.write_str("{C}"),
        ExprKind::Parameter(param) => write!(f, "{}", param.name()),
        ExprKind::Member {
            target: Some(target),
            property,
        } => {
            operand(f, 0, target)?;
            write!(f, ".{}", property.name())
        }
        ExprKind::Member {
            target: None,
            property,
        } => write!(f, "{}.{}", property.declaring(), property.name()),
        ExprKind::Binary {
            op, left, right, ..
        } => {
            let open = if op.is_checked() { "checked(" } else { "(" };
            f.write_str(open)?;
            operand(f, 0, left)?;
            write!(f, " {} ", op.as_symbol())?;
            operand(f, 1, right)?;
            f.write_str(")")
        }
        ExprKind::Unary { op, operand: x, .. } => {
            let open = match op {
                UnaryOp::NegateChecked => "checked(",
                _ => "(",
            };
            write!(f, "{open}{}", op.as_symbol())?;
            operand(f, 0, x)?;
            f.write_str(")")
        }
        ExprKind::Convert {
            operand: x,
            to,
            checked,
            ..
        } => {
            if *checked {
                write!(f, "checked(({to}) ")?;
            } else {
                write!(f, "(({to}) ")?;
            }
            operand(f, 0, x)?;
            f.write_str(")")
        }
        ExprKind::Logical { op, left, right } => {
            f.write_str("(")?;
            operand(f, 0, left)?;
            write!(f, " {} ", op.as_symbol())?;
            operand(f, 1, right)?;
            f.write_str(")")
        }
        ExprKind::Conditional {
            test,
            if_true,
            if_false,
        } => {
            f.write_str("(")?;
            operand(f, 0, test)?;
            f.write_str(" ? ")?;
            operand(f, 1, if_true)?;
            f.write_str(" : ")?;
            operand(f, 2, if_false)?;
            f.write_str(")")
        }
        ExprKind::Coalesce { left, right, .. } => {
            f.write_str("(")?;
            operand(f, 0, left)?;
            f.write_str(" ?? ")?;
            operand(f, 1, right)?;
            f.write_str(")")
        }
        ExprKind::Index { target, args, .. } => {
            operand(f, 0, target)?;
            f.write_str("[")?;
            write_list(f, args, 1, operand)?;
            f.write_str("]")
        }
        ExprKind::Call {
            target,
            method,
            args,
        } => {
            let first_arg = match (target, method) {
                (Some(target), _) => {
                    operand(f, 0, target)?;
                    1
                }
                (None, Callee::Static(function)) => {
                    write!(f, "{}", function.declaring())?;
                    0
                }
                (None, Callee::Instance(method)) => {
                    write!(f, "{}", method.declaring())?;
                    0
                }
            };
            write!(f, ".{}(", method.name())?;
            write_list(f, args, first_arg, operand)?;
            f.write_str(")")
        }
        ExprKind::New { constructor, args } => {
            write!(f, "new {}(", constructor.declaring())?;
            write_list(f, args, 0, operand)?;
            f.write_str(")")
        }
        ExprKind::TypeIs { operand: x, ty } => {
            f.write_str("(")?;
            operand(f, 0, x)?;
            write!(f, " is {ty})")
        }
        ExprKind::TypeAs { operand: x, ty } => {
            f.write_str("(")?;
            operand(f, 0, x)?;
            write!(f, " as {ty})")
        }
        ExprKind::Block(statements) => {
            f.write_str("{ ")?;
            for (i, statement) in statements.iter().enumerate() {
                operand(f, i, statement)?;
                f.write_str("; ")?;
            }
            f.write_str("}")
        }
        ExprKind::Assign { target, value } => {
            f.write_str("(")?;
            operand(f, 0, target)?;
            f.write_str(" = ")?;
            operand(f, 1, value)?;
            f.write_str(")")
        }
        ExprKind::Lambda(lambda) => {
            f.write_str("(")?;
            for (i, param) in lambda.params().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", param.name())?;
            }
            f.write_str(") => ")?;
            operand(f, 0, lambda.body())
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| write_shape(f, self, &mut |f, _, operand| write!(f, "{operand}")))
    }
}

//! Binding lambda parameters to argument values.

use actx_stack::ensure_sufficient_stack;
use actx_value::Value;

use crate::{Expr, ExprKind, Param};

/// Replace every occurrence of `params[i]` in `expr` with a constant holding
/// `args[i]`, typed as the parameter.
///
/// Subtrees that mention none of the parameters are shared, not copied.
/// Parameters beyond the end of `args` are left in place.
pub fn substitute(expr: &Expr, params: &[Param], args: &[Value]) -> Expr {
    replace(expr, params, args).unwrap_or_else(|| expr.clone())
}

/// `None` when nothing below `expr` changed.
fn replace(expr: &Expr, params: &[Param], args: &[Value]) -> Option<Expr> {
    ensure_sufficient_stack(|| {
        if let ExprKind::Parameter(param) = expr.kind() {
            let position = params.iter().position(|p| p == param)?;
            let value = args.get(position)?;
            return Some(Expr::constant_of(value.clone(), param.ty()));
        }
        let operands = expr.operands();
        let replaced: Vec<Option<Expr>> = operands
            .iter()
            .map(|operand| replace(operand, params, args))
            .collect();
        if replaced.iter().all(Option::is_none) {
            return None;
        }
        let rebuilt = operands
            .into_iter()
            .zip(replaced)
            .map(|(original, replaced)| replaced.unwrap_or(original))
            .collect();
        Some(expr.with_operands(rebuilt))
    })
}

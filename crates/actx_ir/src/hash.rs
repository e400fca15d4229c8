//! Structural hashing of expression trees.
//!
//! Two structurally equal trees (see [`crate::equality`]) produce the same
//! hash, including alpha-renamed lambdas. The walk is depth-first; for each
//! node it hashes:
//! 1. `discriminant(kind)`, identifying the shape
//! 2. operator, member identity and type fields
//! 3. for constants, the value (or a sentinel for `null`)
//! 4. children, in slot order
//!
//! `FxHasher` mixes order-sensitively, so swapping operands or moving a
//! subtree changes the result. Parameters bound by an enclosing lambda are
//! hashed by position, never by name or declaration.

use std::hash::{Hash, Hasher};
use std::mem;

use actx_stack::ensure_sufficient_stack;
use actx_value::Value;
use rustc_hash::FxHasher;

use crate::{Expr, ExprKind, Lambda, Param};

/// Sentinel for an absent optional child or a `null` constant.
const ABSENT: u32 = u32::MAX;

/// Hash an expression tree.
pub fn structural_hash(expr: &Expr) -> u64 {
    let mut hasher = FxHasher::default();
    hash_node(expr, &mut Vec::new(), &mut hasher);
    hasher.finish()
}

impl Lambda {
    /// Hash of the lambda with its parameters bound positionally.
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        let mut scope = Vec::new();
        hash_lambda(self, &mut scope, &mut hasher);
        hasher.finish()
    }
}

fn hash_lambda(lambda: &Lambda, scope: &mut Vec<u32>, state: &mut FxHasher) {
    lambda.params().len().hash(state);
    for param in lambda.params() {
        param.ty().hash(state);
    }
    let depth = scope.len();
    scope.extend(lambda.params().iter().map(Param::id));
    hash_node(lambda.body(), scope, state);
    scope.truncate(depth);
}

fn hash_opt(expr: Option<&Expr>, scope: &mut Vec<u32>, state: &mut FxHasher) {
    match expr {
        Some(expr) => hash_node(expr, scope, state),
        None => ABSENT.hash(state),
    }
}

fn hash_all(exprs: &[Expr], scope: &mut Vec<u32>, state: &mut FxHasher) {
    exprs.len().hash(state);
    for expr in exprs {
        hash_node(expr, scope, state);
    }
}

fn hash_node(expr: &Expr, scope: &mut Vec<u32>, state: &mut FxHasher) {
    ensure_sufficient_stack(|| {
        let kind = expr.kind();
        mem::discriminant(kind).hash(state);
        match kind {
            ExprKind::Constant { value, ty } => {
                ty.hash(state);
                match value {
                    Value::Null => ABSENT.hash(state),
                    // Signed zeros are distinct constants.
                    Value::Double(d) if *d == 0.0 => d.is_sign_negative().hash(state),
                    value => value.hash(state),
                }
            }
            ExprKind::Parameter(param) => {
                param.ty().hash(state);
                // Innermost binding wins; unbound parameters hash by declaration.
                match scope.iter().rposition(|id| *id == param.id()) {
                    Some(position) => {
                        0u8.hash(state);
                        position.hash(state);
                    }
                    None => {
                        1u8.hash(state);
                        param.id().hash(state);
                    }
                }
            }
            ExprKind::Member { target, property } => {
                property.hash(state);
                hash_opt(target.as_ref(), scope, state);
            }
            ExprKind::Binary {
                op,
                left,
                right,
                method,
            } => {
                op.hash(state);
                method.hash(state);
                hash_node(left, scope, state);
                hash_node(right, scope, state);
            }
            ExprKind::Unary {
                op,
                operand,
                method,
            } => {
                op.hash(state);
                method.hash(state);
                hash_node(operand, scope, state);
            }
            ExprKind::Convert {
                operand,
                to,
                checked,
                method,
            } => {
                to.hash(state);
                checked.hash(state);
                method.hash(state);
                hash_node(operand, scope, state);
            }
            ExprKind::Logical { op, left, right } => {
                op.hash(state);
                hash_node(left, scope, state);
                hash_node(right, scope, state);
            }
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                hash_node(test, scope, state);
                hash_node(if_true, scope, state);
                hash_node(if_false, scope, state);
            }
            ExprKind::Coalesce {
                left,
                right,
                conversion,
            } => {
                conversion.hash(state);
                hash_node(left, scope, state);
                hash_node(right, scope, state);
            }
            ExprKind::Index {
                target,
                indexer,
                args,
            } => {
                indexer.hash(state);
                hash_node(target, scope, state);
                hash_all(args, scope, state);
            }
            ExprKind::Call {
                target,
                method,
                args,
            } => {
                method.hash(state);
                hash_opt(target.as_ref(), scope, state);
                hash_all(args, scope, state);
            }
            ExprKind::New { constructor, args } => {
                constructor.hash(state);
                hash_all(args, scope, state);
            }
            ExprKind::TypeIs { operand, ty } | ExprKind::TypeAs { operand, ty } => {
                ty.hash(state);
                hash_node(operand, scope, state);
            }
            ExprKind::Block(statements) => hash_all(statements, scope, state),
            ExprKind::Assign { target, value } => {
                hash_node(target, scope, state);
                hash_node(value, scope, state);
            }
            ExprKind::Lambda(lambda) => hash_lambda(lambda, scope, state),
        }
    });
}

#[cfg(test)]
mod tests;

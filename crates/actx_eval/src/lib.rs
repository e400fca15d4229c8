//! Incremental evaluation of active expressions.
//!
//! An [`ActiveExpression`] turns an expression tree into a graph of shared
//! nodes that re-evaluate only what a change affects:
//!
//! - `registry`: one node per structurally distinct (expression, options)
//!   pair, reference counted across all users
//! - `node`: per-shape evaluation, lazy short-circuit branches, property and
//!   collection watches, ownership and disposal of produced values
//! - `resolve`: operator and conversion resolution with nullable lifting,
//!   cached per signature
//! - [`ActiveExpressionOptions`]: which produced values are disposed
//!
//! Evaluation failures are captured as [`Fault`](actx_value::Fault)s and
//! propagate to dependents like values. Construction failures are
//! [`ActiveExprError`]s.

mod conversions;
mod dispose;
mod error;
mod facade;
mod guard;
mod node;
mod observe;
mod operators;
mod options;
mod registry;
mod render;
mod resolve;
mod typeck;
mod unary_operators;

pub use error::{ActiveExprError, OptionsError, ResolveError};
pub use facade::ActiveExpression;
pub use options::ActiveExpressionOptions;

#[cfg(test)]
mod tests;

//! Expression trees for active expressions.
//!
//! - [`Expr`] / [`ExprKind`]: immutable, shareable expression trees with one
//!   builder per shape
//! - [`Lambda`] / [`Param`]: parameterized bodies; [`substitute`] binds
//!   arguments as constants
//! - [`structural_hash`] / [`structurally_equal`]: agreeing structural hash
//!   and equality, also behind `Hash`/`Eq` for [`Expr`]
//! - [`ExprHead`]: the member identity at the root of a value-producing shape
//! - [`write_shape`]: shared layout for plain and annotated renderings

mod build;
pub mod equality;
mod expr;
pub mod hash;
mod head;
mod ops;
mod render;
mod substitute;

pub use equality::structurally_equal;
pub use expr::{Callee, Expr, ExprKind, Lambda, Param};
pub use hash::structural_hash;
pub use head::ExprHead;
pub use ops::{BinaryOp, LogicalOp, UnaryOp};
pub use render::{write_shape, WriteOperand};
pub use substitute::substitute;

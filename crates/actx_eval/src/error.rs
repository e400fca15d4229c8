//! Construction-time errors.
//!
//! These surface from `ActiveExpression::create` and from options mutators.
//! Evaluation never produces them; evaluation failures are
//! [`Fault`](actx_value::Fault)s.

use actx_ir::{BinaryOp, UnaryOp};
use actx_value::{Name, Type};

/// An operator or conversion has no implementation for the operand types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("binary operator `{}` is not defined for `{left}` and `{right}`", .op.as_symbol())]
    Binary {
        op: BinaryOp,
        left: Type,
        right: Type,
    },

    #[error("unary operator `{}` is not defined for `{operand}`", .op.as_symbol())]
    Unary { op: UnaryOp, operand: Type },

    #[error("no conversion from `{from}` to `{to}`")]
    Conversion { from: Type, to: Type },

    #[error("operator method `{method}` cannot be applied to ({operands})")]
    MethodOperands { method: Name, operands: String },
}

/// Why an active expression could not be created.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActiveExprError {
    /// The shape exists in expression trees but cannot be made active.
    #[error("{shape} expressions are not supported by active expressions")]
    NotSupported { shape: &'static str },

    #[error("parameter `{name}` is not bound to an argument")]
    UnboundParameter { name: Name },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("type mismatch in {context}: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        context: &'static str,
        expected: Type,
        found: Type,
    },

    #[error("constant does not fit its declared type `{ty}`")]
    ConstantType { ty: Type },

    #[error("`{member}` expects {expected} argument(s), got {found}")]
    ArgumentCount {
        member: Name,
        expected: usize,
        found: usize,
    },

    #[error("argument for parameter `{name}` does not fit type `{ty}`")]
    ArgumentType { name: Name, ty: Type },

    #[error("instance member `{member}` needs a target")]
    MissingTarget { member: Name },

    #[error("static member `{member}` cannot be accessed through an instance")]
    UnexpectedTarget { member: Name },
}

/// Why an options mutation or query was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    /// The options were already used to create an active expression.
    #[error("options cannot be changed after they have been used to create an active expression")]
    Frozen,

    /// Only member, index, call and constructor shapes produce disposable values.
    #[error("{shape} expressions do not produce disposable values")]
    NotSupported { shape: &'static str },
}

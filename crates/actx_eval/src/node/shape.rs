//! Per-shape data resolved once when a node is built.

use std::sync::Arc;

use actx_ir::{Callee, Expr, ExprKind, LogicalOp};
use actx_value::{Constructor, Indexer, Name, Property, Type, Value};

use crate::error::ActiveExprError;
use crate::resolve::{resolve_binary, resolve_conversion, resolve_unary, Operation};
use crate::typeck::{coalesce_type, Typing};

pub(super) enum Shape {
    Constant(Value),
    Member(Property),
    /// Binary and unary operators and conversions: all operands feed one
    /// resolved operation.
    Operation(Arc<Operation>),
    Logical(LogicalOp),
    Conditional,
    /// Conversion applied to a non-null left value.
    Coalesce(Option<Arc<Operation>>),
    Index {
        indexer: Indexer,
        change_name: Name,
    },
    Call(Callee),
    New(Constructor),
    TypeIs(Type),
    TypeAs(Type),
}

impl Shape {
    pub(super) fn build(expr: &Expr, typing: &Typing) -> Result<Shape, ActiveExprError> {
        let shape = match expr.kind() {
            ExprKind::Constant { value, .. } => Shape::Constant(value.clone()),
            ExprKind::Member { property, .. } => Shape::Member(property.clone()),
            ExprKind::Binary {
                op,
                left,
                right,
                method,
            } => Shape::Operation(resolve_binary(
                *op,
                typing.type_of(left)?,
                typing.type_of(right)?,
                method.as_ref(),
            )?),
            ExprKind::Unary {
                op,
                operand,
                method,
            } => Shape::Operation(resolve_unary(*op, typing.type_of(operand)?, method.as_ref())?),
            ExprKind::Convert {
                operand,
                to,
                checked,
                method,
            } => Shape::Operation(resolve_conversion(
                typing.type_of(operand)?,
                *to,
                *checked,
                method.as_ref(),
            )?),
            ExprKind::Logical { op, .. } => Shape::Logical(*op),
            ExprKind::Conditional { .. } => Shape::Conditional,
            ExprKind::Coalesce {
                left,
                right,
                conversion,
            } => {
                let left = typing.type_of(left)?;
                let result = coalesce_type(left, typing.type_of(right)?)?;
                let conversion = conversion
                    .as_ref()
                    .map(|function| resolve_conversion(left, result, false, Some(function)))
                    .transpose()?;
                Shape::Coalesce(conversion)
            }
            ExprKind::Index { indexer, .. } => Shape::Index {
                indexer: indexer.clone(),
                change_name: indexer.change_name(),
            },
            ExprKind::Call { method, .. } => Shape::Call(method.clone()),
            ExprKind::New { constructor, .. } => Shape::New(constructor.clone()),
            ExprKind::TypeIs { ty, .. } => Shape::TypeIs(*ty),
            ExprKind::TypeAs { ty, .. } => Shape::TypeAs(*ty),
            ExprKind::Parameter(param) => {
                return Err(ActiveExprError::UnboundParameter { name: param.name() })
            }
            kind @ (ExprKind::Block(_) | ExprKind::Assign { .. } | ExprKind::Lambda(_)) => {
                return Err(ActiveExprError::NotSupported {
                    shape: kind.shape_name(),
                })
            }
        };
        Ok(shape)
    }

    /// Whether the operand in `slot` is only activated when selected.
    pub(super) fn is_lazy(&self, slot: usize) -> bool {
        slot > 0 && matches!(self, Shape::Logical(_) | Shape::Conditional | Shape::Coalesce(_))
    }
}

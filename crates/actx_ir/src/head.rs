//! The member at the root of a value-producing expression.

use actx_value::{Constructor, Function, Indexer, Method, Property};

use crate::{Callee, Expr, ExprKind};

/// Member identity of a shape whose result may need disposal.
///
/// Member reads, index reads, method calls, constructor calls, and operators
/// or conversions implemented by a user-defined [`Function`] have a head;
/// every other shape has none.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprHead {
    Property(Property),
    Indexer(Indexer),
    Method(Method),
    Function(Function),
    Constructor(Constructor),
}

impl Expr {
    pub fn head(&self) -> Option<ExprHead> {
        match self.kind() {
            ExprKind::Member { property, .. } => Some(ExprHead::Property(property.clone())),
            ExprKind::Index { indexer, .. } => Some(ExprHead::Indexer(indexer.clone())),
            ExprKind::Call {
                method: Callee::Instance(method),
                ..
            } => Some(ExprHead::Method(method.clone())),
            ExprKind::Call {
                method: Callee::Static(function),
                ..
            } => Some(ExprHead::Function(function.clone())),
            ExprKind::New { constructor, .. } => Some(ExprHead::Constructor(constructor.clone())),
            ExprKind::Binary {
                method: Some(function),
                ..
            }
            | ExprKind::Unary {
                method: Some(function),
                ..
            }
            | ExprKind::Convert {
                method: Some(function),
                ..
            } => Some(ExprHead::Function(function.clone())),
            _ => None,
        }
    }
}

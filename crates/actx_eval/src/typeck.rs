//! Static typing of expression trees.
//!
//! Runs once over the whole tree at creation (including branches that may
//! never be activated), so unsupported shapes and unresolvable operators are
//! rejected before any node exists. The resulting [`Typing`] is handed to
//! the nodes built from the tree.

use std::sync::Arc;

use actx_ir::{Callee, Expr, ExprKind};
use actx_stack::ensure_sufficient_stack;
use actx_value::{Name, Type};
use rustc_hash::FxHashMap;

use crate::error::ActiveExprError;
use crate::resolve::{resolve_binary, resolve_conversion, resolve_unary};

type CheckResult = Result<Type, ActiveExprError>;

fn expect_type(context: &'static str, expected: Type, found: Type) -> Result<(), ActiveExprError> {
    if expected.is_assignable_from(found) {
        Ok(())
    } else {
        Err(ActiveExprError::TypeMismatch {
            context,
            expected,
            found,
        })
    }
}

/// Static types of a checked tree, one entry per distinct subexpression.
///
/// Nodes built from the tree read their own and their operands' types here
/// instead of checking their subtree again. The root is held so the recorded
/// subexpressions stay alive.
pub(crate) struct Typing {
    _root: Expr,
    types: FxHashMap<usize, Type>,
}

impl Typing {
    /// Type of `expr`, checking it only when it is not part of the tree.
    pub(crate) fn type_of(&self, expr: &Expr) -> CheckResult {
        match self.types.get(&expr.addr()) {
            Some(ty) => Ok(*ty),
            None => check(expr),
        }
    }
}

/// Check the whole tree, recording the type of every subexpression.
pub(crate) fn check_tree(expr: &Expr) -> Result<Arc<Typing>, ActiveExprError> {
    let mut checker = Checker::default();
    checker.check(expr)?;
    Ok(Arc::new(Typing {
        _root: expr.clone(),
        types: checker.types,
    }))
}

/// Type of the value `expr` produces.
pub(crate) fn check(expr: &Expr) -> CheckResult {
    Checker::default().check(expr)
}

/// Memoizes by subexpression, so shared subtrees are checked once.
#[derive(Default)]
struct Checker {
    types: FxHashMap<usize, Type>,
}

impl Checker {
    fn check(&mut self, expr: &Expr) -> CheckResult {
        if let Some(ty) = self.types.get(&expr.addr()) {
            return Ok(*ty);
        }
        let ty = ensure_sufficient_stack(|| self.check_kind(expr))?;
        self.types.insert(expr.addr(), ty);
        Ok(ty)
    }

    fn check_args(
        &mut self,
        member: Name,
        params: &[Type],
        args: &[Expr],
    ) -> Result<(), ActiveExprError> {
        if params.len() != args.len() {
            return Err(ActiveExprError::ArgumentCount {
                member,
                expected: params.len(),
                found: args.len(),
            });
        }
        for (param, arg) in params.iter().zip(args) {
            expect_type("argument", *param, self.check(arg)?)?;
        }
        Ok(())
    }

    fn check_target(
        &mut self,
        member: Name,
        declaring: Type,
        is_static: bool,
        target: Option<&Expr>,
    ) -> Result<(), ActiveExprError> {
        match (target, is_static) {
            (Some(_), true) => Err(ActiveExprError::UnexpectedTarget { member }),
            (None, false) => Err(ActiveExprError::MissingTarget { member }),
            (Some(target), false) => expect_type("member target", declaring, self.check(target)?),
            (None, true) => Ok(()),
        }
    }

    fn check_kind(&mut self, expr: &Expr) -> CheckResult {
        match expr.kind() {
            ExprKind::Constant { value, ty } => {
                if value.fits(*ty) {
                    Ok(*ty)
                } else {
                    Err(ActiveExprError::ConstantType { ty: *ty })
                }
            }
            ExprKind::Parameter(param) => {
                Err(ActiveExprError::UnboundParameter { name: param.name() })
            }
            ExprKind::Member { target, property } => {
                self.check_target(
                    property.name(),
                    property.declaring(),
                    property.is_static(),
                    target.as_ref(),
                )?;
                Ok(property.ty())
            }
            ExprKind::Binary {
                op,
                left,
                right,
                method,
            } => {
                let (left, right) = (self.check(left)?, self.check(right)?);
                let operation = resolve_binary(*op, left, right, method.as_ref())?;
                Ok(operation.result_type())
            }
            ExprKind::Unary {
                op,
                operand,
                method,
            } => {
                let operation = resolve_unary(*op, self.check(operand)?, method.as_ref())?;
                Ok(operation.result_type())
            }
            ExprKind::Convert {
                operand,
                to,
                checked,
                method,
            } => {
                let from = self.check(operand)?;
                let operation = resolve_conversion(from, *to, *checked, method.as_ref())?;
                Ok(operation.result_type())
            }
            ExprKind::Logical { left, right, .. } => {
                expect_type("logical operand", Type::BOOL, self.check(left)?)?;
                expect_type("logical operand", Type::BOOL, self.check(right)?)?;
                Ok(Type::BOOL)
            }
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                expect_type("condition", Type::BOOL, self.check(test)?)?;
                let (a, b) = (self.check(if_true)?, self.check(if_false)?);
                if a.is_assignable_from(b) {
                    Ok(a)
                } else if b.is_assignable_from(a) {
                    Ok(b)
                } else {
                    Err(ActiveExprError::TypeMismatch {
                        context: "conditional branches",
                        expected: a,
                        found: b,
                    })
                }
            }
            ExprKind::Coalesce {
                left,
                right,
                conversion,
            } => {
                let (left, right) = (self.check(left)?, self.check(right)?);
                check_coalesce(left, right, conversion.as_ref())
            }
            ExprKind::Index {
                target,
                indexer,
                args,
            } => {
                self.check_target(indexer.name(), indexer.declaring(), false, Some(target))?;
                self.check_args(indexer.name(), indexer.params(), args)?;
                Ok(indexer.returns())
            }
            ExprKind::Call {
                target,
                method,
                args,
            } => {
                let is_static = matches!(method, Callee::Static(_));
                self.check_target(method.name(), method.declaring(), is_static, target.as_ref())?;
                self.check_args(method.name(), method.params(), args)?;
                Ok(method.returns())
            }
            ExprKind::New { constructor, args } => {
                self.check_args(constructor.name(), constructor.params(), args)?;
                Ok(constructor.declaring())
            }
            ExprKind::TypeIs { operand, .. } => {
                self.check(operand)?;
                Ok(Type::BOOL)
            }
            ExprKind::TypeAs { operand, ty } => {
                self.check(operand)?;
                if ty.admits_null() {
                    Ok(*ty)
                } else {
                    Err(ActiveExprError::TypeMismatch {
                        context: "type-as target",
                        expected: ty.nullable(),
                        found: *ty,
                    })
                }
            }
            ExprKind::Block(_) | ExprKind::Assign { .. } | ExprKind::Lambda(_) => {
                Err(ActiveExprError::NotSupported {
                    shape: expr.kind().shape_name(),
                })
            }
        }
    }
}

/// `left ?? right`: the result is the right type when it is the left's
/// underlying type, otherwise the left type.
pub(crate) fn coalesce_type(left: Type, right: Type) -> CheckResult {
    if !left.admits_null() {
        return Err(ActiveExprError::TypeMismatch {
            context: "coalesce left operand",
            expected: left.nullable(),
            found: left,
        });
    }
    if left.is_nullable_primitive() && right == left.underlying() {
        Ok(right)
    } else if left.is_assignable_from(right) {
        Ok(left)
    } else if right.is_assignable_from(left) {
        Ok(right)
    } else {
        Err(ActiveExprError::TypeMismatch {
            context: "coalesce operands",
            expected: left,
            found: right,
        })
    }
}

fn check_coalesce(
    left: Type,
    right: Type,
    conversion: Option<&actx_value::Function>,
) -> CheckResult {
    let result = coalesce_type(left, right)?;
    if let Some(conversion) = conversion {
        resolve_conversion(left, result, false, Some(conversion))?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests;

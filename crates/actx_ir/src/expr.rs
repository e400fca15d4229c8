//! Expression trees.
//!
//! [`Expr`] is an immutable, reference-counted tree node; subtrees are shared
//! freely between trees. Operands of every shape are addressable in a fixed
//! slot order (see [`Expr::operands`]), which the active tree mirrors one to
//! one.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use actx_value::{Constructor, Function, Indexer, Method, Name, Property, Type, Value};

use crate::{BinaryOp, LogicalOp, UnaryOp};

static NEXT_PARAM_ID: AtomicU32 = AtomicU32::new(0);

/// A lambda parameter declaration.
///
/// Every declaration is distinct, even when names and types coincide; names
/// only matter for rendering.
#[derive(Clone, Debug)]
pub struct Param {
    name: Name,
    ty: Type,
    id: u32,
}

impl Param {
    pub fn new(name: &str, ty: Type) -> Self {
        Param {
            name: Name::new(name),
            ty,
            id: NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    pub(crate) fn id(&self) -> u32 {
        self.id
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Param {}

impl std::hash::Hash for Param {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A lambda: parameters and a body.
#[derive(Clone, Debug)]
pub struct Lambda {
    params: Vec<Param>,
    body: Expr,
}

impl Lambda {
    pub fn new(params: Vec<Param>, body: Expr) -> Self {
        Lambda { params, body }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }
}

/// Method called by a [`ExprKind::Call`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Callee {
    Instance(Method),
    Static(Function),
}

impl Callee {
    pub fn name(&self) -> Name {
        match self {
            Callee::Instance(m) => m.name(),
            Callee::Static(f) => f.name(),
        }
    }

    pub fn declaring(&self) -> Type {
        match self {
            Callee::Instance(m) => m.declaring(),
            Callee::Static(f) => f.declaring(),
        }
    }

    pub fn params(&self) -> &[Type] {
        match self {
            Callee::Instance(m) => m.params(),
            Callee::Static(f) => f.params(),
        }
    }

    pub fn returns(&self) -> Type {
        match self {
            Callee::Instance(m) => m.returns(),
            Callee::Static(f) => f.returns(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Constant {
        value: Value,
        ty: Type,
    },
    Parameter(Param),
    /// Property read; `target` is `None` for static properties.
    Member {
        target: Option<Expr>,
        property: Property,
    },
    Binary {
        op: BinaryOp,
        left: Expr,
        right: Expr,
        /// User-defined operator overriding the built-in one.
        method: Option<Function>,
    },
    Unary {
        op: UnaryOp,
        operand: Expr,
        method: Option<Function>,
    },
    Convert {
        operand: Expr,
        to: Type,
        checked: bool,
        method: Option<Function>,
    },
    Logical {
        op: LogicalOp,
        left: Expr,
        right: Expr,
    },
    Conditional {
        test: Expr,
        if_true: Expr,
        if_false: Expr,
    },
    Coalesce {
        left: Expr,
        right: Expr,
        /// Conversion applied to a non-null left value.
        conversion: Option<Function>,
    },
    Index {
        target: Expr,
        indexer: Indexer,
        args: Vec<Expr>,
    },
    Call {
        target: Option<Expr>,
        method: Callee,
        args: Vec<Expr>,
    },
    New {
        constructor: Constructor,
        args: Vec<Expr>,
    },
    TypeIs {
        operand: Expr,
        ty: Type,
    },
    TypeAs {
        operand: Expr,
        ty: Type,
    },
    // Shapes that exist in expression trees but cannot be made active.
    Block(Vec<Expr>),
    Assign {
        target: Expr,
        value: Expr,
    },
    Lambda(Lambda),
}

impl ExprKind {
    /// Human-readable shape name, used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            ExprKind::Constant { .. } => "constant",
            ExprKind::Parameter(_) => "parameter",
            ExprKind::Member { .. } => "member access",
            ExprKind::Binary { .. } => "binary",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Convert { .. } => "conversion",
            ExprKind::Logical { .. } => "logical",
            ExprKind::Conditional { .. } => "conditional",
            ExprKind::Coalesce { .. } => "coalesce",
            ExprKind::Index { .. } => "index",
            ExprKind::Call { .. } => "method call",
            ExprKind::New { .. } => "constructor call",
            ExprKind::TypeIs { .. } => "type-is",
            ExprKind::TypeAs { .. } => "type-as",
            ExprKind::Block(_) => "block",
            ExprKind::Assign { .. } => "assignment",
            ExprKind::Lambda(_) => "lambda",
        }
    }
}

/// Shared, immutable expression node.
#[derive(Clone)]
pub struct Expr(Arc<ExprKind>);

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr(Arc::new(kind))
    }

    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared node, stable while any clone is alive.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Operands in slot order.
    ///
    /// | shape | slots |
    /// |---|---|
    /// | member | target (instance only) |
    /// | binary, logical, coalesce, assign | left, right |
    /// | unary, convert, type-is, type-as | operand |
    /// | conditional | test, if-true, if-false |
    /// | index | target, args... |
    /// | call | target (instance only), args... |
    /// | new, block | args... / statements... |
    /// | lambda | body |
    pub fn operands(&self) -> Vec<Expr> {
        match self.kind() {
            ExprKind::Constant { .. } | ExprKind::Parameter(_) => Vec::new(),
            ExprKind::Member { target, .. } => target.iter().cloned().collect(),
            ExprKind::Binary { left, right, .. }
            | ExprKind::Logical { left, right, .. }
            | ExprKind::Coalesce { left, right, .. }
            | ExprKind::Assign {
                target: left,
                value: right,
            } => vec![left.clone(), right.clone()],
            ExprKind::Unary { operand, .. }
            | ExprKind::Convert { operand, .. }
            | ExprKind::TypeIs { operand, .. }
            | ExprKind::TypeAs { operand, .. } => vec![operand.clone()],
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => vec![test.clone(), if_true.clone(), if_false.clone()],
            ExprKind::Index { target, args, .. } => {
                std::iter::once(target).chain(args).cloned().collect()
            }
            ExprKind::Call { target, args, .. } => target.iter().chain(args).cloned().collect(),
            ExprKind::New { args, .. } | ExprKind::Block(args) => args.clone(),
            ExprKind::Lambda(lambda) => vec![lambda.body.clone()],
        }
    }

    /// Rebuild this node with `operands` (in slot order) replacing its own.
    ///
    /// # Panics
    /// Panics if the operand count does not match [`Expr::operands`].
    #[must_use]
    pub fn with_operands(&self, operands: Vec<Expr>) -> Expr {
        assert_eq!(
            operands.len(),
            self.operands().len(),
            "operand count mismatch for {} expression",
            self.kind().shape_name()
        );
        let mut ops = operands.into_iter();
        let mut next = || ops.next().unwrap_or_else(|| unreachable!());
        let kind = match self.kind() {
            ExprKind::Constant { .. } | ExprKind::Parameter(_) => return self.clone(),
            ExprKind::Member { target, property } => ExprKind::Member {
                target: target.as_ref().map(|_| next()),
                property: property.clone(),
            },
            ExprKind::Binary { op, method, .. } => ExprKind::Binary {
                op: *op,
                left: next(),
                right: next(),
                method: method.clone(),
            },
            ExprKind::Unary { op, method, .. } => ExprKind::Unary {
                op: *op,
                operand: next(),
                method: method.clone(),
            },
            ExprKind::Convert {
                to,
                checked,
                method,
                ..
            } => ExprKind::Convert {
                operand: next(),
                to: *to,
                checked: *checked,
                method: method.clone(),
            },
            ExprKind::Logical { op, .. } => ExprKind::Logical {
                op: *op,
                left: next(),
                right: next(),
            },
            ExprKind::Conditional { .. } => ExprKind::Conditional {
                test: next(),
                if_true: next(),
                if_false: next(),
            },
            ExprKind::Coalesce { conversion, .. } => ExprKind::Coalesce {
                left: next(),
                right: next(),
                conversion: conversion.clone(),
            },
            ExprKind::Index { indexer, args, .. } => ExprKind::Index {
                target: next(),
                indexer: indexer.clone(),
                args: (0..args.len()).map(|_| next()).collect(),
            },
            ExprKind::Call {
                target,
                method,
                args,
            } => ExprKind::Call {
                target: target.as_ref().map(|_| next()),
                method: method.clone(),
                args: (0..args.len()).map(|_| next()).collect(),
            },
            ExprKind::New { constructor, args } => ExprKind::New {
                constructor: constructor.clone(),
                args: (0..args.len()).map(|_| next()).collect(),
            },
            ExprKind::TypeIs { ty, .. } => ExprKind::TypeIs {
                operand: next(),
                ty: *ty,
            },
            ExprKind::TypeAs { ty, .. } => ExprKind::TypeAs {
                operand: next(),
                ty: *ty,
            },
            ExprKind::Block(items) => ExprKind::Block((0..items.len()).map(|_| next()).collect()),
            ExprKind::Assign { .. } => ExprKind::Assign {
                target: next(),
                value: next(),
            },
            ExprKind::Lambda(lambda) => ExprKind::Lambda(Lambda {
                params: lambda.params.clone(),
                body: next(),
            }),
        };
        Expr::new(kind)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.kind(), f)
    }
}

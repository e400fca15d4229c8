//! Builders for every expression shape.
//!
//! Builders never fail: typing and operator resolution happen when an active
//! expression is created from the tree.

use actx_value::{Constructor, Function, Indexer, Method, Property, Type, Value};

use crate::{BinaryOp, Callee, Expr, ExprKind, Lambda, LogicalOp, Param, UnaryOp};

impl Expr {
    /// A constant typed by its value; `null` is typed `object`.
    pub fn constant(value: impl Into<Value>) -> Expr {
        let value = value.into();
        let ty = value.runtime_type().unwrap_or(Type::Any);
        Expr::new(ExprKind::Constant { value, ty })
    }

    pub fn constant_of(value: impl Into<Value>, ty: Type) -> Expr {
        Expr::new(ExprKind::Constant {
            value: value.into(),
            ty,
        })
    }

    /// A `null` constant of type `ty`.
    pub fn null(ty: Type) -> Expr {
        Expr::constant_of(Value::Null, ty)
    }

    pub fn parameter(param: &Param) -> Expr {
        Expr::new(ExprKind::Parameter(param.clone()))
    }

    pub fn property(target: Expr, property: Property) -> Expr {
        Expr::new(ExprKind::Member {
            target: Some(target),
            property,
        })
    }

    pub fn static_property(property: Property) -> Expr {
        Expr::new(ExprKind::Member {
            target: None,
            property,
        })
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::new(ExprKind::Binary {
            op,
            left,
            right,
            method: None,
        })
    }

    /// A binary expression implemented by a user-defined operator.
    pub fn binary_with(op: BinaryOp, left: Expr, right: Expr, method: Function) -> Expr {
        Expr::new(ExprKind::Binary {
            op,
            left,
            right,
            method: Some(method),
        })
    }

    pub fn add(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, left, right)
    }

    pub fn add_checked(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::AddChecked, left, right)
    }

    pub fn subtract(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Subtract, left, right)
    }

    pub fn multiply(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Multiply, left, right)
    }

    pub fn divide(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Divide, left, right)
    }

    pub fn modulo(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Modulo, left, right)
    }

    pub fn equal(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Equal, left, right)
    }

    pub fn not_equal(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::NotEqual, left, right)
    }

    pub fn less_than(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::LessThan, left, right)
    }

    pub fn greater_than(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::GreaterThan, left, right)
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::new(ExprKind::Unary {
            op,
            operand,
            method: None,
        })
    }

    pub fn unary_with(op: UnaryOp, operand: Expr, method: Function) -> Expr {
        Expr::new(ExprKind::Unary {
            op,
            operand,
            method: Some(method),
        })
    }

    pub fn negate(operand: Expr) -> Expr {
        Expr::unary(UnaryOp::Negate, operand)
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::unary(UnaryOp::Not, operand)
    }

    pub fn convert(operand: Expr, to: Type) -> Expr {
        Expr::new(ExprKind::Convert {
            operand,
            to,
            checked: false,
            method: None,
        })
    }

    pub fn convert_checked(operand: Expr, to: Type) -> Expr {
        Expr::new(ExprKind::Convert {
            operand,
            to,
            checked: true,
            method: None,
        })
    }

    /// A conversion implemented by a user-defined conversion operator.
    pub fn convert_with(operand: Expr, to: Type, method: Function) -> Expr {
        Expr::new(ExprKind::Convert {
            operand,
            to,
            checked: false,
            method: Some(method),
        })
    }

    pub fn and_also(left: Expr, right: Expr) -> Expr {
        Expr::new(ExprKind::Logical {
            op: LogicalOp::AndAlso,
            left,
            right,
        })
    }

    pub fn or_else(left: Expr, right: Expr) -> Expr {
        Expr::new(ExprKind::Logical {
            op: LogicalOp::OrElse,
            left,
            right,
        })
    }

    pub fn condition(test: Expr, if_true: Expr, if_false: Expr) -> Expr {
        Expr::new(ExprKind::Conditional {
            test,
            if_true,
            if_false,
        })
    }

    pub fn coalesce(left: Expr, right: Expr) -> Expr {
        Expr::new(ExprKind::Coalesce {
            left,
            right,
            conversion: None,
        })
    }

    pub fn coalesce_with(left: Expr, right: Expr, conversion: Function) -> Expr {
        Expr::new(ExprKind::Coalesce {
            left,
            right,
            conversion: Some(conversion),
        })
    }

    pub fn index(target: Expr, indexer: Indexer, args: Vec<Expr>) -> Expr {
        Expr::new(ExprKind::Index {
            target,
            indexer,
            args,
        })
    }

    pub fn call(target: Expr, method: Method, args: Vec<Expr>) -> Expr {
        Expr::new(ExprKind::Call {
            target: Some(target),
            method: Callee::Instance(method),
            args,
        })
    }

    pub fn call_static(function: Function, args: Vec<Expr>) -> Expr {
        Expr::new(ExprKind::Call {
            target: None,
            method: Callee::Static(function),
            args,
        })
    }

    pub fn new_object(constructor: Constructor, args: Vec<Expr>) -> Expr {
        Expr::new(ExprKind::New { constructor, args })
    }

    pub fn type_is(operand: Expr, ty: Type) -> Expr {
        Expr::new(ExprKind::TypeIs { operand, ty })
    }

    pub fn type_as(operand: Expr, ty: Type) -> Expr {
        Expr::new(ExprKind::TypeAs { operand, ty })
    }

    pub fn block(statements: Vec<Expr>) -> Expr {
        Expr::new(ExprKind::Block(statements))
    }

    pub fn assign(target: Expr, value: Expr) -> Expr {
        Expr::new(ExprKind::Assign { target, value })
    }

    pub fn lambda(lambda: Lambda) -> Expr {
        Expr::new(ExprKind::Lambda(lambda))
    }
}

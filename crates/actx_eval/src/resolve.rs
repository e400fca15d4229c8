//! Operator and conversion resolution.
//!
//! Each distinct (operator, operand types, implementing method) combination
//! is resolved once into an [`Operation`] and cached process-wide, so every
//! node sharing a shape shares the same compiled callable.
//!
//! Lifting: when an operand is a nullable primitive, a `null` operand
//! short-circuits the underlying operator. Equality treats two nulls as equal,
//! ordering comparisons yield `false`, `bool?` `&`/`|` use three-valued logic,
//! and everything else yields `null`.

use std::fmt;
use std::sync::{Arc, LazyLock};

use actx_ir::{BinaryOp, UnaryOp};
use actx_value::{fault, EvalResult, Function, Primitive, Type, Value};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::conversions::convert_primitive;
use crate::error::ResolveError;
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;

type Invoke = dyn Fn(&[Value]) -> EvalResult + Send + Sync;

/// A resolved operator or conversion.
pub(crate) struct Operation {
    result: Type,
    call: Box<Invoke>,
}

impl Operation {
    fn new(result: Type, call: impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static) -> Self {
        Operation {
            result,
            call: Box::new(call),
        }
    }

    pub(crate) fn result_type(&self) -> Type {
        self.result
    }

    pub(crate) fn invoke(&self, operands: &[Value]) -> EvalResult {
        (self.call)(operands)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operation(-> {})", self.result)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum OpKey {
    Binary(BinaryOp, Type, Type, Option<Function>),
    Unary(UnaryOp, Type, Option<Function>),
    Convert {
        from: Type,
        to: Type,
        checked: bool,
        method: Option<Function>,
    },
}

static OPERATIONS: LazyLock<DashMap<OpKey, Arc<Operation>, FxBuildHasher>> =
    LazyLock::new(|| DashMap::with_hasher(FxBuildHasher));

fn cached(
    key: OpKey,
    build: impl FnOnce() -> Result<Operation, ResolveError>,
) -> Result<Arc<Operation>, ResolveError> {
    if let Some(operation) = OPERATIONS.get(&key) {
        return Ok(Arc::clone(&*operation));
    }
    let operation = Arc::new(build()?);
    Ok(Arc::clone(&*OPERATIONS.entry(key).or_insert(operation)))
}

pub(crate) fn resolve_binary(
    op: BinaryOp,
    left: Type,
    right: Type,
    method: Option<&Function>,
) -> Result<Arc<Operation>, ResolveError> {
    let key = OpKey::Binary(op, left, right, method.cloned());
    cached(key, || match method {
        Some(method) => user_binary(op, left, right, method),
        None => builtin_binary(op, left, right),
    })
}

pub(crate) fn resolve_unary(
    op: UnaryOp,
    operand: Type,
    method: Option<&Function>,
) -> Result<Arc<Operation>, ResolveError> {
    let key = OpKey::Unary(op, operand, method.cloned());
    cached(key, || match method {
        Some(method) => user_unary(operand, method),
        None => builtin_unary(op, operand),
    })
}

pub(crate) fn resolve_conversion(
    from: Type,
    to: Type,
    checked: bool,
    method: Option<&Function>,
) -> Result<Arc<Operation>, ResolveError> {
    let key = OpKey::Convert {
        from,
        to,
        checked,
        method: method.cloned(),
    };
    cached(key, || match method {
        Some(method) => user_conversion(from, to, method),
        None => builtin_conversion(from, to, checked),
    })
}

// Binary

/// Result type of a built-in operator on non-nullable primitive operands.
fn binary_result(op: BinaryOp, left: Primitive, right: Primitive) -> Option<Type> {
    use Primitive::{Bool, Byte, Char, Double, Int, Long};

    if op.is_shift() {
        return (matches!(left, Int | Long) && right == Int).then_some(Type::Primitive(left));
    }
    if left != right {
        return None;
    }
    let supported = match left {
        Int | Long => op != BinaryOp::Power,
        Double => !matches!(op, BinaryOp::And | BinaryOp::Or | BinaryOp::ExclusiveOr),
        Bool => op.is_equality() || matches!(op, BinaryOp::And | BinaryOp::Or | BinaryOp::ExclusiveOr),
        Char | Byte => op.is_comparison(),
    };
    supported.then(|| {
        if op.is_comparison() {
            Type::BOOL
        } else {
            Type::Primitive(left)
        }
    })
}

/// Value of a lifted operator when at least one operand is `null`.
fn lifted_null(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Equal => Value::Bool(left.is_null() && right.is_null()),
        BinaryOp::NotEqual => Value::Bool(left.is_null() != right.is_null()),
        _ if op.is_ordering() => Value::Bool(false),
        BinaryOp::And
            if matches!(left, Value::Bool(false)) || matches!(right, Value::Bool(false)) =>
        {
            Value::Bool(false)
        }
        BinaryOp::Or if matches!(left, Value::Bool(true)) || matches!(right, Value::Bool(true)) => {
            Value::Bool(true)
        }
        _ => Value::Null,
    }
}

fn builtin_binary(op: BinaryOp, left: Type, right: Type) -> Result<Operation, ResolveError> {
    let unsupported = || ResolveError::Binary { op, left, right };

    if op.is_equality() && left.is_reference() && right.is_reference() {
        return Ok(Operation::new(Type::BOOL, move |args| {
            evaluate_binary(op, &args[0], &args[1])
        }));
    }
    if op == BinaryOp::Add && left == Type::String && right == Type::String {
        return Ok(Operation::new(Type::String, move |args| {
            evaluate_binary(op, &args[0], &args[1])
        }));
    }

    let (Some(l), Some(r)) = (left.primitive(), right.primitive()) else {
        return Err(unsupported());
    };
    let underlying = binary_result(op, l, r).ok_or_else(unsupported)?;
    let lifted = left.is_nullable_primitive() || right.is_nullable_primitive();
    let result = if lifted && !op.is_comparison() {
        underlying.nullable()
    } else {
        underlying
    };
    Ok(Operation::new(result, move |args| {
        let (left, right) = (&args[0], &args[1]);
        if lifted && (left.is_null() || right.is_null()) {
            return Ok(lifted_null(op, left, right));
        }
        evaluate_binary(op, left, right)
    }))
}

/// How a user method parameter accepts an operand: directly, or lifted over
/// a nullable primitive.
fn accepts(param: Type, operand: Type) -> Option<bool> {
    if param.is_assignable_from(operand) {
        Some(false)
    } else if operand.is_nullable_primitive() && param == operand.underlying() {
        Some(true)
    } else {
        None
    }
}

fn method_mismatch(method: &Function, operands: &[Type]) -> ResolveError {
    let operands = operands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    ResolveError::MethodOperands {
        method: method.name(),
        operands,
    }
}

/// Result type of a user method, widened to nullable when lifted.
fn lifted_result(returns: Type, lifted: bool) -> Type {
    if lifted && !returns.admits_null() {
        returns.nullable()
    } else {
        returns
    }
}

fn user_binary(
    op: BinaryOp,
    left: Type,
    right: Type,
    method: &Function,
) -> Result<Operation, ResolveError> {
    let mismatch = || method_mismatch(method, &[left, right]);
    let [first, second] = method.params() else {
        return Err(mismatch());
    };
    let lift_left = accepts(*first, left).ok_or_else(mismatch)?;
    let lift_right = accepts(*second, right).ok_or_else(mismatch)?;
    let lifted = lift_left || lift_right;
    let result = if lifted && op.is_comparison() && method.returns() == Type::BOOL {
        Type::BOOL
    } else {
        lifted_result(method.returns(), lifted)
    };
    let method = method.clone();
    Ok(Operation::new(result, move |args| {
        let (l, r) = (&args[0], &args[1]);
        if (lift_left && l.is_null()) || (lift_right && r.is_null()) {
            return Ok(lifted_null(op, l, r));
        }
        method.invoke(args)
    }))
}

// Unary

fn unary_result(op: UnaryOp, operand: Primitive) -> Option<Type> {
    use Primitive::{Bool, Double, Int, Long};

    let supported = match operand {
        Int | Long => true,
        Double => !matches!(op, UnaryOp::Not | UnaryOp::OnesComplement),
        Bool => op == UnaryOp::Not,
        _ => false,
    };
    supported.then_some(Type::Primitive(operand))
}

fn builtin_unary(op: UnaryOp, operand: Type) -> Result<Operation, ResolveError> {
    let underlying = operand
        .primitive()
        .and_then(|p| unary_result(op, p))
        .ok_or(ResolveError::Unary { op, operand })?;
    let lifted = operand.is_nullable_primitive();
    let result = if lifted {
        underlying.nullable()
    } else {
        underlying
    };
    Ok(Operation::new(result, move |args| {
        if lifted && args[0].is_null() {
            return Ok(Value::Null);
        }
        evaluate_unary(op, &args[0])
    }))
}

fn user_unary(operand: Type, method: &Function) -> Result<Operation, ResolveError> {
    let mismatch = || method_mismatch(method, &[operand]);
    let [param] = method.params() else {
        return Err(mismatch());
    };
    let lifted = accepts(*param, operand).ok_or_else(mismatch)?;
    let method = method.clone();
    Ok(Operation::new(
        lifted_result(method.returns(), lifted),
        move |args| {
            if lifted && args[0].is_null() {
                return Ok(Value::Null);
            }
            method.invoke(args)
        },
    ))
}

// Conversions

fn builtin_conversion(from: Type, to: Type, checked: bool) -> Result<Operation, ResolveError> {
    let unsupported = || ResolveError::Conversion { from, to };

    if from == to || to == Type::Any {
        return Ok(Operation::new(to, |args| Ok(args[0].clone())));
    }

    match (from.primitive(), to.primitive()) {
        (Some(f), Some(t)) => {
            if f != t && !(f.is_numeric() && t.is_numeric()) {
                return Err(unsupported());
            }
            let source_nullable = from.is_nullable_primitive();
            let target_nullable = to.is_nullable_primitive();
            Ok(Operation::new(to, move |args| match &args[0] {
                Value::Null if target_nullable => Ok(Value::Null),
                Value::Null if source_nullable => Err(fault::nullable_without_value()),
                value => convert_primitive(value, t, checked),
            }))
        }
        _ => match (from, to) {
            // Unboxing and down-casts are checked at run time.
            (Type::Any, Type::Primitive(p)) => Ok(Operation::new(to, move |args| {
                let value = &args[0];
                match value.primitive() {
                    Some(actual) if actual == p => Ok(value.clone()),
                    _ if value.is_null() => Err(fault::null_reference("unboxing")),
                    _ => Err(fault::invalid_cast(value, p.name())),
                }
            })),
            (Type::Any, Type::Nullable(_) | Type::String | Type::Object(_))
            | (Type::Object(_), Type::Object(_)) => Ok(Operation::new(to, move |args| {
                let value = &args[0];
                if value.fits(to) {
                    Ok(value.clone())
                } else {
                    Err(fault::invalid_cast(value, to))
                }
            })),
            _ => Err(unsupported()),
        },
    }
}

fn user_conversion(from: Type, to: Type, method: &Function) -> Result<Operation, ResolveError> {
    let mismatch = || method_mismatch(method, &[from]);
    let [param] = method.params() else {
        return Err(mismatch());
    };
    let lifted = accepts(*param, from).ok_or_else(mismatch)?;
    let returns = lifted_result(method.returns(), lifted);
    if !to.is_assignable_from(returns) {
        return Err(ResolveError::Conversion { from, to });
    }
    let method = method.clone();
    Ok(Operation::new(to, move |args| {
        if lifted && args[0].is_null() {
            return Ok(Value::Null);
        }
        method.invoke(args)
    }))
}

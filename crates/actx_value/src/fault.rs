//! Evaluation faults.
//!
//! A fault is an error captured as data. Operators, getters, indexers,
//! methods, constructors and disposals report failures as a [`Fault`]; the
//! engine stores it as the node's current state instead of unwinding.
//!
//! Faults compare by identity: two raises of the same error are two faults,
//! so a re-raised error is still observed as a change.

use std::fmt;
use std::sync::Arc;

use actx_dispose::DisposeError;

use crate::{Name, Value};

/// Classification of a fault.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    NullReference,
    DivideByZero,
    Overflow,
    InvalidCast,
    IndexOutOfRange,
    KeyNotFound,
    InvalidOperation,
    Argument,
    Disposal,
    /// A user callable panicked.
    Panic,
    Custom(Name),
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::NullReference => f.write_str("NullReference"),
            FaultKind::DivideByZero => f.write_str("DivideByZero"),
            FaultKind::Overflow => f.write_str("Overflow"),
            FaultKind::InvalidCast => f.write_str("InvalidCast"),
            FaultKind::IndexOutOfRange => f.write_str("IndexOutOfRange"),
            FaultKind::KeyNotFound => f.write_str("KeyNotFound"),
            FaultKind::InvalidOperation => f.write_str("InvalidOperation"),
            FaultKind::Argument => f.write_str("Argument"),
            FaultKind::Disposal => f.write_str("Disposal"),
            FaultKind::Panic => f.write_str("Panic"),
            FaultKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug)]
struct FaultData {
    kind: FaultKind,
    message: String,
}

/// A captured evaluation error.
#[derive(Clone)]
pub struct Fault(Arc<FaultData>);

impl Fault {
    #[cold]
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Fault(Arc::new(FaultData {
            kind,
            message: message.into(),
        }))
    }

    pub fn kind(&self) -> FaultKind {
        self.0.kind
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }

    pub fn ptr_eq(&self, other: &Fault) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Fault {}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.0.kind, self.0.message)
    }
}

impl std::error::Error for Fault {}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("kind", &self.0.kind)
            .field("message", &self.0.message)
            .finish()
    }
}

/// Result of evaluating anything that may fault.
pub type EvalResult = Result<Value, Fault>;

/// A member was read from, or invoked on, `null`.
#[cold]
pub fn null_reference(member: impl fmt::Display) -> Fault {
    Fault::new(
        FaultKind::NullReference,
        format!("cannot access `{member}` on null"),
    )
}

#[cold]
pub fn divide_by_zero() -> Fault {
    Fault::new(FaultKind::DivideByZero, "attempted to divide by zero")
}

/// A checked operation overflowed.
#[cold]
pub fn overflow(operation: &str) -> Fault {
    Fault::new(
        FaultKind::Overflow,
        format!("arithmetic operation resulted in an overflow: {operation}"),
    )
}

#[cold]
pub fn invalid_cast(from: impl fmt::Display, to: impl fmt::Display) -> Fault {
    Fault::new(
        FaultKind::InvalidCast,
        format!("unable to cast `{from}` to `{to}`"),
    )
}

#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> Fault {
    Fault::new(
        FaultKind::IndexOutOfRange,
        format!("index {index} is out of range for length {len}"),
    )
}

#[cold]
pub fn key_not_found(key: &Value) -> Fault {
    Fault::new(
        FaultKind::KeyNotFound,
        format!("key {key} was not present"),
    )
}

/// A `T?` holding `null` was unwrapped to `T`.
#[cold]
pub fn nullable_without_value() -> Fault {
    Fault::new(
        FaultKind::InvalidOperation,
        "nullable object must have a value",
    )
}

#[cold]
pub fn invalid_operation(message: impl Into<String>) -> Fault {
    Fault::new(FaultKind::InvalidOperation, message)
}

#[cold]
pub fn argument(message: impl Into<String>) -> Fault {
    Fault::new(FaultKind::Argument, message)
}

/// Disposing a superseded value failed.
#[cold]
pub fn disposal(error: &DisposeError) -> Fault {
    Fault::new(FaultKind::Disposal, error.to_string())
}

/// A user callable panicked with `message`.
#[cold]
pub fn panicked(message: impl Into<String>) -> Fault {
    Fault::new(FaultKind::Panic, message)
}

/// A fault classified by a caller-defined kind.
#[cold]
pub fn custom(kind: &str, message: impl Into<String>) -> Fault {
    Fault::new(FaultKind::Custom(Name::new(kind)), message)
}

#[cfg(test)]
mod tests;

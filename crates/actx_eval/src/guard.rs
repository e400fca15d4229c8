//! Panic containment for user callables.
//!
//! Getters, methods, operators, constructors and disposal routines are user
//! code. A panic in one of them becomes a `Panic` fault on the node that
//! invoked it instead of unwinding through the dependency graph.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use actx_dispose::DisposeError;
use actx_value::{fault, EvalResult};

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_owned()
    }
}

/// Run a user callable, converting a panic into a fault.
pub(crate) fn guarded(call: impl FnOnce() -> EvalResult) -> EvalResult {
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(fault::panicked(panic_message(&*payload))))
}

/// Run a user disposal routine, converting a panic into a failure.
pub(crate) fn guarded_dispose(
    dispose: impl FnOnce() -> Result<(), DisposeError>,
) -> Result<(), DisposeError> {
    panic::catch_unwind(AssertUnwindSafe(dispose))
        .unwrap_or_else(|payload| Err(DisposeError::failed(panic_message(&*payload))))
}

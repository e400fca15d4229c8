//! Disposal of values owned by nodes.
//!
//! An object may offer any of the three disposal shapes. Overridable disposal
//! wins over plain disposal; asynchronous disposal is used when it is the
//! only shape offered, or first when the options prefer it. Asynchronous
//! disposal is driven to completion on the calling thread.

use actx_dispose::{AsyncDispose, CancellationToken, DisposeError};
use actx_value::ObjectRef;
use tracing::{debug, trace};

use crate::guard::guarded_dispose;

fn dispose_async_blocking(disposable: &dyn AsyncDispose) -> Result<(), DisposeError> {
    let token = CancellationToken::new();
    futures::executor::block_on(disposable.dispose_async(&token))
}

fn dispose_object(object: &ObjectRef, prefer_async: bool) -> Result<(), DisposeError> {
    if prefer_async {
        if let Some(disposable) = object.as_async_dispose() {
            return dispose_async_blocking(disposable);
        }
    }
    if let Some(disposable) = object.as_overridable_dispose() {
        if !disposable.try_dispose()? {
            debug!(object = %object, "object deferred its disposal");
        }
        return Ok(());
    }
    if let Some(disposable) = object.as_dispose() {
        return disposable.dispose();
    }
    if let Some(disposable) = object.as_async_dispose() {
        return dispose_async_blocking(disposable);
    }
    Ok(())
}

/// Dispose an owned value, containing panics from its disposal routine.
pub(crate) fn dispose_value(object: &ObjectRef, prefer_async: bool) -> Result<(), DisposeError> {
    trace!(object = %object, "disposing produced value");
    guarded_dispose(|| dispose_object(object, prefer_async))
}

//! The disposal shapes a value may implement.

use futures::future::BoxFuture;

use crate::{CancellationToken, DisposeError};

/// Synchronous disposal.
pub trait Dispose: Send + Sync {
    fn dispose(&self) -> Result<(), DisposeError>;
}

/// Asynchronous disposal with cooperative cancellation.
///
/// An implementation that observes `token` as cancelled must return
/// [`DisposeError::Cancelled`] and leave itself not disposed.
pub trait AsyncDispose: Send + Sync {
    fn dispose_async<'a>(
        &'a self,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), DisposeError>>;
}

/// Disposal that the implementor may defer.
///
/// Returns `Ok(true)` when disposal completed and `Ok(false)` when it was
/// deferred; a deferred disposal can be attempted again later.
pub trait OverridableDispose: Send + Sync {
    fn try_dispose(&self) -> Result<bool, DisposeError>;
}

//! Disposal errors.

use std::sync::Arc;

/// Why a disposal did not complete.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DisposeError {
    /// The disposal body reported a failure.
    #[error("disposal failed: {message}")]
    Failed { message: Arc<str> },

    /// The cancellation token fired before the disposal completed.
    #[error("disposal was cancelled")]
    Cancelled,

    /// Another disposal of the same object is in flight.
    #[error("object is already being disposed")]
    AlreadyDisposing,
}

impl DisposeError {
    /// A [`DisposeError::Failed`] carrying `message`.
    #[cold]
    pub fn failed(message: impl Into<Arc<str>>) -> Self {
        DisposeError::Failed {
            message: message.into(),
        }
    }
}

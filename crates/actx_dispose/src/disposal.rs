//! Embeddable disposal state machine.
//!
//! [`Disposal`] is the shared core of every disposable in the workspace. It
//! guarantees the disposal body runs to completion at most once, lets a
//! failed, cancelled or deferred disposal be retried, and announces the
//! transition through `disposing`/`disposed` events.

use std::future::Future;

use parking_lot::Mutex;

use crate::{CancellationToken, DisposeError, Event};

/// Lifecycle of a disposable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisposalState {
    Live,
    Disposing,
    Disposed,
}

/// What [`Disposal::begin`] found.
enum Begin {
    Started,
    AlreadyDisposed,
}

pub struct Disposal {
    state: Mutex<DisposalState>,
    disposing: Event<()>,
    disposed: Event<()>,
}

impl Disposal {
    pub fn new() -> Self {
        Disposal {
            state: Mutex::new(DisposalState::Live),
            disposing: Event::new(),
            disposed: Event::new(),
        }
    }

    pub fn state(&self) -> DisposalState {
        *self.state.lock()
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == DisposalState::Disposed
    }

    /// Raised when a disposal attempt starts.
    pub fn disposing(&self) -> &Event<()> {
        &self.disposing
    }

    /// Raised once, after disposal completed.
    pub fn disposed(&self) -> &Event<()> {
        &self.disposed
    }

    fn begin(&self) -> Result<Begin, DisposeError> {
        let mut state = self.state.lock();
        match *state {
            DisposalState::Disposed => Ok(Begin::AlreadyDisposed),
            DisposalState::Disposing => Err(DisposeError::AlreadyDisposing),
            DisposalState::Live => {
                *state = DisposalState::Disposing;
                Ok(Begin::Started)
            }
        }
    }

    fn finish(&self, completed: bool) {
        *self.state.lock() = if completed {
            DisposalState::Disposed
        } else {
            DisposalState::Live
        };
        if completed {
            self.disposed.raise(&());
        }
    }

    /// Run a synchronous disposal body.
    ///
    /// `body` returns `Ok(true)` when disposal completed. `Ok(false)` (a
    /// deferred overridable disposal) and `Err` return the object to
    /// [`DisposalState::Live`]. Disposing an already disposed object is a
    /// no-op returning `Ok(true)`.
    pub fn dispose_with(
        &self,
        body: impl FnOnce() -> Result<bool, DisposeError>,
    ) -> Result<bool, DisposeError> {
        if let Begin::AlreadyDisposed = self.begin()? {
            return Ok(true);
        }
        self.disposing.raise(&());
        let outcome = body();
        match outcome {
            Ok(completed) => {
                self.finish(completed);
                Ok(completed)
            }
            Err(error) => {
                tracing::debug!(%error, "disposal failed; object stays live");
                self.finish(false);
                Err(error)
            }
        }
    }

    /// Run an asynchronous disposal body under `token`.
    ///
    /// A token cancelled before the body starts leaves the object untouched
    /// and yields [`DisposeError::Cancelled`]; a body that fails (including by
    /// observing cancellation) returns the object to [`DisposalState::Live`].
    pub async fn dispose_async_with<F, Fut>(
        &self,
        token: &CancellationToken,
        body: F,
    ) -> Result<(), DisposeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), DisposeError>>,
    {
        token.check()?;
        if let Begin::AlreadyDisposed = self.begin()? {
            return Ok(());
        }
        self.disposing.raise(&());
        match body().await {
            Ok(()) => {
                self.finish(true);
                Ok(())
            }
            Err(error) => {
                tracing::debug!(%error, "asynchronous disposal did not complete");
                self.finish(false);
                Err(error)
            }
        }
    }
}

impl Default for Disposal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Disposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposal")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;

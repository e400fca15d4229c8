//! Lifecycle primitives shared by the active expression crates.
//!
//! - [`Dispose`], [`AsyncDispose`], [`OverridableDispose`]: the three disposal
//!   shapes a produced value may support
//! - [`Disposal`]: an embeddable `Live -> Disposing -> Disposed` state machine
//!   with `disposing`/`disposed` notifications
//! - [`CancellationToken`]: cooperative cancellation for asynchronous disposal
//! - [`Event`] / [`Subscription`]: thread-safe multicast events with strong and
//!   weak subscriptions

mod cancel;
mod contract;
mod disposal;
mod error;
mod event;

pub use cancel::{CancellationToken, Cancelled};
pub use contract::{AsyncDispose, Dispose, OverridableDispose};
pub use disposal::{Disposal, DisposalState};
pub use error::DisposeError;
pub use event::{Event, Subscription};

/// Boxed future returned by [`AsyncDispose::dispose_async`].
pub use futures::future::BoxFuture;

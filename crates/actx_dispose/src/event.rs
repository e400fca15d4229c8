//! Thread-safe multicast events.
//!
//! Handlers are snapshotted before a raise, so a handler may subscribe or
//! unsubscribe (itself or others) while the event is being raised. A
//! [`Subscription`] detaches its handler exactly once: on
//! [`Subscription::unsubscribe`] or on drop, whichever happens first.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Whether a handler still wants to be called.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Alive,
    Gone,
}

type Handler<T> = Arc<dyn Fn(&T) -> Liveness + Send + Sync>;

struct Handlers<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Handler<T>)>>,
}

/// Type-erased detach hook held by subscriptions.
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T> Detach for Handlers<T> {
    fn detach(&self, id: u64) {
        self.entries.lock().retain(|(entry, _)| *entry != id);
    }
}

/// A multicast event carrying `T`.
pub struct Event<T> {
    handlers: Arc<Handlers<T>>,
}

impl<T: 'static> Event<T> {
    pub fn new() -> Self {
        Event {
            handlers: Arc::new(Handlers {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Subscribe `handler` until the returned subscription is dropped.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.attach(Arc::new(move |args: &T| {
            handler(args);
            Liveness::Alive
        }))
    }

    /// Subscribe `handler` on behalf of `target` without keeping it alive.
    ///
    /// The handler receives the upgraded target. Once `target` has been
    /// dropped the handler is skipped and removed on the next raise, even if
    /// the subscription itself was leaked.
    pub fn subscribe_weak<S>(
        &self,
        target: &Arc<S>,
        handler: impl Fn(&Arc<S>, &T) + Send + Sync + 'static,
    ) -> Subscription
    where
        S: Send + Sync + 'static,
    {
        let target = Arc::downgrade(target);
        self.attach(Arc::new(move |args: &T| match target.upgrade() {
            Some(target) => {
                handler(&target, args);
                Liveness::Alive
            }
            None => Liveness::Gone,
        }))
    }

    fn attach(&self, handler: Handler<T>) -> Subscription {
        let id = self.handlers.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.entries.lock().push((id, handler));
        let weak: Weak<Handlers<T>> = Arc::downgrade(&self.handlers);
        let source: Weak<dyn Detach> = weak;
        Subscription {
            source: Some((source, id)),
        }
    }

    /// Invoke every handler subscribed at the time of the call.
    pub fn raise(&self, args: &T) {
        let snapshot: Vec<(u64, Handler<T>)> = self.handlers.entries.lock().clone();
        let mut gone = Vec::new();
        for (id, handler) in &snapshot {
            if handler(args) == Liveness::Gone {
                gone.push(*id);
            }
        }
        if !gone.is_empty() {
            self.handlers
                .entries
                .lock()
                .retain(|(id, _)| !gone.contains(id));
        }
    }

    /// Number of attached handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.entries.lock().len()
    }
}

impl<T: 'static> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handlers.entries.lock().len())
            .finish()
    }
}

/// Handle to a subscribed handler.
#[must_use = "dropping a Subscription detaches its handler"]
pub struct Subscription {
    source: Option<(Weak<dyn Detach>, u64)>,
}

impl Subscription {
    /// A subscription attached to nothing.
    pub fn detached() -> Self {
        Subscription { source: None }
    }

    /// Detach the handler now.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    /// Whether the handler is still attached to a live event.
    pub fn is_attached(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|(source, _)| source.strong_count() > 0)
    }

    fn detach(&mut self) {
        if let Some((source, id)) = self.source.take() {
            if let Some(source) = source.upgrade() {
                source.detach(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.is_attached())
            .finish()
    }
}

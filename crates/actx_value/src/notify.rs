//! The change-notification contract.

use actx_dispose::Event;

use crate::{Name, Value};

/// Payload of property changing/changed signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyChange {
    pub name: Name,
}

/// Property changing/changed signals raised by an object.
#[derive(Debug, Default)]
pub struct PropertyNotifier {
    changing: Event<PropertyChange>,
    changed: Event<PropertyChange>,
}

impl PropertyNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changing(&self) -> &Event<PropertyChange> {
        &self.changing
    }

    pub fn changed(&self) -> &Event<PropertyChange> {
        &self.changed
    }

    pub fn notify_changing(&self, name: impl Into<Name>) {
        self.changing.raise(&PropertyChange { name: name.into() });
    }

    pub fn notify_changed(&self, name: impl Into<Name>) {
        self.changed.raise(&PropertyChange { name: name.into() });
    }

    /// Raise `changing`, run `apply`, raise `changed`.
    pub fn change<R>(&self, name: impl Into<Name>, apply: impl FnOnce() -> R) -> R {
        let name = name.into();
        self.notify_changing(name);
        let result = apply();
        self.notify_changed(name);
        result
    }
}

/// What happened to a change-aware collection.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionChange {
    Reset,
    Added { index: usize },
    Removed { index: usize },
    Replaced { index: usize },
    Moved { from: usize, to: usize },
    /// A dictionary entry was added, removed or replaced.
    KeyChanged { key: Value },
}

/// Collection change signals raised by a collection or dictionary.
#[derive(Debug, Default)]
pub struct CollectionNotifier {
    changed: Event<CollectionChange>,
}

impl CollectionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed(&self) -> &Event<CollectionChange> {
        &self.changed
    }

    pub fn notify(&self, change: &CollectionChange) {
        self.changed.raise(change);
    }
}

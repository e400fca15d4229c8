//! Shared property observation.
//!
//! Many nodes may watch the same object. The registry keeps one subscription
//! to each object's `changed` signal and fans notifications out to the
//! watches registered for the changed property name. The subscription is
//! dropped with the object's last watch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use actx_value::{Name, ObjectRef, PropertyChange, Subscription};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

pub(crate) type Callback = Arc<dyn Fn() + Send + Sync>;

struct Observed {
    /// Keeps the address key valid while watches exist.
    _object: ObjectRef,
    _subscription: Subscription,
    handlers: FxHashMap<Name, Vec<(u64, Callback)>>,
    watches: usize,
}

static OBSERVED: LazyLock<Mutex<FxHashMap<usize, Observed>>> = LazyLock::new(Default::default);
static NEXT_WATCH: AtomicU64 = AtomicU64::new(0);

/// One registered callback for one (object, property) pair; unregisters on drop.
pub(crate) struct PropertyWatch {
    addr: usize,
    name: Name,
    id: u64,
}

/// Watch `name` on `object`, or `None` if the object raises no property
/// change signals.
pub(crate) fn watch(object: &ObjectRef, name: Name, callback: Callback) -> Option<PropertyWatch> {
    let notifier = object.property_notifier()?;
    let addr = object.addr();
    let id = NEXT_WATCH.fetch_add(1, Ordering::Relaxed);
    let mut observed = OBSERVED.lock();
    let entry = observed.entry(addr).or_insert_with(|| Observed {
        _object: object.clone(),
        _subscription: notifier
            .changed()
            .subscribe(move |change: &PropertyChange| dispatch(addr, change.name)),
        handlers: FxHashMap::default(),
        watches: 0,
    });
    entry.handlers.entry(name).or_default().push((id, callback));
    entry.watches += 1;
    Some(PropertyWatch { addr, name, id })
}

fn dispatch(addr: usize, name: Name) {
    let callbacks: Vec<Callback> = {
        let observed = OBSERVED.lock();
        observed
            .get(&addr)
            .and_then(|entry| entry.handlers.get(&name))
            .map(|handlers| handlers.iter().map(|(_, c)| Arc::clone(c)).collect())
            .unwrap_or_default()
    };
    for callback in callbacks {
        callback();
    }
}

impl Drop for PropertyWatch {
    fn drop(&mut self) {
        let retired = {
            let mut observed = OBSERVED.lock();
            let Some(entry) = observed.get_mut(&self.addr) else {
                return;
            };
            if let Some(handlers) = entry.handlers.get_mut(&self.name) {
                handlers.retain(|(id, _)| *id != self.id);
                if handlers.is_empty() {
                    entry.handlers.remove(&self.name);
                }
            }
            entry.watches -= 1;
            if entry.watches == 0 {
                observed.remove(&self.addr)
            } else {
                None
            }
        };
        // The object may run arbitrary code when its last handle goes.
        drop(retired);
    }
}


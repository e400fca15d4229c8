//! Active nodes.
//!
//! A node evaluates one expression shape over the current outcomes of its
//! child nodes and republishes when a child or a watched object changes.
//! Nodes are shared through [`crate::registry`]: one node exists per
//! distinct (expression, options) pair, however many parents use it.
//!
//! Locking: a node's evaluation state sits behind a reentrant mutex, taken
//! parent before child. Change signals are raised after the lock is
//! released. A change arriving on the evaluating thread itself (a getter
//! that mutates what it reads) marks the node dirty and the running pass
//! evaluates again.

mod evaluate;
mod shape;

use std::cell::RefCell;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use actx_dispose::DisposeError;
use actx_ir::Expr;
use actx_stack::ensure_sufficient_stack;
use actx_value::{fault, EvalResult, Event, Fault, Name, ObjectRef, Subscription, Type, Value};
use parking_lot::{ReentrantMutex, RwLock};
use tracing::{trace, warn};

use crate::dispose::dispose_value;
use crate::error::ActiveExprError;
use crate::observe::{self, PropertyWatch};
use crate::registry::{self, NodeKey};
use crate::typeck::Typing;
use shape::Shape;

struct Child {
    node: Arc<Node>,
    subscription: Subscription,
}

/// The object a member or index node reads from, while it can signal changes.
struct Watch {
    object: ObjectRef,
    _property: Option<PropertyWatch>,
    _collection: Option<Subscription>,
}

#[derive(Default)]
struct EvalState {
    /// One slot per operand; `None` while a lazy operand is inactive.
    children: Vec<Option<Child>>,
    watch: Option<Watch>,
    /// Disposable value this node owns.
    produced: Option<ObjectRef>,
}

/// Everything a retired node still has to let go of.
struct Leftovers {
    children: Vec<Option<Child>>,
    watch: Option<Watch>,
    produced: Option<ObjectRef>,
}

impl EvalState {
    fn take(&mut self) -> Leftovers {
        Leftovers {
            children: mem::take(&mut self.children),
            watch: self.watch.take(),
            produced: self.produced.take(),
        }
    }
}

/// The outcome readers see, numbered by change.
struct Published {
    version: u64,
    outcome: EvalResult,
}

impl Published {
    fn replace(&mut self, outcome: EvalResult) -> bool {
        let changed = !same_outcome(&self.outcome, &outcome);
        if changed {
            self.version += 1;
        }
        self.outcome = outcome;
        changed
    }
}

pub(crate) struct Node {
    key: NodeKey,
    typing: Arc<Typing>,
    ty: Type,
    shape: Shape,
    operands: Vec<Expr>,
    disposes_values: bool,
    prefer_async: bool,
    /// Held for writing while the creating thread initializes the node.
    ready: RwLock<()>,
    failure: OnceLock<ActiveExprError>,
    eval: ReentrantMutex<RefCell<EvalState>>,
    dirty: AtomicBool,
    retired: AtomicBool,
    published: RwLock<Published>,
    changed: Event<()>,
}

fn same_outcome(a: &EvalResult, b: &EvalResult) -> bool {
    match (a, b) {
        (Ok(a), Ok(b)) => a.identical(b),
        (Err(a), Err(b)) => a == b,
        _ => false,
    }
}

fn release_child(child: Child) {
    let Child { node, subscription } = child;
    subscription.unsubscribe();
    if let Err(error) = registry::release(&node) {
        warn!(%error, "operand released with a disposal failure");
    }
}

impl Node {
    /// `typing` covers `key`'s expression and every operand below it.
    pub(crate) fn new(key: NodeKey, typing: Arc<Typing>) -> Result<Node, ActiveExprError> {
        let expr = key.expr();
        let ty = typing.type_of(expr)?;
        let shape = Shape::build(expr, &typing)?;
        let operands = expr.operands();
        let disposes_values = key.options().disposes_value_of(expr);
        let prefer_async = key.options().prefer_async_disposal();
        Ok(Node {
            key,
            typing,
            ty,
            shape,
            operands,
            disposes_values,
            prefer_async,
            ready: RwLock::new(()),
            failure: OnceLock::new(),
            eval: ReentrantMutex::new(RefCell::new(EvalState::default())),
            dirty: AtomicBool::new(false),
            retired: AtomicBool::new(false),
            published: RwLock::new(Published {
                version: 0,
                outcome: Ok(Value::Null),
            }),
            changed: Event::new(),
        })
    }

    pub(crate) fn key(&self) -> &NodeKey {
        &self.key
    }

    pub(crate) fn expr(&self) -> &Expr {
        self.key.expr()
    }

    pub(crate) fn ty(&self) -> Type {
        self.ty
    }

    pub(crate) fn outcome(&self) -> EvalResult {
        self.published.read().outcome.clone()
    }

    /// The outcome with its change number; a larger number is a later outcome.
    pub(crate) fn versioned_outcome(&self) -> (u64, EvalResult) {
        let published = self.published.read();
        (published.version, published.outcome.clone())
    }

    /// Raised after the outcome changed.
    pub(crate) fn changed(&self) -> &Event<()> {
        &self.changed
    }

    pub(crate) fn ready(&self) -> &RwLock<()> {
        &self.ready
    }

    /// Block until the creating thread finished initialization.
    pub(crate) fn wait_ready(&self) -> Result<(), ActiveExprError> {
        drop(self.ready.read());
        self.failure.get().map_or(Ok(()), |error| Err(error.clone()))
    }

    pub(crate) fn fail(&self, error: ActiveExprError) {
        // Only the creating thread fails a node, and only once.
        let _ = self.failure.set(error);
    }

    /// Activate the eager operands and compute the first outcome.
    pub(crate) fn initialize(self: &Arc<Self>) -> Result<(), ActiveExprError> {
        ensure_sufficient_stack(|| {
            let guard = self.eval.lock();
            let mut state = guard.borrow_mut();
            state.children = self.operands.iter().map(|_| None).collect();
            for slot in 0..self.operands.len() {
                if !self.shape.is_lazy(slot) {
                    let child = self.attach(slot)?;
                    state.children[slot] = Some(child);
                }
            }
            self.run(&mut state);
            Ok(())
        })
    }

    fn attach(self: &Arc<Self>, slot: usize) -> Result<Child, ActiveExprError> {
        let node = registry::acquire(&self.operands[slot], self.key.options(), &self.typing)?;
        let subscription = node
            .changed
            .subscribe_weak(self, |parent, _| parent.refresh());
        Ok(Child { node, subscription })
    }

    /// Make a lazy operand active if it is not already.
    fn activate_slot(self: &Arc<Self>, state: &mut EvalState, slot: usize) -> Result<(), Fault> {
        if state.children[slot].is_none() {
            let child = self
                .attach(slot)
                .map_err(|error| fault::invalid_operation(error.to_string()))?;
            state.children[slot] = Some(child);
        }
        Ok(())
    }

    fn release_slot(&self, state: &mut EvalState, slot: usize) {
        if let Some(child) = state.children[slot].take() {
            trace!(slot, "deactivating operand");
            release_child(child);
        }
    }

    /// Watch `name` (and, for index reads, collection changes) on the object
    /// `target` refers to, replacing the watch on a previous object.
    fn observe(
        self: &Arc<Self>,
        state: &mut EvalState,
        target: Option<&Value>,
        name: Name,
        collection: bool,
    ) {
        let object = target.and_then(Value::as_object);
        if let (Some(watch), Some(object)) = (&state.watch, object) {
            if watch.object.ptr_eq(object) {
                return;
            }
        }
        state.watch = None;
        let Some(object) = object else {
            return;
        };
        let weak = Arc::downgrade(self);
        let property = observe::watch(
            object,
            name,
            Arc::new(move || {
                if let Some(node) = weak.upgrade() {
                    node.refresh();
                }
            }),
        );
        let collection = if collection {
            object
                .collection_notifier()
                .map(|notifier| notifier.changed().subscribe_weak(self, |node, _| node.refresh()))
        } else {
            None
        };
        if property.is_some() || collection.is_some() {
            state.watch = Some(Watch {
                object: object.clone(),
                _property: property,
                _collection: collection,
            });
        }
    }

    /// Re-evaluate after an operand or a watched object changed.
    pub(crate) fn refresh(self: &Arc<Self>) {
        if self.retired.load(Ordering::Acquire) {
            return;
        }
        let (changed, leftovers) = {
            let guard = self.eval.lock();
            let Ok(mut state) = guard.try_borrow_mut() else {
                self.dirty.store(true, Ordering::Release);
                return;
            };
            let changed = self.run(&mut state);
            let leftovers = self
                .retired
                .load(Ordering::Acquire)
                .then(|| state.take());
            (changed, leftovers)
        };
        if let Some(leftovers) = leftovers {
            if let Err(error) = self.finish_teardown(leftovers) {
                warn!(%error, "disposal failed while retiring a node");
            }
            return;
        }
        if changed {
            trace!(shape = self.expr().kind().shape_name(), "outcome changed");
            self.changed.raise(&());
        }
    }

    /// Evaluate until no change arrived during the pass; returns whether the
    /// outcome changed.
    fn run(self: &Arc<Self>, state: &mut EvalState) -> bool {
        let mut changed = false;
        loop {
            self.dirty.store(false, Ordering::Release);
            let outcome = self.evaluate(state);
            changed |= self.commit(state, outcome);
            if !self.dirty.load(Ordering::Acquire) {
                return changed;
            }
        }
    }

    fn commit(&self, state: &mut EvalState, outcome: EvalResult) -> bool {
        let outcome = self.track_produced(state, outcome);
        self.published.write().replace(outcome)
    }

    /// Take ownership of a new disposable value and dispose the one it
    /// replaces. A failed disposal faults the node; the new value is still
    /// owned and is disposed when it is replaced in turn.
    fn track_produced(&self, state: &mut EvalState, outcome: EvalResult) -> EvalResult {
        if !self.disposes_values {
            return outcome;
        }
        let next = match &outcome {
            Ok(Value::Object(object)) if object.is_disposable() => Some(object.clone()),
            _ => None,
        };
        let previous = mem::replace(&mut state.produced, next);
        let Some(previous) = previous else {
            return outcome;
        };
        if state
            .produced
            .as_ref()
            .is_some_and(|next| next.ptr_eq(&previous))
        {
            return outcome;
        }
        match dispose_value(&previous, self.prefer_async) {
            Err(error) if outcome.is_ok() => Err(fault::disposal(&error)),
            _ => outcome,
        }
    }

    /// Release operands and watches and dispose the owned value.
    ///
    /// Called once the last user released the node. If the node is in the
    /// middle of its own evaluation on this thread, the running pass finishes
    /// the teardown.
    pub(crate) fn teardown(&self) -> Result<(), DisposeError> {
        self.retired.store(true, Ordering::Release);
        let leftovers = {
            let guard = self.eval.lock();
            let Ok(mut state) = guard.try_borrow_mut() else {
                return Ok(());
            };
            state.take()
        };
        self.finish_teardown(leftovers)
    }

    fn finish_teardown(&self, leftovers: Leftovers) -> Result<(), DisposeError> {
        let Leftovers {
            children,
            watch,
            produced,
        } = leftovers;
        drop(watch);
        for child in children.into_iter().flatten() {
            release_child(child);
        }
        let Some(produced) = produced else {
            return Ok(());
        };
        dispose_value(&produced, self.prefer_async).inspect_err(|error| {
            self.published.write().replace(Err(fault::disposal(error)));
        })
    }

    /// Active operand nodes by slot, for annotated rendering.
    pub(crate) fn active_operands(&self) -> Vec<Option<Arc<Node>>> {
        let guard = self.eval.lock();
        let Ok(state) = guard.try_borrow() else {
            return Vec::new();
        };
        state
            .children
            .iter()
            .map(|child| child.as_ref().map(|child| Arc::clone(&child.node)))
            .collect()
    }
}

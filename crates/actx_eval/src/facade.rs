//! The public active expression.
//!
//! An [`ActiveExpression`] holds one reference to the root node of its
//! expression and mirrors the root's outcome as observable `Value` and
//! `Fault` properties. Two expressions created from structurally equal
//! bodies, arguments and options share the root node.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use actx_dispose::{AsyncDispose, BoxFuture, CancellationToken, Disposal, Dispose, DisposeError};
use actx_ir::{substitute, Expr, Lambda};
use actx_value::{EvalResult, Fault, Name, PropertyNotifier, Subscription, Type, Value};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::ActiveExprError;
use crate::node::Node;
use crate::options::ActiveExpressionOptions;
use crate::{registry, render, typeck};

static VALUE: LazyLock<Name> = LazyLock::new(|| Name::new("Value"));
static FAULT: LazyLock<Name> = LazyLock::new(|| Name::new("Fault"));

/// Root outcome last taken over by the facade, with the root's change number.
struct Observed {
    version: u64,
    outcome: EvalResult,
}

struct Inner {
    root: Arc<Node>,
    arguments: Vec<Value>,
    options: ActiveExpressionOptions,
    observed: Mutex<Observed>,
    notifier: PropertyNotifier,
    disposal: Disposal,
    root_changed: Mutex<Option<Subscription>>,
}

fn same_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.identical(b),
        (None, None) => true,
        _ => false,
    }
}

impl Inner {
    /// Announce a root outcome change as `Value`/`Fault` property changes.
    ///
    /// Root changes can be delivered on several threads at once; an outcome
    /// older than the one already taken over is dropped, so the last stored
    /// outcome is always the root's latest.
    fn sync(&self) {
        let (version, next) = self.root.versioned_outcome();
        let (value_changed, fault_changed) = {
            let mut observed = self.observed.lock();
            if version <= observed.version {
                return;
            }
            let flags = (
                !same_value(observed.outcome.as_ref().ok(), next.as_ref().ok()),
                observed.outcome.as_ref().err() != next.as_ref().err(),
            );
            if flags == (false, false) {
                *observed = Observed {
                    version,
                    outcome: next,
                };
                return;
            }
            flags
        };
        if fault_changed {
            self.notifier.notify_changing(*FAULT);
        }
        if value_changed {
            self.notifier.notify_changing(*VALUE);
        }
        {
            let mut observed = self.observed.lock();
            if version > observed.version {
                *observed = Observed {
                    version,
                    outcome: next,
                };
            }
        }
        if fault_changed {
            self.notifier.notify_changed(*FAULT);
        }
        if value_changed {
            self.notifier.notify_changed(*VALUE);
        }
    }

    fn release(&self) -> Result<(), DisposeError> {
        drop(self.root_changed.lock().take());
        registry::release(&self.root)
    }
}

/// A live view of an expression's value.
pub struct ActiveExpression {
    inner: Arc<Inner>,
}

impl ActiveExpression {
    /// Activate `lambda` with `arguments` bound to its parameters.
    ///
    /// `options` defaults to the shared default options and is frozen by
    /// this call.
    #[tracing::instrument(level = "debug", skip_all, fields(arity = lambda.params().len()))]
    pub fn create(
        lambda: &Lambda,
        arguments: &[Value],
        options: Option<&ActiveExpressionOptions>,
    ) -> Result<Self, ActiveExprError> {
        let params = lambda.params();
        if params.len() != arguments.len() {
            return Err(ActiveExprError::ArgumentCount {
                member: Name::new("lambda"),
                expected: params.len(),
                found: arguments.len(),
            });
        }
        for (param, argument) in params.iter().zip(arguments) {
            if !argument.fits(param.ty()) {
                return Err(ActiveExprError::ArgumentType {
                    name: param.name(),
                    ty: param.ty(),
                });
            }
        }
        let body = substitute(lambda.body(), params, arguments);
        Self::activate(body, arguments.to_vec(), options)
    }

    /// Activate a parameterless body; captured values are its constants.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn create_closure(
        body: &Expr,
        options: Option<&ActiveExpressionOptions>,
    ) -> Result<Self, ActiveExprError> {
        Self::activate(body.clone(), Vec::new(), options)
    }

    fn activate(
        body: Expr,
        arguments: Vec<Value>,
        options: Option<&ActiveExpressionOptions>,
    ) -> Result<Self, ActiveExprError> {
        let options = options.map_or_else(ActiveExpressionOptions::default_shared, Clone::clone);
        options.freeze();
        let typing = typeck::check_tree(&body)?;
        let root = registry::acquire(&body, &options, &typing)?;
        let (version, outcome) = root.versioned_outcome();
        let inner = Arc::new(Inner {
            observed: Mutex::new(Observed { version, outcome }),
            root,
            arguments,
            options,
            notifier: PropertyNotifier::new(),
            disposal: Disposal::new(),
            root_changed: Mutex::new(None),
        });
        let subscription = inner
            .root
            .changed()
            .subscribe_weak(&inner, |inner, _| inner.sync());
        *inner.root_changed.lock() = Some(subscription);
        // The root may have changed before the subscription existed.
        inner.sync();
        debug!(expression = %inner.root.expr(), "active expression created");
        Ok(ActiveExpression { inner })
    }

    /// Current value; `None` while faulted.
    pub fn value(&self) -> Option<Value> {
        self.inner.observed.lock().outcome.as_ref().ok().cloned()
    }

    /// Current fault; `None` while a value is available.
    pub fn fault(&self) -> Option<Fault> {
        self.inner.observed.lock().outcome.as_ref().err().cloned()
    }

    pub fn outcome(&self) -> EvalResult {
        self.inner.observed.lock().outcome.clone()
    }

    /// Static type of the value.
    pub fn value_type(&self) -> Type {
        self.inner.root.ty()
    }

    pub fn arguments(&self) -> &[Value] {
        &self.inner.arguments
    }

    pub fn options(&self) -> &ActiveExpressionOptions {
        &self.inner.options
    }

    /// `Value` and `Fault` changing/changed signals.
    pub fn property_notifier(&self) -> &PropertyNotifier {
        &self.inner.notifier
    }

    /// Disposing/disposed signals and disposal state.
    pub fn disposal(&self) -> &Disposal {
        &self.inner.disposal
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposal.is_disposed()
    }

    /// Release this expression's reference to its nodes.
    ///
    /// Disposing twice is a no-op. A failure to dispose the last owned value
    /// is returned, but the expression is disposed regardless.
    pub fn dispose(&self) -> Result<(), DisposeError> {
        let mut released = Ok(());
        self.inner.disposal.dispose_with(|| {
            released = self.inner.release();
            Ok(true)
        })?;
        released
    }

    /// Asynchronous [`dispose`](Self::dispose); a cancelled `token` leaves
    /// the expression live.
    pub async fn dispose_async(&self, token: &CancellationToken) -> Result<(), DisposeError> {
        let mut released = Ok(());
        let slot = &mut released;
        let inner = &self.inner;
        inner
            .disposal
            .dispose_async_with(token, move || async move {
                token.check()?;
                *slot = inner.release();
                Ok(())
            })
            .await?;
        released
    }

    /// Whether both expressions share the same root node.
    pub fn ptr_eq(&self, other: &ActiveExpression) -> bool {
        Arc::ptr_eq(&self.inner.root, &other.inner.root)
    }

    /// Number of nodes alive across all active expressions.
    pub fn live_node_count() -> usize {
        registry::live_node_count()
    }
}

impl Drop for ActiveExpression {
    fn drop(&mut self) {
        if self.is_disposed() {
            return;
        }
        if let Err(error) = self.dispose() {
            warn!(%error, "active expression disposal failed on drop");
        }
    }
}

impl Dispose for ActiveExpression {
    fn dispose(&self) -> Result<(), DisposeError> {
        ActiveExpression::dispose(self)
    }
}

impl AsyncDispose for ActiveExpression {
    fn dispose_async<'a>(
        &'a self,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), DisposeError>> {
        Box::pin(ActiveExpression::dispose_async(self, token))
    }
}

impl PartialEq for ActiveExpression {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ActiveExpression {}

impl Hash for ActiveExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner.root).hash(state);
    }
}

impl fmt::Display for ActiveExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::write_node(f, &self.inner.root)
    }
}

impl fmt::Debug for ActiveExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveExpression")
            .field("expression", &format_args!("{}", self.inner.root.expr()))
            .field("outcome", &self.outcome())
            .finish()
    }
}

//! Disposal options for active expressions.
//!
//! Options are mutable until first used to create an active expression, then
//! frozen. Unfrozen options compare by identity; frozen options compare (and
//! hash) by content, so two expressions created with equivalent frozen
//! options share nodes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use actx_ir::{Expr, ExprHead, ExprKind};
use actx_value::Type;
use parking_lot::RwLock;
use rustc_hash::{FxHashSet, FxHasher};

use crate::error::OptionsError;

#[derive(Default, PartialEq, Eq)]
struct Settings {
    constructed_types: FxHashSet<Type>,
    expression_values: FxHashSet<ExprHead>,
    dispose_constructed_objects: bool,
    prefer_async_disposal: bool,
}

#[derive(Default)]
struct OptionsInner {
    frozen: AtomicBool,
    settings: RwLock<Settings>,
}

/// Which produced values an active expression disposes.
#[derive(Clone, Default)]
pub struct ActiveExpressionOptions {
    inner: Arc<OptionsInner>,
}

static DEFAULT: LazyLock<ActiveExpressionOptions> = LazyLock::new(|| {
    let options = ActiveExpressionOptions::new();
    options.freeze();
    options
});

fn head_of(expr: &Expr) -> Result<ExprHead, OptionsError> {
    expr.head().ok_or(OptionsError::NotSupported {
        shape: expr.kind().shape_name(),
    })
}

impl ActiveExpressionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared options used when none are given.
    pub fn default_shared() -> Self {
        DEFAULT.clone()
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Acquire)
    }

    pub(crate) fn freeze(&self) {
        let _settings = self.inner.settings.write();
        self.inner.frozen.store(true, Ordering::Release);
    }

    fn mutate<R>(&self, apply: impl FnOnce(&mut Settings) -> R) -> Result<R, OptionsError> {
        let mut settings = self.inner.settings.write();
        if self.is_frozen() {
            return Err(OptionsError::Frozen);
        }
        Ok(apply(&mut settings))
    }

    /// Dispose objects constructed by `new ty(..)`. Returns whether the
    /// registration was added.
    pub fn add_constructed_type_disposal(&self, ty: Type) -> Result<bool, OptionsError> {
        self.mutate(|s| s.constructed_types.insert(ty))
    }

    pub fn remove_constructed_type_disposal(&self, ty: Type) -> Result<bool, OptionsError> {
        self.mutate(|s| s.constructed_types.remove(&ty))
    }

    pub fn is_constructed_type_disposed(&self, ty: Type) -> bool {
        let settings = self.inner.settings.read();
        settings.dispose_constructed_objects || settings.constructed_types.contains(&ty)
    }

    /// Dispose values produced by the member at the root of `expr`.
    ///
    /// Member reads, index reads, calls, constructor calls and operators or
    /// conversions with a user-defined implementation are accepted; anything
    /// else is [`OptionsError::NotSupported`].
    pub fn add_expression_value_disposal(&self, expr: &Expr) -> Result<bool, OptionsError> {
        let head = head_of(expr)?;
        self.mutate(|s| s.expression_values.insert(head))
    }

    pub fn remove_expression_value_disposal(&self, expr: &Expr) -> Result<bool, OptionsError> {
        let head = head_of(expr)?;
        self.mutate(|s| s.expression_values.remove(&head))
    }

    pub fn is_expression_value_disposed(&self, expr: &Expr) -> Result<bool, OptionsError> {
        let head = head_of(expr)?;
        Ok(self.inner.settings.read().expression_values.contains(&head))
    }

    /// Dispose every object produced by a constructor call.
    pub fn set_dispose_constructed_objects(&self, value: bool) -> Result<(), OptionsError> {
        self.mutate(|s| s.dispose_constructed_objects = value)
    }

    pub fn dispose_constructed_objects(&self) -> bool {
        self.inner.settings.read().dispose_constructed_objects
    }

    /// Try asynchronous disposal before synchronous disposal.
    pub fn set_prefer_async_disposal(&self, value: bool) -> Result<(), OptionsError> {
        self.mutate(|s| s.prefer_async_disposal = value)
    }

    pub fn prefer_async_disposal(&self) -> bool {
        self.inner.settings.read().prefer_async_disposal
    }

    /// Whether values produced by `expr` are owned and disposed by its node.
    pub(crate) fn disposes_value_of(&self, expr: &Expr) -> bool {
        if let ExprKind::New { constructor, .. } = expr.kind() {
            if self.is_constructed_type_disposed(constructor.declaring()) {
                return true;
            }
        }
        expr.head()
            .is_some_and(|head| self.inner.settings.read().expression_values.contains(&head))
    }

    pub fn ptr_eq(&self, other: &ActiveExpressionOptions) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ActiveExpressionOptions {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if !(self.is_frozen() && other.is_frozen()) {
            return false;
        }
        *self.inner.settings.read() == *other.inner.settings.read()
    }
}

impl Eq for ActiveExpressionOptions {}

/// Order-independent hash of a set.
fn set_hash<T: Hash>(items: &FxHashSet<T>) -> u64 {
    items
        .iter()
        .map(|item| {
            let mut hasher = FxHasher::default();
            item.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0, u64::wrapping_add)
}

impl Hash for ActiveExpressionOptions {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if !self.is_frozen() {
            Arc::as_ptr(&self.inner).hash(state);
            return;
        }
        let settings = self.inner.settings.read();
        set_hash(&settings.constructed_types).hash(state);
        set_hash(&settings.expression_values).hash(state);
        settings.dispose_constructed_objects.hash(state);
        settings.prefer_async_disposal.hash(state);
    }
}

impl fmt::Debug for ActiveExpressionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.inner.settings.read();
        f.debug_struct("ActiveExpressionOptions")
            .field("frozen", &self.is_frozen())
            .field("constructed_types", &settings.constructed_types.len())
            .field("expression_values", &settings.expression_values.len())
            .field("dispose_constructed_objects", &settings.dispose_constructed_objects)
            .field("prefer_async_disposal", &settings.prefer_async_disposal)
            .finish()
    }
}

#[cfg(test)]
mod tests;

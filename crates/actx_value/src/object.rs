//! Runtime objects whose shape is only known at run time.
//!
//! The engine never inspects an object's fields. It reads members through
//! descriptors ([`Property`](crate::Property), [`Method`](crate::Method), ...)
//! and discovers optional capabilities (change notification, the three
//! disposal shapes) through the accessors on [`Object`].

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use actx_dispose::{AsyncDispose, Dispose, OverridableDispose};

use crate::{CollectionNotifier, Name, PropertyNotifier};

/// A runtime object.
pub trait Object: Send + Sync + 'static {
    fn type_name(&self) -> Name;

    /// Runtime type test used by type-is, type-as and down-casts.
    fn is_instance_of(&self, ty: Name) -> bool {
        ty == self.type_name()
    }

    fn as_any(&self) -> &dyn Any;

    /// Property changing/changed signals, if the object raises them.
    fn property_notifier(&self) -> Option<&PropertyNotifier> {
        None
    }

    /// Collection change signals, if the object is a change-aware collection.
    fn collection_notifier(&self) -> Option<&CollectionNotifier> {
        None
    }

    fn as_dispose(&self) -> Option<&dyn Dispose> {
        None
    }

    fn as_async_dispose(&self) -> Option<&dyn AsyncDispose> {
        None
    }

    fn as_overridable_dispose(&self) -> Option<&dyn OverridableDispose> {
        None
    }

    /// Text used when the object appears in diagnostic renderings.
    fn display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Shared handle to a runtime object; equality and hashing are by reference.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Object>);

impl ObjectRef {
    pub fn new<T: Object>(object: T) -> Self {
        ObjectRef(Arc::new(object))
    }

    pub fn from_arc<T: Object>(object: Arc<T>) -> Self {
        ObjectRef(object)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Address of the object, stable while any handle is alive.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Whether the object supports any of the disposal shapes.
    pub fn is_disposable(&self) -> bool {
        self.0.as_dispose().is_some()
            || self.0.as_async_dispose().is_some()
            || self.0.as_overridable_dispose().is_some()
    }
}

impl Deref for ObjectRef {
    type Target = dyn Object;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display(f)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} @ {:#x})", self.0.type_name(), self.addr())
    }
}

impl<T: Object> From<Arc<T>> for ObjectRef {
    fn from(object: Arc<T>) -> Self {
        ObjectRef::from_arc(object)
    }
}

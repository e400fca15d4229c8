//! Member descriptors.
//!
//! A descriptor pairs a member's identity ([`Signature`]) with a pre-resolved
//! callable. Identity drives structural equality and hashing of expression
//! trees; the callable is what evaluation invokes. Two descriptors with the
//! same signature are the same member.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::fault::{self, EvalResult, Fault};
use crate::{Name, Object, Type, Value};

/// Identity of a member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub declaring: Type,
    pub name: Name,
    pub params: Box<[Type]>,
    pub returns: Type,
}

impl Signature {
    fn new(declaring: Type, name: &str, params: Vec<Type>, returns: Type) -> Arc<Self> {
        Arc::new(Signature {
            declaring,
            name: Name::new(name),
            params: params.into_boxed_slice(),
            returns,
        })
    }
}

type GetFn = dyn Fn(&Value) -> EvalResult + Send + Sync;
type InstanceFn = dyn Fn(&Value, &[Value]) -> EvalResult + Send + Sync;
type StaticFn = dyn Fn(&[Value]) -> EvalResult + Send + Sync;

/// Downcast a receiver to the Rust type backing `T`.
fn receiver<'a, T: Object>(target: &'a Value, member: Name) -> Result<&'a T, Fault> {
    match target {
        Value::Null => Err(fault::null_reference(member)),
        Value::Object(object) => object
            .downcast_ref::<T>()
            .ok_or_else(|| fault::invalid_cast(object.type_name(), std::any::type_name::<T>())),
        other => Err(fault::invalid_cast(
            other.runtime_type().map_or_else(|| "null".to_owned(), |t| t.to_string()),
            std::any::type_name::<T>(),
        )),
    }
}

fn check_arity(sig: &Signature, args: &[Value]) -> Result<(), Fault> {
    if args.len() == sig.params.len() {
        Ok(())
    } else {
        Err(fault::argument(format!(
            "`{}` expects {} argument(s), got {}",
            sig.name,
            sig.params.len(),
            args.len()
        )))
    }
}

macro_rules! identity_by_signature {
    ($ty:ident) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.sig, &other.sig) || self.sig == other.sig
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.sig.hash(state);
            }
        }

        impl $ty {
            pub fn signature(&self) -> &Signature {
                &self.sig
            }

            pub fn declaring(&self) -> Type {
                self.sig.declaring
            }

            pub fn name(&self) -> Name {
                self.sig.name
            }

            pub fn params(&self) -> &[Type] {
                &self.sig.params
            }
        }
    };
}

/// A readable property, instance or static.
#[derive(Clone)]
pub struct Property {
    sig: Arc<Signature>,
    is_static: bool,
    get: Arc<GetFn>,
}

identity_by_signature!(Property);

impl Property {
    /// An instance property whose getter receives the raw receiver value.
    pub fn new(
        declaring: Type,
        name: &str,
        ty: Type,
        get: impl Fn(&Value) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Property {
            sig: Signature::new(declaring, name, Vec::new(), ty),
            is_static: false,
            get: Arc::new(get),
        }
    }

    /// An instance property of the object type `T`.
    pub fn of<T: Object>(
        declaring: Type,
        name: &str,
        ty: Type,
        get: impl Fn(&T) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        let member = Name::new(name);
        Self::new(declaring, name, ty, move |target| get(receiver::<T>(target, member)?))
    }

    pub fn new_static(
        declaring: Type,
        name: &str,
        ty: Type,
        get: impl Fn() -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Property {
            sig: Signature::new(declaring, name, Vec::new(), ty),
            is_static: true,
            get: Arc::new(move |_| get()),
        }
    }

    pub fn ty(&self) -> Type {
        self.sig.returns
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Read the property; `target` is ignored for static properties.
    pub fn get(&self, target: &Value) -> EvalResult {
        if !self.is_static && target.is_null() {
            return Err(fault::null_reference(self.sig.name));
        }
        (self.get)(target)
    }
}

/// An instance method.
#[derive(Clone)]
pub struct Method {
    sig: Arc<Signature>,
    call: Arc<InstanceFn>,
}

identity_by_signature!(Method);

impl Method {
    pub fn new(
        declaring: Type,
        name: &str,
        params: Vec<Type>,
        returns: Type,
        call: impl Fn(&Value, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Method {
            sig: Signature::new(declaring, name, params, returns),
            call: Arc::new(call),
        }
    }

    pub fn of<T: Object>(
        declaring: Type,
        name: &str,
        params: Vec<Type>,
        returns: Type,
        call: impl Fn(&T, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        let member = Name::new(name);
        Self::new(declaring, name, params, returns, move |target, args| {
            call(receiver::<T>(target, member)?, args)
        })
    }

    pub fn returns(&self) -> Type {
        self.sig.returns
    }

    pub fn invoke(&self, target: &Value, args: &[Value]) -> EvalResult {
        if target.is_null() {
            return Err(fault::null_reference(self.sig.name));
        }
        check_arity(&self.sig, args)?;
        (self.call)(target, args)
    }
}

/// A static method. Also describes user-defined operators and conversions.
#[derive(Clone)]
pub struct Function {
    sig: Arc<Signature>,
    call: Arc<StaticFn>,
}

identity_by_signature!(Function);

impl Function {
    pub fn new(
        declaring: Type,
        name: &str,
        params: Vec<Type>,
        returns: Type,
        call: impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Function {
            sig: Signature::new(declaring, name, params, returns),
            call: Arc::new(call),
        }
    }

    pub fn returns(&self) -> Type {
        self.sig.returns
    }

    pub fn invoke(&self, args: &[Value]) -> EvalResult {
        check_arity(&self.sig, args)?;
        (self.call)(args)
    }
}

/// An indexed property (`target[args]`).
#[derive(Clone)]
pub struct Indexer {
    sig: Arc<Signature>,
    call: Arc<InstanceFn>,
}

identity_by_signature!(Indexer);

impl Indexer {
    /// Name used for indexers unless one is given.
    pub const DEFAULT_NAME: &'static str = "Item";

    pub fn new(
        declaring: Type,
        params: Vec<Type>,
        returns: Type,
        get: impl Fn(&Value, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Self::named(declaring, Self::DEFAULT_NAME, params, returns, get)
    }

    pub fn named(
        declaring: Type,
        name: &str,
        params: Vec<Type>,
        returns: Type,
        get: impl Fn(&Value, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Indexer {
            sig: Signature::new(declaring, name, params, returns),
            call: Arc::new(get),
        }
    }

    pub fn of<T: Object>(
        declaring: Type,
        params: Vec<Type>,
        returns: Type,
        get: impl Fn(&T, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        let member = Name::new(Self::DEFAULT_NAME);
        Self::new(declaring, params, returns, move |target, args| {
            get(receiver::<T>(target, member)?, args)
        })
    }

    pub fn returns(&self) -> Type {
        self.sig.returns
    }

    /// Property name under which objects announce indexed changes, e.g. `Item[]`.
    pub fn change_name(&self) -> Name {
        Name::new(&format!("{}[]", self.sig.name))
    }

    pub fn get(&self, target: &Value, args: &[Value]) -> EvalResult {
        if target.is_null() {
            return Err(fault::null_reference(format_args!("{}[]", self.sig.name)));
        }
        check_arity(&self.sig, args)?;
        (self.call)(target, args)
    }
}

/// A constructor of `declaring`.
#[derive(Clone)]
pub struct Constructor {
    sig: Arc<Signature>,
    call: Arc<StaticFn>,
}

identity_by_signature!(Constructor);

impl Constructor {
    pub fn new(
        declaring: Type,
        params: Vec<Type>,
        construct: impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        Constructor {
            sig: Signature::new(declaring, ".ctor", params, declaring),
            call: Arc::new(construct),
        }
    }

    pub fn construct(&self, args: &[Value]) -> EvalResult {
        check_arity(&self.sig, args)?;
        (self.call)(args)
    }
}

macro_rules! debug_by_signature {
    ($($ty:ident),*) => {$(
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}.{}", stringify!($ty), self.sig.declaring, self.sig.name)?;
                if !self.sig.params.is_empty() {
                    f.write_str("(")?;
                    for (i, param) in self.sig.params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{param}")?;
                    }
                    f.write_str(")")?;
                }
                write!(f, ": {})", self.sig.returns)
            }
        }
    )*};
}

debug_by_signature!(Property, Method, Function, Indexer, Constructor);

#[cfg(test)]
mod tests;

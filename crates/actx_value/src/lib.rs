//! Runtime values and the object model active expressions evaluate over.
//!
//! - [`Value`]: primitives, strings and shared references to [`Object`]s
//! - [`Type`]: static types used for operator resolution and type checks
//! - [`Property`], [`Method`], [`Function`], [`Indexer`], [`Constructor`]:
//!   member descriptors with structural identity and pre-resolved callables
//! - [`PropertyNotifier`], [`CollectionNotifier`]: the change-notification
//!   contract objects may implement
//! - [`Fault`]: errors captured as data
//! - [`Name`]: interned identifiers

pub mod builtins;
pub mod fault;
mod interner;
mod member;
mod name;
mod notify;
mod object;
mod ty;
mod value;

pub use actx_dispose::{Event, Subscription};
pub use fault::{EvalResult, Fault, FaultKind};
pub use member::{Constructor, Function, Indexer, Method, Property, Signature};
pub use name::Name;
pub use notify::{CollectionChange, CollectionNotifier, PropertyChange, PropertyNotifier};
pub use object::{Object, ObjectRef};
pub use ty::{Primitive, Type};
pub use value::Value;

//! Static types of expressions.

use std::fmt;

use crate::Name;

/// Value types with a fixed runtime representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    Byte,
    Int,
    Long,
    Double,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::Byte => "byte",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Double => "double",
        }
    }

    /// Participates in numeric conversions.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Primitive::Bool)
    }
}

/// The static type of an expression.
///
/// Only `Primitive` rejects `null`; `Nullable` lifts a primitive, and
/// `String`, `Object` and `Any` are reference types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(Primitive),
    Nullable(Primitive),
    String,
    /// A runtime object type, identified by its type name.
    Object(Name),
    /// Accepts any value, boxed.
    Any,
}

impl Type {
    pub const BOOL: Type = Type::Primitive(Primitive::Bool);
    pub const CHAR: Type = Type::Primitive(Primitive::Char);
    pub const BYTE: Type = Type::Primitive(Primitive::Byte);
    pub const INT: Type = Type::Primitive(Primitive::Int);
    pub const LONG: Type = Type::Primitive(Primitive::Long);
    pub const DOUBLE: Type = Type::Primitive(Primitive::Double);

    pub fn object(name: &str) -> Type {
        Type::Object(Name::new(name))
    }

    /// `T?` for a primitive `T`; reference types are returned unchanged.
    #[must_use]
    pub fn nullable(self) -> Type {
        match self {
            Type::Primitive(p) => Type::Nullable(p),
            other => other,
        }
    }

    /// `T` for `T?`; every other type is returned unchanged.
    #[must_use]
    pub fn underlying(self) -> Type {
        match self {
            Type::Nullable(p) => Type::Primitive(p),
            other => other,
        }
    }

    /// The primitive behind `T` or `T?`.
    pub fn primitive(self) -> Option<Primitive> {
        match self {
            Type::Primitive(p) | Type::Nullable(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_nullable_primitive(self) -> bool {
        matches!(self, Type::Nullable(_))
    }

    pub fn is_reference(self) -> bool {
        matches!(self, Type::String | Type::Object(_) | Type::Any)
    }

    /// Whether a `null` value inhabits this type.
    pub fn admits_null(self) -> bool {
        !matches!(self, Type::Primitive(_))
    }

    /// Whether a value statically typed `from` can be stored in `self`
    /// without an explicit conversion.
    pub fn is_assignable_from(self, from: Type) -> bool {
        match (self, from) {
            _ if self == from => true,
            (Type::Any, _) => true,
            (Type::Nullable(to), Type::Primitive(p)) => to == p,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => f.write_str(p.name()),
            Type::Nullable(p) => write!(f, "{}?", p.name()),
            Type::String => f.write_str("string"),
            Type::Object(name) => write!(f, "{name}"),
            Type::Any => f.write_str("object"),
        }
    }
}

impl From<Primitive> for Type {
    fn from(p: Primitive) -> Self {
        Type::Primitive(p)
    }
}

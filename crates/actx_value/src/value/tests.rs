use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pretty_assertions::assert_eq;

use super::*;
use crate::Name;

struct Widget;

impl Object for Widget {
    fn type_name(&self) -> Name {
        Name::new("Widget")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn primitives_compare_by_value() {
    assert_eq!(Value::Int(3), Value::from(3));
    assert_ne!(Value::Int(3), Value::Long(3));
    assert_eq!(Value::from("abc"), Value::string(String::from("abc")));
}

#[test]
fn doubles_follow_host_equality() {
    assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
    assert_eq!(Value::Double(0.0), Value::Double(-0.0));
    assert_eq!(hash_of(&Value::Double(0.0)), hash_of(&Value::Double(-0.0)));
    assert!(!Value::Double(0.0).same_as(&Value::Double(-0.0)));
}

#[test]
fn identical_tells_signed_zeros_apart() {
    assert!(!Value::Double(0.0).identical(&Value::Double(-0.0)));
    assert!(Value::Double(-0.0).identical(&Value::Double(-0.0)));
    assert!(Value::Double(f64::NAN).identical(&Value::Double(-f64::NAN)));
    assert!(Value::from("x").identical(&Value::from("x")));
    assert!(!Value::Int(0).identical(&Value::Double(0.0)));
}

#[test]
fn objects_compare_by_reference() {
    let a = ObjectRef::new(Widget);
    let b = ObjectRef::new(Widget);
    assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
    assert_ne!(Value::Object(a.clone()), Value::Object(b));
    assert_eq!(hash_of(&Value::Object(a.clone())), hash_of(&Value::Object(a)));
}

#[test]
fn strings_same_as_is_by_allocation() {
    let a = Value::from("x");
    let b = Value::from("x");
    assert_eq!(a, b);
    assert!(!a.same_as(&b));
    assert!(a.same_as(&a.clone()));
}

#[test]
fn instance_tests() {
    let widget = Value::object(Widget);
    assert!(widget.is_instance_of(Type::object("Widget")));
    assert!(widget.is_instance_of(Type::Any));
    assert!(!widget.is_instance_of(Type::object("Gadget")));
    assert!(Value::Int(1).is_instance_of(Type::INT.nullable()));
    assert!(!Value::Null.is_instance_of(Type::Any));
    assert!(Value::Null.fits(Type::String));
    assert!(!Value::Null.fits(Type::INT));
}

#[test]
fn display_quotes_text() {
    assert_eq!(Value::from("X").to_string(), "\"X\"");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Char('c').to_string(), "'c'");
    assert_eq!(Value::Double(2.0).to_string(), "2");
    assert_eq!(Value::object(Widget).to_string(), "Widget");
}

#[test]
fn options_map_to_null() {
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some(4)), Value::Int(4));
}

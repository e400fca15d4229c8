use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pretty_assertions::assert_eq;

use super::*;
use crate::FaultKind;

struct Counter {
    count: i32,
}

impl Object for Counter {
    fn type_name(&self) -> Name {
        Name::new("Counter")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn counter_type() -> Type {
    Type::object("Counter")
}

fn count_property() -> Property {
    Property::of::<Counter>(counter_type(), "Count", Type::INT, |c| Ok(Value::Int(c.count)))
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn typed_property_reads_receiver() {
    let target = Value::object(Counter { count: 5 });
    assert_eq!(count_property().get(&target).ok(), Some(Value::Int(5)));
}

#[test]
fn null_receiver_faults() {
    let fault = count_property().get(&Value::Null).err();
    assert_eq!(fault.map(|f| f.kind()), Some(FaultKind::NullReference));
}

#[test]
fn wrong_receiver_faults_with_invalid_cast() {
    let fault = count_property().get(&Value::Int(1)).err();
    assert_eq!(fault.map(|f| f.kind()), Some(FaultKind::InvalidCast));
}

#[test]
fn identity_is_signature() {
    let a = count_property();
    let b = count_property();
    let other = Property::of::<Counter>(counter_type(), "Total", Type::INT, |c| {
        Ok(Value::Int(c.count))
    });
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, other);
}

#[test]
fn overloads_differ_by_params() {
    let one = Function::new(Type::Any, "Max", vec![Type::INT, Type::INT], Type::INT, |a| {
        Ok(a[0].clone())
    });
    let other = Function::new(Type::Any, "Max", vec![Type::LONG, Type::LONG], Type::LONG, |a| {
        Ok(a[0].clone())
    });
    assert_ne!(one, other);
}

#[test]
fn arity_mismatch_is_an_argument_fault() {
    let add = Function::new(Type::Any, "Add", vec![Type::INT, Type::INT], Type::INT, |a| {
        Ok(Value::Int(a[0].as_int().unwrap_or(0) + a[1].as_int().unwrap_or(0)))
    });
    assert_eq!(add.invoke(&[Value::Int(1), Value::Int(2)]).ok(), Some(Value::Int(3)));
    assert_eq!(
        add.invoke(&[Value::Int(1)]).err().map(|f| f.kind()),
        Some(FaultKind::Argument)
    );
}

#[test]
fn static_property_ignores_target() {
    let answer = Property::new_static(Type::Any, "Answer", Type::INT, || Ok(Value::Int(42)));
    assert!(answer.is_static());
    assert_eq!(answer.get(&Value::Null).ok(), Some(Value::Int(42)));
}

#[test]
fn indexer_change_name() {
    let indexer = Indexer::new(counter_type(), vec![Type::INT], Type::INT, |_, _| {
        Ok(Value::Int(0))
    });
    assert_eq!(indexer.change_name().as_str(), "Item[]");
}

#[test]
fn debug_shows_signature() {
    let method = Method::new(
        Type::String,
        "Substring",
        vec![Type::INT, Type::INT],
        Type::String,
        |_, _| Ok(Value::Null),
    );
    assert_eq!(format!("{method:?}"), "Method(string.Substring(int, int): string)");
}

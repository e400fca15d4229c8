#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::hash::{Hash, Hasher};

use actx_ir::Expr;
use actx_value::{builtins, Type};
use pretty_assertions::assert_eq;
use rustc_hash::FxHasher;

use super::ActiveExpressionOptions;
use crate::error::OptionsError;

fn hash_of(options: &ActiveExpressionOptions) -> u64 {
    let mut hasher = FxHasher::default();
    options.hash(&mut hasher);
    hasher.finish()
}

fn substring_call() -> Expr {
    Expr::call(
        Expr::constant("abc"),
        builtins::string_substring(),
        vec![Expr::constant(0), Expr::constant(1)],
    )
}

#[test]
fn unfrozen_options_compare_by_identity() {
    let a = ActiveExpressionOptions::new();
    let b = ActiveExpressionOptions::new();
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}

#[test]
fn frozen_options_compare_by_content() {
    let a = ActiveExpressionOptions::new();
    let b = ActiveExpressionOptions::new();
    a.add_constructed_type_disposal(Type::object("Widget")).unwrap();
    a.add_constructed_type_disposal(Type::object("Gadget")).unwrap();
    b.add_constructed_type_disposal(Type::object("Gadget")).unwrap();
    b.add_constructed_type_disposal(Type::object("Widget")).unwrap();
    a.freeze();
    b.freeze();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn frozen_options_with_different_content_differ() {
    let a = ActiveExpressionOptions::new();
    let b = ActiveExpressionOptions::new();
    b.set_prefer_async_disposal(true).unwrap();
    a.freeze();
    b.freeze();
    assert_ne!(a, b);
}

#[test]
fn mutation_after_freeze_fails() {
    let options = ActiveExpressionOptions::new();
    options.freeze();
    assert_eq!(
        options.add_constructed_type_disposal(Type::object("Widget")),
        Err(OptionsError::Frozen)
    );
    assert_eq!(
        options.set_dispose_constructed_objects(true),
        Err(OptionsError::Frozen)
    );
    assert!(options.is_frozen());
}

#[test]
fn expression_value_registration_is_keyed_by_member() {
    let options = ActiveExpressionOptions::new();
    assert_eq!(options.add_expression_value_disposal(&substring_call()), Ok(true));
    assert_eq!(options.add_expression_value_disposal(&substring_call()), Ok(false));

    // A call to the same method with other operands is the same registration.
    let other = Expr::call(
        Expr::constant("xyz"),
        builtins::string_substring(),
        vec![Expr::constant(1), Expr::constant(2)],
    );
    assert_eq!(options.is_expression_value_disposed(&other), Ok(true));
    assert!(options.disposes_value_of(&other));

    assert_eq!(options.remove_expression_value_disposal(&other), Ok(true));
    assert_eq!(options.is_expression_value_disposed(&substring_call()), Ok(false));
}

#[test]
fn unsupported_shapes_are_rejected() {
    let options = ActiveExpressionOptions::new();
    let sum = Expr::add(Expr::constant(1), Expr::constant(2));
    assert_eq!(
        options.add_expression_value_disposal(&sum),
        Err(OptionsError::NotSupported { shape: "binary" })
    );
}

#[test]
fn default_options_are_shared_and_frozen() {
    let a = ActiveExpressionOptions::default_shared();
    let b = ActiveExpressionOptions::default_shared();
    assert!(a.ptr_eq(&b));
    assert!(a.is_frozen());
}

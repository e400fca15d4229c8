#![allow(clippy::unwrap_used, clippy::expect_used)]

use actx_ir::{BinaryOp, Expr, Param};
use actx_value::{builtins, Name, Type, Value};
use pretty_assertions::assert_eq;

use super::{check, check_tree};
use crate::error::{ActiveExprError, ResolveError};

#[test]
fn constants_take_their_declared_type() {
    assert_eq!(check(&Expr::constant(1)).unwrap(), Type::INT);
    assert_eq!(
        check(&Expr::constant_of(Value::Null, Type::INT.nullable())).unwrap(),
        Type::INT.nullable()
    );
    assert_eq!(
        check(&Expr::constant_of(Value::Null, Type::INT)).unwrap_err(),
        ActiveExprError::ConstantType { ty: Type::INT }
    );
}

#[test]
fn unbound_parameters_are_rejected() {
    let x = Param::new("x", Type::INT);
    assert_eq!(
        check(&Expr::add(Expr::parameter(&x), Expr::constant(1))).unwrap_err(),
        ActiveExprError::UnboundParameter { name: Name::new("x") }
    );
}

#[test]
fn operators_resolve_through_the_catalog() {
    let expr = Expr::binary(BinaryOp::LessThan, Expr::constant(1.5), Expr::constant(2.0));
    assert_eq!(check(&expr).unwrap(), Type::BOOL);
    let expr = Expr::add(Expr::constant(1), Expr::constant("a"));
    assert_eq!(
        check(&expr).unwrap_err(),
        ActiveExprError::Resolve(ResolveError::Binary {
            op: BinaryOp::Add,
            left: Type::INT,
            right: Type::String,
        })
    );
}

#[test]
fn untaken_branches_are_still_checked() {
    let bad = Expr::add(Expr::constant(true), Expr::constant(1));
    let expr = Expr::condition(Expr::constant(true), Expr::constant(1), bad);
    assert!(matches!(check(&expr), Err(ActiveExprError::Resolve(_))));
}

#[test]
fn coalesce_unwraps_nullable_primitives() {
    let left = Expr::constant_of(Value::Null, Type::INT.nullable());
    assert_eq!(check(&Expr::coalesce(left.clone(), Expr::constant(0))).unwrap(), Type::INT);
    assert!(check(&Expr::coalesce(Expr::constant(1), Expr::constant(0))).is_err());
}

#[test]
fn member_targets_must_match_the_declaring_type() {
    let length = Expr::property(Expr::constant(3), builtins::string_length());
    assert!(matches!(
        check(&length),
        Err(ActiveExprError::TypeMismatch { .. })
    ));
    let length = Expr::property(Expr::constant("abc"), builtins::string_length());
    assert_eq!(check(&length).unwrap(), Type::INT);
}

#[test]
fn call_arity_is_checked() {
    let call = Expr::call(Expr::constant("abc"), builtins::string_substring(), vec![Expr::constant(1)]);
    assert!(matches!(
        check(&call),
        Err(ActiveExprError::ArgumentCount { expected: 2, found: 1, .. })
    ));
}

#[test]
fn statement_shapes_are_not_supported() {
    let block = Expr::block(vec![Expr::constant(1)]);
    assert_eq!(
        check(&block).unwrap_err(),
        ActiveExprError::NotSupported { shape: "block" }
    );
}

#[test]
fn shared_subtrees_are_checked_once() {
    let leaf = Expr::add(Expr::constant(1), Expr::constant(2));
    let mut tree = leaf.clone();
    for _ in 0..200 {
        tree = Expr::add(tree.clone(), tree);
    }
    let typing = check_tree(&tree).unwrap();
    // Two constants, the leaf, and one node per level.
    assert_eq!(typing.types.len(), 203);
    assert_eq!(typing.type_of(&tree).unwrap(), Type::INT);
    assert_eq!(typing.type_of(&leaf).unwrap(), Type::INT);
    assert_eq!(typing.type_of(&Expr::constant(2.5)).unwrap(), Type::DOUBLE);
}

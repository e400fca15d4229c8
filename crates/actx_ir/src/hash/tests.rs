use actx_value::{builtins, Function, Type, Value};
use pretty_assertions::assert_eq;

use super::*;
use crate::{BinaryOp, Param};

fn length_of(param: &Param) -> Expr {
    Expr::property(Expr::parameter(param), builtins::string_length())
}

#[test]
fn same_tree_same_hash() {
    let a = Expr::add(Expr::constant(1), Expr::constant(2));
    let b = Expr::add(Expr::constant(1), Expr::constant(2));
    assert_eq!(structural_hash(&a), structural_hash(&b));
}

#[test]
fn constant_value_changes_hash() {
    let a = Expr::add(Expr::constant(1), Expr::constant(2));
    let b = Expr::add(Expr::constant(1), Expr::constant(3));
    assert_ne!(structural_hash(&a), structural_hash(&b));
}

#[test]
fn signed_zero_changes_hash() {
    let a = Expr::constant(0.0);
    let b = Expr::constant(-0.0);
    assert_ne!(structural_hash(&a), structural_hash(&b));
    assert_eq!(structural_hash(&b), structural_hash(&Expr::constant(-0.0)));
}

#[test]
fn constant_type_changes_hash() {
    let a = Expr::constant_of(1, Type::INT);
    let b = Expr::constant_of(1, Type::INT.nullable());
    assert_ne!(structural_hash(&a), structural_hash(&b));
}

#[test]
fn operand_order_changes_hash() {
    let a = Expr::subtract(Expr::constant(1), Expr::constant(2));
    let b = Expr::subtract(Expr::constant(2), Expr::constant(1));
    assert_ne!(structural_hash(&a), structural_hash(&b));
}

#[test]
fn operator_changes_hash() {
    let a = Expr::binary(BinaryOp::Add, Expr::constant(1), Expr::constant(2));
    let b = Expr::binary(BinaryOp::AddChecked, Expr::constant(1), Expr::constant(2));
    assert_ne!(structural_hash(&a), structural_hash(&b));
}

#[test]
fn null_constants_hash_by_type() {
    assert_eq!(
        structural_hash(&Expr::null(Type::String)),
        structural_hash(&Expr::constant_of(Value::Null, Type::String))
    );
    assert_ne!(
        structural_hash(&Expr::null(Type::String)),
        structural_hash(&Expr::null(Type::Any))
    );
}

#[test]
fn alpha_renamed_lambdas_hash_equal() {
    let x = Param::new("x", Type::String);
    let y = Param::new("y", Type::String);
    let a = Lambda::new(vec![x.clone()], length_of(&x));
    let b = Lambda::new(vec![y.clone()], length_of(&y));
    assert_eq!(a.structural_hash(), b.structural_hash());
}

#[test]
fn parameter_position_matters() {
    let x = Param::new("x", Type::INT);
    let y = Param::new("y", Type::INT);
    let a = Lambda::new(
        vec![x.clone(), y.clone()],
        Expr::subtract(Expr::parameter(&x), Expr::parameter(&y)),
    );
    let b = Lambda::new(
        vec![x.clone(), y.clone()],
        Expr::subtract(Expr::parameter(&y), Expr::parameter(&x)),
    );
    assert_ne!(a.structural_hash(), b.structural_hash());
}

#[test]
fn user_defined_operator_is_part_of_hash() {
    let plus = Function::new(
        Type::INT,
        "op_Addition",
        vec![Type::INT, Type::INT],
        Type::INT,
        |args| Ok(args[0].clone()),
    );
    let builtin = Expr::add(Expr::constant(1), Expr::constant(2));
    let custom = Expr::binary_with(BinaryOp::Add, Expr::constant(1), Expr::constant(2), plus);
    assert_ne!(structural_hash(&builtin), structural_hash(&custom));
}

#[test]
fn long_chain_hashes_consistently() {
    let mut expr = Expr::constant(0);
    for i in 0..2_000 {
        expr = Expr::add(expr, Expr::constant(i));
    }
    assert_eq!(structural_hash(&expr), structural_hash(&expr.clone()));
}

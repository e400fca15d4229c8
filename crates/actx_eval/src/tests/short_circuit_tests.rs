//! Lazily activated operands of `&&`, `||`, `?:` and `??`.

use actx_ir::Expr;
use actx_value::{Type, Value};
use pretty_assertions::assert_eq;

use super::fixtures::{Cell, TestPerson};
use crate::ActiveExpression;

fn person_name(person: &std::sync::Arc<TestPerson>) -> Expr {
    Expr::property(Expr::constant(Value::from(person.clone())), TestPerson::name_property())
}

fn is_positive(cell: &std::sync::Arc<Cell>) -> Expr {
    Expr::greater_than(cell.read(), Expr::constant(0))
}

#[test]
fn and_also_skips_the_right_operand_while_left_is_false() {
    let gate = Cell::new(0);
    let person = TestPerson::new("Ann");
    let right = Expr::equal(person_name(&person), Expr::constant("Ann"));
    let body = Expr::and_also(is_positive(&gate), right);
    let expr = ActiveExpression::create_closure(&body, None).unwrap();

    assert_eq!(expr.value(), Some(Value::Bool(false)));
    assert_eq!(person.reads(), 0);
    assert_eq!(person.observers(), 0);

    gate.set(1);
    assert_eq!(expr.value(), Some(Value::Bool(true)));
    assert_eq!(person.reads(), 1);

    // Deselecting the right operand releases it.
    gate.set(0);
    assert_eq!(expr.value(), Some(Value::Bool(false)));
    assert_eq!(person.observers(), 0);
    person.set_name(Some("Bob"));
    assert_eq!(person.reads(), 1);
}

#[test]
fn or_else_short_circuits_on_true() {
    let gate = Cell::new(1);
    let person = TestPerson::new("Ann");
    let right = Expr::equal(person_name(&person), Expr::constant("Zed"));
    let body = Expr::or_else(is_positive(&gate), right);
    let expr = ActiveExpression::create_closure(&body, None).unwrap();

    assert_eq!(expr.value(), Some(Value::Bool(true)));
    assert_eq!(person.reads(), 0);

    gate.set(-1);
    assert_eq!(expr.value(), Some(Value::Bool(false)));
    person.set_name(Some("Zed"));
    assert_eq!(expr.value(), Some(Value::Bool(true)));
}

#[test]
fn conditional_activates_only_the_taken_branch() {
    let gate = Cell::new(1);
    let yes = TestPerson::new("Yes");
    let no = TestPerson::new("No");
    let body = Expr::condition(is_positive(&gate), person_name(&yes), person_name(&no));
    let expr = ActiveExpression::create_closure(&body, None).unwrap();

    assert_eq!(expr.value(), Some(Value::string("Yes")));
    assert_eq!(no.reads(), 0);

    gate.set(0);
    assert_eq!(expr.value(), Some(Value::string("No")));
    assert_eq!(yes.observers(), 0);
    assert_eq!(no.observers(), 1);
}

#[test]
fn conditional_with_faulted_test_faults() {
    let divisor = Cell::new(0);
    let test = Expr::greater_than(Expr::divide(Expr::constant(1), divisor.read()), Expr::constant(0));
    let body = Expr::condition(test, Expr::constant(1), Expr::constant(2));
    let expr = ActiveExpression::create_closure(&body, None).unwrap();
    assert!(expr.fault().is_some());

    divisor.set(1);
    assert_eq!(expr.value(), Some(Value::Int(1)));
}

#[test]
fn coalesce_activates_the_fallback_only_for_null() {
    let person = TestPerson::new("Ann");
    let fallback = TestPerson::new("Fallback");
    let body = Expr::coalesce(person_name(&person), person_name(&fallback));
    let expr = ActiveExpression::create_closure(&body, None).unwrap();

    assert_eq!(expr.value(), Some(Value::string("Ann")));
    assert_eq!(fallback.reads(), 0);

    person.set_name(None);
    assert_eq!(expr.value(), Some(Value::string("Fallback")));

    person.set_name(Some("Back"));
    assert_eq!(expr.value(), Some(Value::string("Back")));
    assert_eq!(fallback.observers(), 0);
}

#[test]
fn coalesce_unwraps_nullable_primitives() {
    let cell = Cell::new(3);
    let nullable = Expr::condition(
        Expr::greater_than(cell.read(), Expr::constant(0)),
        Expr::convert(cell.read(), Type::INT.nullable()),
        Expr::null(Type::INT.nullable()),
    );
    let body = Expr::coalesce(nullable, Expr::constant(-1));
    let expr = ActiveExpression::create_closure(&body, None).unwrap();
    assert_eq!(expr.value_type(), Type::INT);
    assert_eq!(expr.value(), Some(Value::Int(3)));

    cell.set(0);
    assert_eq!(expr.value(), Some(Value::Int(-1)));
}

//! Index reads over change-aware collections.

use actx_ir::Expr;
use actx_value::{FaultKind, Value};
use pretty_assertions::assert_eq;

use super::fixtures::IntList;
use crate::ActiveExpression;

#[test]
fn index_reads_follow_collection_changes() {
    let list = IntList::new(&[1, 2, 3]);
    let body = Expr::add(list.at(0), list.at(2));
    let expr = ActiveExpression::create_closure(&body, None).unwrap();
    assert_eq!(expr.value(), Some(Value::Int(4)));

    list.replace(2, 10);
    assert_eq!(expr.value(), Some(Value::Int(11)));
}

#[test]
fn out_of_range_reads_fault_until_the_item_exists() {
    let list = IntList::new(&[1]);
    let expr = ActiveExpression::create_closure(&list.at(1), None).unwrap();
    assert_eq!(expr.fault().unwrap().kind(), FaultKind::IndexOutOfRange);

    list.push(5);
    assert_eq!(expr.value(), Some(Value::Int(5)));
}

#[test]
fn item_property_changes_refresh_index_reads() {
    let list = IntList::new(&[1, 2]);
    let expr = ActiveExpression::create_closure(&list.at(1), None).unwrap();
    let reads = list.reads();

    list.replace_announcing_item(1, 7);
    assert_eq!(expr.value(), Some(Value::Int(7)));
    assert_eq!(list.reads(), reads + 1);
}

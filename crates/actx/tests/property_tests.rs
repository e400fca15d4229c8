//! Property-based tests for incremental evaluation.
//!
//! Random integer expression trees over a few observable cells are
//! activated, then the cells are mutated at random. After every mutation
//! the active value (or fault) must equal what a direct evaluation of the
//! same tree produces.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use std::any::Any;
use std::sync::Arc;

use actx::{
    ActiveExpression, Expr, FaultKind, Name, Object, Property, PropertyNotifier, Type, Value,
};
use parking_lot::Mutex;
use proptest::prelude::*;

const CELLS: usize = 3;

struct Cell {
    value: Mutex<i32>,
    notifier: PropertyNotifier,
}

impl Cell {
    fn new(value: i32) -> Arc<Cell> {
        Arc::new(Cell {
            value: Mutex::new(value),
            notifier: PropertyNotifier::new(),
        })
    }

    fn value_property() -> Property {
        Property::of::<Cell>(Type::object("Cell"), "Value", Type::INT, |cell| {
            Ok(Value::Int(*cell.value.lock()))
        })
    }

    fn get(&self) -> i32 {
        *self.value.lock()
    }

    fn set(&self, value: i32) {
        self.notifier.change("Value", || *self.value.lock() = value);
    }

    fn observers(&self) -> usize {
        self.notifier.changed().handler_count()
    }
}

impl Object for Cell {
    fn type_name(&self) -> Name {
        Name::new("Cell")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn property_notifier(&self) -> Option<&PropertyNotifier> {
        Some(&self.notifier)
    }
}

// -- Expression Model --

#[derive(Clone, Debug)]
enum Tree {
    Cell(usize),
    Literal(i32),
    Add(Box<Tree>, Box<Tree>),
    Subtract(Box<Tree>, Box<Tree>),
    Multiply(Box<Tree>, Box<Tree>),
    Divide(Box<Tree>, Box<Tree>),
    Negate(Box<Tree>),
    /// `left < right ? if_true : if_false`
    Choose {
        left: Box<Tree>,
        right: Box<Tree>,
        if_true: Box<Tree>,
        if_false: Box<Tree>,
    },
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = prop_oneof![
        (0..CELLS).prop_map(Tree::Cell),
        (-5..=5i32).prop_map(Tree::Literal),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Tree::Add(a.into(), b.into())),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Tree::Subtract(a.into(), b.into())),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Tree::Multiply(a.into(), b.into())),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Tree::Divide(a.into(), b.into())),
            inner.clone().prop_map(|a| Tree::Negate(a.into())),
            (inner.clone(), inner.clone(), inner.clone(), inner).prop_map(
                |(left, right, if_true, if_false)| Tree::Choose {
                    left: left.into(),
                    right: right.into(),
                    if_true: if_true.into(),
                    if_false: if_false.into(),
                }
            ),
        ]
    })
}

fn build(tree: &Tree, cells: &[Arc<Cell>]) -> Expr {
    match tree {
        Tree::Cell(i) => Expr::property(
            Expr::constant(Value::from(Arc::clone(&cells[*i]))),
            Cell::value_property(),
        ),
        Tree::Literal(n) => Expr::constant(*n),
        Tree::Add(a, b) => Expr::add(build(a, cells), build(b, cells)),
        Tree::Subtract(a, b) => Expr::subtract(build(a, cells), build(b, cells)),
        Tree::Multiply(a, b) => Expr::multiply(build(a, cells), build(b, cells)),
        Tree::Divide(a, b) => Expr::divide(build(a, cells), build(b, cells)),
        Tree::Negate(a) => Expr::negate(build(a, cells)),
        Tree::Choose {
            left,
            right,
            if_true,
            if_false,
        } => Expr::condition(
            Expr::less_than(build(left, cells), build(right, cells)),
            build(if_true, cells),
            build(if_false, cells),
        ),
    }
}

/// Direct, non-incremental evaluation of `tree`.
fn evaluate(tree: &Tree, cells: &[Arc<Cell>]) -> Result<i32, FaultKind> {
    match tree {
        Tree::Cell(i) => Ok(cells[*i].get()),
        Tree::Literal(n) => Ok(*n),
        Tree::Add(a, b) => Ok(evaluate(a, cells)?.wrapping_add(evaluate(b, cells)?)),
        Tree::Subtract(a, b) => Ok(evaluate(a, cells)?.wrapping_sub(evaluate(b, cells)?)),
        Tree::Multiply(a, b) => Ok(evaluate(a, cells)?.wrapping_mul(evaluate(b, cells)?)),
        Tree::Divide(a, b) => {
            let (a, b) = (evaluate(a, cells)?, evaluate(b, cells)?);
            if b == 0 {
                return Err(FaultKind::DivideByZero);
            }
            a.checked_div(b).ok_or(FaultKind::Overflow)
        }
        Tree::Negate(a) => Ok(evaluate(a, cells)?.wrapping_neg()),
        Tree::Choose {
            left,
            right,
            if_true,
            if_false,
        } => {
            if evaluate(left, cells)? < evaluate(right, cells)? {
                evaluate(if_true, cells)
            } else {
                evaluate(if_false, cells)
            }
        }
    }
}

fn active_outcome(active: &ActiveExpression) -> Result<i32, FaultKind> {
    match active.outcome() {
        Ok(value) => Ok(value.as_int().expect("int-typed expression")),
        Err(fault) => Err(fault.kind()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn active_value_tracks_direct_evaluation(
        tree in tree_strategy(),
        initial in prop::collection::vec(-20..=20i32, CELLS),
        updates in prop::collection::vec((0..CELLS, -20..=20i32), 0..12),
    ) {
        let cells: Vec<_> = initial.into_iter().map(Cell::new).collect();
        let active = ActiveExpression::create_closure(&build(&tree, &cells), None).unwrap();
        prop_assert_eq!(active.value_type(), Type::INT);
        prop_assert_eq!(active_outcome(&active), evaluate(&tree, &cells));

        for (cell, value) in updates {
            cells[cell].set(value);
            prop_assert_eq!(active_outcome(&active), evaluate(&tree, &cells));
        }

        active.dispose().unwrap();
        for cell in &cells {
            prop_assert_eq!(cell.observers(), 0);
        }
    }

    #[test]
    fn equal_trees_share_a_root(tree in tree_strategy(), initial in prop::collection::vec(-20..=20i32, CELLS)) {
        let cells: Vec<_> = initial.into_iter().map(Cell::new).collect();
        let first = ActiveExpression::create_closure(&build(&tree, &cells), None).unwrap();
        let second = ActiveExpression::create_closure(&build(&tree, &cells), None).unwrap();
        prop_assert!(first.ptr_eq(&second));
        prop_assert_eq!(first.outcome().ok(), second.outcome().ok());
    }
}

//! One evaluation pass per shape.

use std::ops::Range;
use std::sync::Arc;

use actx_ir::Callee;
use actx_value::{fault, EvalResult, Fault, Value};

use super::shape::Shape;
use super::{EvalState, Node};
use crate::guard::guarded;

fn operand(state: &EvalState, slot: usize) -> EvalResult {
    match state.children.get(slot) {
        Some(Some(child)) => child.node.outcome(),
        _ => Err(fault::invalid_operation("operand is not active")),
    }
}

/// Operand values in slot order; the leftmost fault wins.
fn operands(state: &EvalState, slots: Range<usize>) -> Result<Vec<Value>, Fault> {
    slots.map(|slot| operand(state, slot)).collect()
}

impl Node {
    pub(super) fn evaluate(self: &Arc<Self>, state: &mut EvalState) -> EvalResult {
        let count = self.operands.len();
        match &self.shape {
            Shape::Constant(value) => Ok(value.clone()),
            Shape::Member(property) if property.is_static() => {
                guarded(|| property.get(&Value::Null))
            }
            Shape::Member(property) => {
                let target = operand(state, 0);
                self.observe(state, target.as_ref().ok(), property.name(), false);
                let target = target?;
                guarded(|| property.get(&target))
            }
            Shape::Operation(operation) => {
                let values = operands(state, 0..count)?;
                guarded(|| operation.invoke(&values))
            }
            Shape::Logical(op) => match operand(state, 0) {
                Ok(Value::Bool(left)) if left == op.short_circuits_on() => {
                    self.release_slot(state, 1);
                    Ok(Value::Bool(left))
                }
                Ok(_) => {
                    self.activate_slot(state, 1)?;
                    operand(state, 1)
                }
                Err(fault) => {
                    self.release_slot(state, 1);
                    Err(fault)
                }
            },
            Shape::Conditional => match operand(state, 0) {
                Ok(test) => {
                    let (taken, other) = if test == Value::Bool(true) {
                        (1, 2)
                    } else {
                        (2, 1)
                    };
                    self.release_slot(state, other);
                    self.activate_slot(state, taken)?;
                    operand(state, taken)
                }
                Err(fault) => {
                    self.release_slot(state, 1);
                    self.release_slot(state, 2);
                    Err(fault)
                }
            },
            Shape::Coalesce(conversion) => match operand(state, 0) {
                Ok(Value::Null) => {
                    self.activate_slot(state, 1)?;
                    operand(state, 1)
                }
                Ok(left) => {
                    self.release_slot(state, 1);
                    match conversion {
                        Some(operation) => guarded(|| operation.invoke(&[left])),
                        None => Ok(left),
                    }
                }
                Err(fault) => {
                    self.release_slot(state, 1);
                    Err(fault)
                }
            },
            Shape::Index {
                indexer,
                change_name,
            } => {
                let target = operand(state, 0);
                self.observe(state, target.as_ref().ok(), *change_name, true);
                let target = target?;
                let args = operands(state, 1..count)?;
                guarded(|| indexer.get(&target, &args))
            }
            Shape::Call(Callee::Instance(method)) => {
                let target = operand(state, 0)?;
                let args = operands(state, 1..count)?;
                guarded(|| method.invoke(&target, &args))
            }
            Shape::Call(Callee::Static(function)) => {
                let args = operands(state, 0..count)?;
                guarded(|| function.invoke(&args))
            }
            Shape::New(constructor) => {
                let args = operands(state, 0..count)?;
                guarded(|| constructor.construct(&args))
            }
            Shape::TypeIs(ty) => Ok(Value::Bool(operand(state, 0)?.is_instance_of(*ty))),
            Shape::TypeAs(ty) => {
                let value = operand(state, 0)?;
                Ok(if value.is_instance_of(*ty) {
                    value
                } else {
                    Value::Null
                })
            }
        }
    }
}

//! Annotated rendering of a live node tree.
//!
//! Each active node is followed by its current outcome in a comment:
//! `(-{C} /* {X} */.Name /* "X" */.Length /* 1 */) /* -1 */`. Inactive
//! operands (untaken branches) render without annotations.

use std::fmt;
use std::sync::Arc;

use actx_ir::write_shape;
use actx_stack::ensure_sufficient_stack;

use crate::node::Node;

pub(crate) fn write_node(f: &mut fmt::Formatter<'_>, node: &Arc<Node>) -> fmt::Result {
    ensure_sufficient_stack(|| {
        let active = node.active_operands();
        write_shape(f, node.expr(), &mut |f, slot, operand| {
            match active.get(slot).and_then(Option::as_ref) {
                Some(child) => write_node(f, child),
                None => write!(f, "{operand}"),
            }
        })?;
        match node.outcome() {
            Ok(value) => write!(f, " /* {value} */"),
            Err(fault) => write!(f, " /* {fault} */"),
        }
    })
}

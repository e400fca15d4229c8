//! Process-wide node registry.
//!
//! Nodes are keyed by structural expression equality plus options equality.
//! Every acquisition takes a reference; the node is torn down when the last
//! reference is released. The registry lock is never held while user code
//! runs: nodes are built and initialized outside it, and concurrent
//! acquirers of a node still being initialized wait on its ready lock.

use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use actx_dispose::DisposeError;
use actx_ir::{structural_hash, Expr};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHasher};
use tracing::{debug, warn};

use crate::error::ActiveExprError;
use crate::node::Node;
use crate::options::ActiveExpressionOptions;
use crate::typeck::Typing;

/// Identity of a node: structural expression plus options.
///
/// The hash is computed once, outside the registry lock.
#[derive(Clone)]
pub(crate) struct NodeKey {
    hash: u64,
    expr: Expr,
    options: ActiveExpressionOptions,
}

impl NodeKey {
    pub(crate) fn new(expr: Expr, options: ActiveExpressionOptions) -> Self {
        let mut hasher = FxHasher::default();
        structural_hash(&expr).hash(&mut hasher);
        options.hash(&mut hasher);
        NodeKey {
            hash: hasher.finish(),
            expr,
            options,
        }
    }

    pub(crate) fn expr(&self) -> &Expr {
        &self.expr
    }

    pub(crate) fn options(&self) -> &ActiveExpressionOptions {
        &self.options
    }
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.options == other.options && self.expr == other.expr
    }
}

impl Eq for NodeKey {}

impl Hash for NodeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

struct Entry {
    node: Arc<Node>,
    refs: usize,
}

static NODES: LazyLock<Mutex<FxHashMap<NodeKey, Entry>>> = LazyLock::new(Default::default);

/// Take a reference to an existing node.
fn lookup(key: &NodeKey) -> Option<Arc<Node>> {
    let mut nodes = NODES.lock();
    let entry = nodes.get_mut(key)?;
    entry.refs += 1;
    Some(Arc::clone(&entry.node))
}

/// Get or create the node for `expr` under `options`, taking one reference.
///
/// `typing` must cover `expr`; a new node keeps it for its lazy operands.
pub(crate) fn acquire(
    expr: &Expr,
    options: &ActiveExpressionOptions,
    typing: &Arc<Typing>,
) -> Result<Arc<Node>, ActiveExprError> {
    let key = NodeKey::new(expr.clone(), options.clone());
    if let Some(node) = lookup(&key) {
        node.wait_ready()?;
        return Ok(node);
    }

    let fresh = Arc::new(Node::new(key.clone(), Arc::clone(typing))?);
    let ready = fresh.ready().write();
    {
        let mut nodes = NODES.lock();
        // Another thread may have registered the same key meanwhile.
        if let Some(entry) = nodes.get_mut(&key) {
            entry.refs += 1;
            let existing = Arc::clone(&entry.node);
            drop(nodes);
            drop(ready);
            existing.wait_ready()?;
            return Ok(existing);
        }
        nodes.insert(
            key.clone(),
            Entry {
                node: Arc::clone(&fresh),
                refs: 1,
            },
        );
    }
    debug!(shape = expr.kind().shape_name(), ty = %fresh.ty(), "activating node");

    match fresh.initialize() {
        Ok(()) => {
            drop(ready);
            Ok(fresh)
        }
        Err(error) => {
            {
                let mut nodes = NODES.lock();
                if nodes
                    .get(&key)
                    .is_some_and(|entry| Arc::ptr_eq(&entry.node, &fresh))
                {
                    nodes.remove(&key);
                }
            }
            fresh.fail(error.clone());
            drop(ready);
            if let Err(dispose_error) = fresh.teardown() {
                warn!(error = %dispose_error, "disposal failed while abandoning a node");
            }
            Err(error)
        }
    }
}

/// Drop one reference; tears the node down when it was the last.
pub(crate) fn release(node: &Arc<Node>) -> Result<(), DisposeError> {
    let retired = {
        let mut nodes = NODES.lock();
        match nodes.get_mut(node.key()) {
            Some(entry) if Arc::ptr_eq(&entry.node, node) => {
                entry.refs -= 1;
                if entry.refs == 0 {
                    nodes.remove(node.key());
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    };
    if !retired {
        return Ok(());
    }
    debug!(shape = node.expr().kind().shape_name(), "retiring node");
    node.teardown()
}

/// Number of nodes currently registered.
pub(crate) fn live_node_count() -> usize {
    NODES.lock().len()
}

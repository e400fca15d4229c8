//! Active expressions.
//!
//! Build an expression tree with [`Expr`]'s builders, bind it with
//! [`ActiveExpression::create`], and read [`ActiveExpression::value`]: it is
//! kept current as the objects the tree reads announce property and
//! collection changes. Structurally equal expressions share their nodes,
//! short-circuit operators only observe the branch they took, and evaluation
//! errors are captured as [`Fault`]s instead of escaping.
//!
//! ```text
//! p => p.Name.Length            (-{C} /* {X} */.Name /* "X" */.Length /* 1 */) /* -1 */
//! ```
//!
//! Tracing is opt-in: call [`init_tracing`] and set `RUST_LOG`, e.g.
//! `RUST_LOG=actx_eval=debug`.

use std::sync::Once;

pub use actx_dispose::{
    AsyncDispose, CancellationToken, Cancelled, Disposal, DisposalState, Dispose, DisposeError,
    Event, OverridableDispose, Subscription,
};
pub use actx_eval::{
    ActiveExprError, ActiveExpression, ActiveExpressionOptions, OptionsError, ResolveError,
};
pub use actx_ir::{BinaryOp, Callee, Expr, ExprHead, ExprKind, Lambda, LogicalOp, Param, UnaryOp};
pub use actx_value::{
    builtins, fault, CollectionChange, CollectionNotifier, Constructor, EvalResult, Fault,
    FaultKind, Function, Indexer, Method, Name, Object, ObjectRef, Primitive, Property,
    PropertyChange, PropertyNotifier, Type, Value,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Nothing is installed unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

//! Structural equality of expression trees.
//!
//! Trees are equal when every node has the same shape, operator, member
//! identity, types and constant values, and children are recursively equal.
//! Parameters bound by enclosing lambdas compare by position, so
//! `x => x + 1` equals `y => y + 1`. User-defined operators and conversions
//! are part of the comparison.

use actx_stack::ensure_sufficient_stack;

use crate::{Expr, ExprKind, Lambda, Param};

/// Whether two trees are structurally equal.
pub fn structurally_equal(a: &Expr, b: &Expr) -> bool {
    Comparer::default().expr(a, b)
}

impl Lambda {
    /// Structural equality with parameters bound positionally.
    pub fn structurally_equal(&self, other: &Lambda) -> bool {
        Comparer::default().lambda(self, other)
    }
}

#[derive(Default)]
struct Comparer {
    left: Vec<u32>,
    right: Vec<u32>,
}

impl Comparer {
    fn lambda(&mut self, a: &Lambda, b: &Lambda) -> bool {
        if a.params().len() != b.params().len()
            || a.params()
                .iter()
                .zip(b.params())
                .any(|(pa, pb)| pa.ty() != pb.ty())
        {
            return false;
        }
        let (left_depth, right_depth) = (self.left.len(), self.right.len());
        self.left.extend(a.params().iter().map(Param::id));
        self.right.extend(b.params().iter().map(Param::id));
        let equal = self.expr(a.body(), b.body());
        self.left.truncate(left_depth);
        self.right.truncate(right_depth);
        equal
    }

    fn param(&self, a: &Param, b: &Param) -> bool {
        if a.ty() != b.ty() {
            return false;
        }
        let pa = self.left.iter().rposition(|id| *id == a.id());
        let pb = self.right.iter().rposition(|id| *id == b.id());
        match (pa, pb) {
            (Some(pa), Some(pb)) => pa == pb,
            (None, None) => a.id() == b.id(),
            _ => false,
        }
    }

    fn opt(&mut self, a: Option<&Expr>, b: Option<&Expr>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.expr(a, b),
            _ => false,
        }
    }

    fn all(&mut self, a: &[Expr], b: &[Expr]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(a, b)| self.expr(a, b))
    }

    fn expr(&mut self, a: &Expr, b: &Expr) -> bool {
        // Shared subtrees are equal as long as both sides bind the same parameters.
        if a.ptr_eq(b) && self.left == self.right {
            return true;
        }
        ensure_sufficient_stack(|| match (a.kind(), b.kind()) {
            (
                ExprKind::Constant { value: va, ty: ta },
                ExprKind::Constant { value: vb, ty: tb },
            ) => ta == tb && va.identical(vb),
            (ExprKind::Parameter(pa), ExprKind::Parameter(pb)) => self.param(pa, pb),
            (
                ExprKind::Member {
                    target: ta,
                    property: pa,
                },
                ExprKind::Member {
                    target: tb,
                    property: pb,
                },
            ) => pa == pb && self.opt(ta.as_ref(), tb.as_ref()),
            (
                ExprKind::Binary {
                    op: oa,
                    left: la,
                    right: ra,
                    method: ma,
                },
                ExprKind::Binary {
                    op: ob,
                    left: lb,
                    right: rb,
                    method: mb,
                },
            ) => oa == ob && ma == mb && self.expr(la, lb) && self.expr(ra, rb),
            (
                ExprKind::Unary {
                    op: oa,
                    operand: xa,
                    method: ma,
                },
                ExprKind::Unary {
                    op: ob,
                    operand: xb,
                    method: mb,
                },
            ) => oa == ob && ma == mb && self.expr(xa, xb),
            (
                ExprKind::Convert {
                    operand: xa,
                    to: ta,
                    checked: ca,
                    method: ma,
                },
                ExprKind::Convert {
                    operand: xb,
                    to: tb,
                    checked: cb,
                    method: mb,
                },
            ) => ta == tb && ca == cb && ma == mb && self.expr(xa, xb),
            (
                ExprKind::Logical {
                    op: oa,
                    left: la,
                    right: ra,
                },
                ExprKind::Logical {
                    op: ob,
                    left: lb,
                    right: rb,
                },
            ) => oa == ob && self.expr(la, lb) && self.expr(ra, rb),
            (
                ExprKind::Conditional {
                    test: xa,
                    if_true: ta,
                    if_false: fa,
                },
                ExprKind::Conditional {
                    test: xb,
                    if_true: tb,
                    if_false: fb,
                },
            ) => self.expr(xa, xb) && self.expr(ta, tb) && self.expr(fa, fb),
            (
                ExprKind::Coalesce {
                    left: la,
                    right: ra,
                    conversion: ca,
                },
                ExprKind::Coalesce {
                    left: lb,
                    right: rb,
                    conversion: cb,
                },
            ) => ca == cb && self.expr(la, lb) && self.expr(ra, rb),
            (
                ExprKind::Index {
                    target: ta,
                    indexer: ia,
                    args: aa,
                },
                ExprKind::Index {
                    target: tb,
                    indexer: ib,
                    args: ab,
                },
            ) => ia == ib && self.expr(ta, tb) && self.all(aa, ab),
            (
                ExprKind::Call {
                    target: ta,
                    method: ma,
                    args: aa,
                },
                ExprKind::Call {
                    target: tb,
                    method: mb,
                    args: ab,
                },
            ) => ma == mb && self.opt(ta.as_ref(), tb.as_ref()) && self.all(aa, ab),
            (
                ExprKind::New {
                    constructor: ca,
                    args: aa,
                },
                ExprKind::New {
                    constructor: cb,
                    args: ab,
                },
            ) => ca == cb && self.all(aa, ab),
            (ExprKind::TypeIs { operand: xa, ty: ta }, ExprKind::TypeIs { operand: xb, ty: tb })
            | (ExprKind::TypeAs { operand: xa, ty: ta }, ExprKind::TypeAs { operand: xb, ty: tb }) => {
                ta == tb && self.expr(xa, xb)
            }
            (ExprKind::Block(sa), ExprKind::Block(sb)) => self.all(sa, sb),
            (
                ExprKind::Assign {
                    target: ta,
                    value: va,
                },
                ExprKind::Assign {
                    target: tb,
                    value: vb,
                },
            ) => self.expr(ta, tb) && self.expr(va, vb),
            (ExprKind::Lambda(la), ExprKind::Lambda(lb)) => self.lambda(la, lb),
            _ => false,
        })
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(self, other)
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(crate::structural_hash(self));
    }
}

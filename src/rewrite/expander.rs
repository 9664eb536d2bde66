//! De Morgan push-down and `&`-over-`|` distributivity, as standalone rewrite helpers.
//!
//! Role
//! - Not run automatically by [`crate::parser::parse`]; callers reach for these explicitly when
//!   they need negation normal form or a disjunction-of-conjunctions shape (e.g. as scaffolding
//!   toward a DNF-like cover before the BDD-derived conversion in [`crate::bdd::convert`] takes
//!   over).
use crate::ast::{AstNode, AstRef, BinOp, UnOp};

/// Push every negation down to the leaves, so `~` only ever wraps a variable or constant.
pub fn push_negation(node: &AstRef) -> AstRef {
    match &**node {
        AstNode::Unary { op: UnOp::Not, operand } => negate(operand),
        AstNode::Binary { op, left, right } => AstNode::binary(*op, push_negation(left), push_negation(right)),
        AstNode::Constant(_) | AstNode::Variable { .. } => node.clone(),
    }
}

fn negate(node: &AstRef) -> AstRef {
    match &**node {
        AstNode::Constant(v) => AstNode::constant(!*v),
        AstNode::Variable { .. } => AstNode::not(node.clone()),
        AstNode::Unary { op: UnOp::Not, operand } => push_negation(operand),
        AstNode::Binary { op: BinOp::And, left, right } => {
            AstNode::binary(BinOp::Or, negate(left), negate(right))
        }
        AstNode::Binary { op: BinOp::Or, left, right } => {
            AstNode::binary(BinOp::And, negate(left), negate(right))
        }
        AstNode::Binary { .. } => AstNode::not(push_negation(node)),
    }
}

/// Distribute `&` over `|`, on either side: `a & (b | c) -> (a & b) | (a & c)`.
pub fn distribute_and_over_or(node: &AstRef) -> AstRef {
    match &**node {
        AstNode::Binary { op: BinOp::And, left, right } => {
            let left = distribute_and_over_or(left);
            let right = distribute_and_over_or(right);
            if let AstNode::Binary { op: BinOp::Or, left: b, right: c } = &*right {
                return AstNode::binary(
                    BinOp::Or,
                    distribute_and_over_or(&AstNode::binary(BinOp::And, left.clone(), b.clone())),
                    distribute_and_over_or(&AstNode::binary(BinOp::And, left, c.clone())),
                );
            }
            if let AstNode::Binary { op: BinOp::Or, left: b, right: c } = &*left {
                return AstNode::binary(
                    BinOp::Or,
                    distribute_and_over_or(&AstNode::binary(BinOp::And, b.clone(), right.clone())),
                    distribute_and_over_or(&AstNode::binary(BinOp::And, c.clone(), right)),
                );
            }
            AstNode::binary(BinOp::And, left, right)
        }
        AstNode::Binary { op, left, right } => {
            AstNode::binary(*op, distribute_and_over_or(left), distribute_and_over_or(right))
        }
        AstNode::Unary { op: UnOp::Not, operand } => AstNode::not(distribute_and_over_or(operand)),
        AstNode::Constant(_) | AstNode::Variable { .. } => node.clone(),
    }
}

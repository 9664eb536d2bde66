//! Bottom-up AST normalizer.
//!
//! Role
//! - Constant folding for every operator, double-negation elimination, De Morgan push-down
//!   through a negated `&`/`|` child, and the identity/annihilator laws for `&`/`|`.
//! - Idempotent: running `normalize` on an already-normalized tree returns a structurally-equal
//!   tree, since every case it handles always returns a tree with no further-reducible shape.
use crate::ast::{AstNode, AstRef, BinOp, UnOp};

/// Normalize `node` bottom-up.
pub fn normalize(node: &AstRef) -> AstRef {
    match &**node {
        AstNode::Constant(_) | AstNode::Variable { .. } => node.clone(),
        AstNode::Unary { op: UnOp::Not, operand } => build_not(normalize(operand)),
        AstNode::Binary { op, left, right } => build_binary(*op, normalize(left), normalize(right)),
    }
}

fn build_not(operand: AstRef) -> AstRef {
    match &*operand {
        AstNode::Constant(v) => AstNode::constant(!*v),
        AstNode::Unary { op: UnOp::Not, operand: inner } => inner.clone(),
        AstNode::Binary { op: BinOp::And, left, right } => {
            build_binary(BinOp::Or, build_not(left.clone()), build_not(right.clone()))
        }
        AstNode::Binary { op: BinOp::Or, left, right } => {
            build_binary(BinOp::And, build_not(left.clone()), build_not(right.clone()))
        }
        _ => AstNode::not(operand),
    }
}

fn build_binary(op: BinOp, left: AstRef, right: AstRef) -> AstRef {
    if let (AstNode::Constant(a), AstNode::Constant(b)) = (&*left, &*right) {
        return AstNode::constant(fold_constants(op, *a, *b));
    }
    match op {
        BinOp::And => {
            if is_const(&left, false) || is_const(&right, false) {
                return AstNode::constant(false);
            }
            if is_const(&left, true) {
                return right;
            }
            if is_const(&right, true) {
                return left;
            }
        }
        BinOp::Or => {
            if is_const(&left, true) || is_const(&right, true) {
                return AstNode::constant(true);
            }
            if is_const(&left, false) {
                return right;
            }
            if is_const(&right, false) {
                return left;
            }
        }
        _ => {}
    }
    AstNode::binary(op, left, right)
}

fn is_const(node: &AstRef, value: bool) -> bool {
    matches!(&**node, AstNode::Constant(v) if *v == value)
}

fn fold_constants(op: BinOp, a: bool, b: bool) -> bool {
    match op {
        BinOp::And => a && b,
        BinOp::Or => a || b,
        BinOp::Xor => a ^ b,
        BinOp::Implies => !a || b,
        BinOp::Iff => a == b,
        BinOp::Nand => !(a && b),
        BinOp::Nor => !(a || b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_constants() {
        let ast = AstNode::binary(BinOp::And, AstNode::constant(true), AstNode::constant(false));
        assert_eq!(normalize(&ast), AstNode::constant(false));
    }

    #[test]
    fn eliminates_double_negation() {
        let x = AstNode::variable("x");
        let ast = AstNode::not(AstNode::not(x.clone()));
        assert_eq!(normalize(&ast), x);
    }

    #[test]
    fn pushes_de_morgan_through_and() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        let ast = AstNode::not(AstNode::binary(BinOp::And, a.clone(), b.clone()));
        let expected = AstNode::binary(BinOp::Or, AstNode::not(a), AstNode::not(b));
        assert_eq!(normalize(&ast), expected);
    }

    #[test]
    fn pushes_de_morgan_through_or() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        let ast = AstNode::not(AstNode::binary(BinOp::Or, a.clone(), b.clone()));
        let expected = AstNode::binary(BinOp::And, AstNode::not(a), AstNode::not(b));
        assert_eq!(normalize(&ast), expected);
    }

    #[test]
    fn applies_identity_and_annihilator_laws() {
        let a = AstNode::variable("a");
        assert_eq!(normalize(&AstNode::binary(BinOp::And, a.clone(), AstNode::constant(true))), a);
        assert_eq!(
            normalize(&AstNode::binary(BinOp::And, a.clone(), AstNode::constant(false))),
            AstNode::constant(false)
        );
        assert_eq!(normalize(&AstNode::binary(BinOp::Or, a.clone(), AstNode::constant(false))), a);
        assert_eq!(
            normalize(&AstNode::binary(BinOp::Or, a.clone(), AstNode::constant(true))),
            AstNode::constant(true)
        );
    }

    #[test]
    fn is_idempotent() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        let ast = AstNode::not(AstNode::binary(
            BinOp::And,
            AstNode::not(AstNode::not(a)),
            AstNode::binary(BinOp::Or, b, AstNode::constant(false)),
        ));
        let once = normalize(&ast);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }
}

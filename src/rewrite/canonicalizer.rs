//! Commutative canonicalization: flatten, dedup/cancel, sort, rebuild.
//!
//! Role
//! - For `&`, `|`, `^`, `<=>` — the commutative set named in the crate's textual grammar —
//!   flattens nested same-operator subtrees into a flat list of terms.
//! - `&`/`|` dedup by canonical-string key and sort lexically by that key before rebuilding a
//!   left-leaning tree.
//! - `^`/`<=>` cancel pairwise instead of deduping: a term occurring an even number of times
//!   vanishes, an odd number of times survives once.
//! - `!&`/`!|` are commutative in truth value but are not flattened here (neither is associative
//!   in the usual sense, and the crate's grammar never describes an n-ary nand/nor); their two
//!   operands are left in source order.
use std::collections::HashMap;

use crate::ast::{AstNode, AstRef, BinOp, UnOp};

/// Canonicalize `node`, recursively.
pub fn canonicalize(node: &AstRef) -> AstRef {
    match &**node {
        AstNode::Constant(_) | AstNode::Variable { .. } => node.clone(),
        AstNode::Unary { op: UnOp::Not, operand } => AstNode::not(canonicalize(operand)),
        AstNode::Binary { op, .. } if is_flattenable(*op) => canonicalize_commutative(*op, node),
        AstNode::Binary { op, left, right } => AstNode::binary(*op, canonicalize(left), canonicalize(right)),
    }
}

fn is_flattenable(op: BinOp) -> bool {
    matches!(op, BinOp::And | BinOp::Or | BinOp::Xor | BinOp::Iff)
}

fn canonicalize_commutative(op: BinOp, node: &AstRef) -> AstRef {
    let mut raw_terms = Vec::new();
    flatten(op, node, &mut raw_terms);
    let terms: Vec<AstRef> = raw_terms.iter().map(canonicalize).collect();

    match op {
        BinOp::And | BinOp::Or => {
            let mut keyed: Vec<(String, AstRef)> = terms.into_iter().map(|t| (canonical_key(&t), t)).collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            keyed.dedup_by(|a, b| a.0 == b.0);
            rebuild(op, keyed.into_iter().map(|(_, t)| t), op == BinOp::And)
        }
        BinOp::Xor | BinOp::Iff => {
            let mut counts: HashMap<String, (usize, AstRef)> = HashMap::new();
            for t in terms {
                let key = canonical_key(&t);
                let entry = counts.entry(key).or_insert((0, t));
                entry.0 += 1;
            }
            let mut kept: Vec<(String, AstRef)> = counts
                .into_iter()
                .filter(|(_, (count, _))| count % 2 == 1)
                .map(|(key, (_, t))| (key, t))
                .collect();
            kept.sort_by(|a, b| a.0.cmp(&b.0));
            rebuild(op, kept.into_iter().map(|(_, t)| t), op == BinOp::Iff)
        }
        _ => unreachable!("is_flattenable only admits And | Or | Xor | Iff"),
    }
}

/// Fold `terms` into a left-leaning tree under `op`. `neutral_is_true` selects the identity
/// returned for an empty term list (`&`/`<=>` fold to `1`, `|`/`^` fold to `0`).
fn rebuild(op: BinOp, mut terms: impl Iterator<Item = AstRef>, neutral_is_true: bool) -> AstRef {
    let Some(first) = terms.next() else {
        return AstNode::constant(neutral_is_true);
    };
    terms.fold(first, |acc, next| AstNode::binary(op, acc, next))
}

fn flatten(op: BinOp, node: &AstRef, out: &mut Vec<AstRef>) {
    match &**node {
        AstNode::Binary { op: child_op, left, right } if *child_op == op => {
            flatten(op, left, out);
            flatten(op, right, out);
        }
        _ => out.push(node.clone()),
    }
}

/// Deterministic string encoding of a (already-canonicalized) subtree, used purely as a sort and
/// dedup key; it is not meant to round-trip through the parser.
fn canonical_key(node: &AstRef) -> String {
    match &**node {
        AstNode::Constant(v) => if *v { "1".to_string() } else { "0".to_string() },
        AstNode::Variable { name, index } => format!("var:{name}:{index}"),
        AstNode::Unary { op, operand } => format!("({op}{})", canonical_key(operand)),
        AstNode::Binary { op, left, right } => format!("({} {op} {})", canonical_key(left), canonical_key(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_and_sorts_conjunction() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        let c = AstNode::variable("c");
        // (c & a) & b
        let ast = AstNode::binary(BinOp::And, AstNode::binary(BinOp::And, c, a.clone()), b.clone());
        let expected = AstNode::binary(BinOp::And, AstNode::binary(BinOp::And, a, b), AstNode::variable("c"));
        assert_eq!(canonicalize(&ast), expected);
    }

    #[test]
    fn deduplicates_repeated_and_term() {
        let a = AstNode::variable("a");
        let ast = AstNode::binary(BinOp::And, a.clone(), a.clone());
        assert_eq!(canonicalize(&ast), a);
    }

    #[test]
    fn xor_cancels_pairwise() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        // a ^ b ^ a -> b (the two `a` terms cancel)
        let ast = AstNode::binary(BinOp::Xor, AstNode::binary(BinOp::Xor, a.clone(), b.clone()), a);
        assert_eq!(canonicalize(&ast), b);
    }

    #[test]
    fn xor_full_cancellation_yields_false() {
        let a = AstNode::variable("a");
        let ast = AstNode::binary(BinOp::Xor, a.clone(), a);
        assert_eq!(canonicalize(&ast), AstNode::constant(false));
    }

    #[test]
    fn reordering_terms_is_idempotent() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        let ast = AstNode::binary(BinOp::And, b, a);
        let once = canonicalize(&ast);
        let twice = canonicalize(&once);
        assert_eq!(once, twice);
    }
}

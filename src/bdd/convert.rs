//! BDD → AST conversion via memoized Shannon expansion.
//!
//! Role
//! - A non-terminal `(v, low, high)` becomes `(v & C(high)) | (~v & C(low))`, with the term-level
//!   simplifications named in the crate's component design (`v & 1 -> v`, `v & 0 -> ⊥` dropped,
//!   `~v & 1 -> ~v`, `~v & 0 -> ⊥` dropped, `a | ⊥ -> a`) applied inline so the memoized
//!   intermediate trees stay small.
//! - The resulting AST is re-normalized before being returned, matching the normalizer's own
//!   idempotence guarantee.
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{AstNode, AstRef, BinOp};
use crate::bdd::manager::{BddManager, NodeId};
use crate::rewrite::normalizer;

/// Convert the BDD rooted at `root` back into a (normalized) AST. `names` maps a level to the
/// variable name occupying it (`names[level]`).
pub fn to_ast(mgr: &BddManager, root: NodeId, names: &[Rc<str>]) -> AstRef {
    let mut memo: HashMap<NodeId, AstRef> = HashMap::new();
    let raw = convert_rec(mgr, root, names, &mut memo);
    normalizer::normalize(&raw)
}

fn convert_rec(mgr: &BddManager, id: NodeId, names: &[Rc<str>], memo: &mut HashMap<NodeId, AstRef>) -> AstRef {
    if let Some(v) = mgr.terminal_value(id) {
        return AstNode::constant(v);
    }
    if let Some(cached) = memo.get(&id) {
        return cached.clone();
    }

    let level = mgr.level_of(id) as usize;
    let name = names[level].clone();
    let var = AstNode::variable(name);

    let low_ast = convert_rec(mgr, mgr.low(id), names, memo);
    let high_ast = convert_rec(mgr, mgr.high(id), names, memo);

    let high_term = and_with_literal(var.clone(), high_ast);
    let low_term = and_with_literal(AstNode::not(var), low_ast);
    let result = or_combine(high_term, low_term);

    memo.insert(id, result.clone());
    result
}

/// `lit & cofactor`, with `lit & 1 -> lit` and `lit & 0 -> ⊥` (the dropped term marker).
fn and_with_literal(lit: AstRef, cofactor: AstRef) -> AstRef {
    match &*cofactor {
        AstNode::Constant(true) => lit,
        AstNode::Constant(false) => AstNode::constant(false),
        _ => AstNode::binary(BinOp::And, lit, cofactor),
    }
}

/// `a | b`, with `⊥ | b -> b` and `a | ⊥ -> a`.
fn or_combine(a: AstRef, b: AstRef) -> AstRef {
    if matches!(&*a, AstNode::Constant(false)) {
        return b;
    }
    if matches!(&*b, AstNode::Constant(false)) {
        return a;
    }
    AstNode::binary(BinOp::Or, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;
    use crate::eval::evaluate_tree;
    use crate::rewrite::var_index::{assign_indices, index_map_from_order};

    fn roundtrip(ast: &AstRef, order: &[Rc<str>]) -> AstRef {
        let indices = index_map_from_order(order);
        let indexed = assign_indices(ast, &indices).unwrap();
        let mut mgr = BddManager::new(order.len());
        let root = mgr.build(&indexed);
        to_ast(&mgr, root, order)
    }

    #[test]
    fn converts_single_variable() {
        let order: Vec<Rc<str>> = vec![Rc::from("x")];
        let ast = AstNode::variable("x");
        let converted = roundtrip(&ast, &order);
        assert_eq!(converted, AstNode::variable("x"));
    }

    #[test]
    fn converts_tautology_to_true() {
        let order: Vec<Rc<str>> = vec![Rc::from("x")];
        let x = AstNode::variable("x");
        let ast = AstNode::binary(BinOp::Or, x.clone(), AstNode::not(x));
        let converted = roundtrip(&ast, &order);
        assert_eq!(converted, AstNode::constant(true));
    }

    #[test]
    fn converted_ast_is_semantically_equivalent() {
        let order: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b"), Rc::from("c")];
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        let c = AstNode::variable("c");
        let ast = AstNode::binary(
            BinOp::Or,
            AstNode::binary(BinOp::And, a, b),
            AstNode::binary(BinOp::Implies, AstNode::not(AstNode::variable("b")), c),
        );
        let indices = index_map_from_order(&order);
        let indexed = assign_indices(&ast, &indices).unwrap();
        let converted = roundtrip(&ast, &order);
        let converted_indexed = assign_indices(&converted, &indices).unwrap();

        for a_val in [false, true] {
            for b_val in [false, true] {
                for c_val in [false, true] {
                    let inputs = [a_val, b_val, c_val];
                    assert_eq!(
                        evaluate_tree(&indexed, &inputs).unwrap(),
                        evaluate_tree(&converted_indexed, &inputs).unwrap()
                    );
                }
            }
        }
    }
}

//! Variable ordering strategies: `order(astRoot, currentVars) -> newVars`.
//!
//! Role
//! - **Alphabetical** (default): lexicographic by name.
//! - **Frequency**: descending occurrence count, ties broken alphabetically.
//! - **Random**: Fisher-Yates shuffle, deterministic when seeded (`rand_chacha::ChaCha8Rng`),
//!   otherwise drawn from the thread-local generator.
//! - **Sifting**: slide each variable across every level, keep the position minimizing node
//!   count, repeat until a full pass yields no improvement (see [`crate::bdd::sift`]).
//! - **Auto**: for at most 40 variables, try alphabetical/frequency/seeded-random in parallel
//!   (one [`crate::bdd::BddManager`] per thread), keep the smallest BDD, then sift if at most 60
//!   variables; above 40 variables, frequency only.
//! - **Composite**: chains strategies, each consuming the previous result.
//!
//! Thread safety note
//! - [`crate::ast::AstRef`] is `Rc`-backed and so is not `Send`; the auto strategy's parallel
//!   section instead hands each thread an owned, `Rc`-free mirror of the AST ([`FlatNode`]) built
//!   once on the calling thread before `std::thread::scope` spawns the candidates.
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ast::{AstNode, AstRef, BinOp};
use crate::bdd::manager::{BddManager, NodeId};
use crate::bdd::{apply, sift};
use crate::rewrite::var_index;

/// A variable-ordering strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderingStrategy {
    Alphabetical,
    Frequency,
    Random { seed: Option<u64> },
    Sifting,
    Auto,
    Composite(Vec<OrderingStrategy>),
}

/// Compute a new variable order for `ast`, starting from `current_vars`.
pub fn order(strategy: &OrderingStrategy, ast: &AstRef, current_vars: &[Rc<str>]) -> Vec<Rc<str>> {
    match strategy {
        OrderingStrategy::Alphabetical => alphabetical(current_vars),
        OrderingStrategy::Frequency => frequency(ast, current_vars),
        OrderingStrategy::Random { seed } => random(current_vars, *seed),
        OrderingStrategy::Sifting => sifting(ast, current_vars),
        OrderingStrategy::Auto => auto(ast, current_vars),
        OrderingStrategy::Composite(strategies) => {
            let mut vars = current_vars.to_vec();
            for s in strategies {
                vars = order(s, ast, &vars);
            }
            vars
        }
    }
}

fn alphabetical(vars: &[Rc<str>]) -> Vec<Rc<str>> {
    let mut v = vars.to_vec();
    v.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
    v
}

fn frequency(ast: &AstRef, vars: &[Rc<str>]) -> Vec<Rc<str>> {
    let mut counts: HashMap<Rc<str>, usize> = vars.iter().cloned().map(|v| (v, 0usize)).collect();
    count_occurrences(ast, &mut counts);
    let mut v = vars.to_vec();
    v.sort_by(|a, b| {
        let ca = counts.get(a).copied().unwrap_or(0);
        let cb = counts.get(b).copied().unwrap_or(0);
        cb.cmp(&ca).then_with(|| a.as_ref().cmp(b.as_ref()))
    });
    v
}

fn count_occurrences(node: &AstRef, counts: &mut HashMap<Rc<str>, usize>) {
    let mut stack = vec![node.clone()];
    while let Some(n) = stack.pop() {
        match &*n {
            AstNode::Constant(_) => {}
            AstNode::Variable { name, .. } => {
                *counts.entry(name.clone()).or_insert(0) += 1;
            }
            AstNode::Unary { operand, .. } => stack.push(operand.clone()),
            AstNode::Binary { left, right, .. } => {
                stack.push(left.clone());
                stack.push(right.clone());
            }
        }
    }
}

fn random(vars: &[Rc<str>], seed: Option<u64>) -> Vec<Rc<str>> {
    let mut v = vars.to_vec();
    match seed {
        Some(s) => {
            let mut rng = ChaCha8Rng::seed_from_u64(s);
            v.shuffle(&mut rng);
        }
        None => {
            let mut rng = rand::rng();
            v.shuffle(&mut rng);
        }
    }
    v
}

fn sifting(ast: &AstRef, vars: &[Rc<str>]) -> Vec<Rc<str>> {
    let n = vars.len();
    if n < 2 {
        return vars.to_vec();
    }
    let indices = var_index::index_map_from_order(vars);
    let Ok(indexed) = var_index::assign_indices(ast, &indices) else {
        // `ast` mentions a variable not in `vars`; nothing sensible to reorder.
        return vars.to_vec();
    };

    let mut mgr = BddManager::new(n);
    let mut root = mgr.build(&indexed);
    let mut perm: Vec<Rc<str>> = vars.to_vec();

    loop {
        let before = mgr.node_count(root);
        for level in 0..n as u32 {
            let (new_root, new_perm) = sift_one_variable(&mut mgr, root, &perm, level, n as u32);
            root = new_root;
            perm = new_perm;
        }
        let after = mgr.node_count(root);
        debug!("ordering sift pass: {before} nodes -> {after} nodes");
        if after >= before {
            break;
        }
    }
    perm
}

/// Slide the variable at `start_level` down then up, tracking both the BDD root and the variable
/// permutation at each step, and return whichever pairing minimized node count.
fn sift_one_variable(
    mgr: &mut BddManager,
    mut root: NodeId,
    perm: &[Rc<str>],
    start_level: u32,
    num_vars: u32,
) -> (NodeId, Vec<Rc<str>>) {
    let mut perm = perm.to_vec();
    let mut best_root = root;
    let mut best_perm = perm.clone();
    let mut best_count = mgr.node_count(root);
    let mut level = start_level;

    while level + 1 < num_vars {
        root = sift::swap_adjacent(mgr, root, level);
        perm.swap(level as usize, (level + 1) as usize);
        level += 1;
        let count = mgr.node_count(root);
        if count < best_count {
            best_count = count;
            best_root = root;
            best_perm = perm.clone();
        }
    }
    while level > 0 {
        root = sift::swap_adjacent(mgr, root, level - 1);
        perm.swap((level - 1) as usize, level as usize);
        level -= 1;
        let count = mgr.node_count(root);
        if count < best_count {
            best_count = count;
            best_root = root;
            best_perm = perm.clone();
        }
    }
    (best_root, best_perm)
}

fn auto(ast: &AstRef, vars: &[Rc<str>]) -> Vec<Rc<str>> {
    let n = vars.len();
    if n > 40 {
        debug!("auto ordering: {n} variables exceeds the parallel-trial threshold, using frequency only");
        return frequency(ast, vars);
    }

    let candidate_orders: Vec<Vec<Rc<str>>> =
        vec![alphabetical(vars), frequency(ast, vars), random(vars, Some(0xA5A5_A5A5_A5A5_A5A5))];

    let flat = flatten_ast(ast);
    let counted: Vec<(usize, usize)> = std::thread::scope(|scope| {
        let handles: Vec<_> = candidate_orders
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let flat = flat.clone();
                let names: Vec<String> = candidate.iter().map(|n| n.to_string()).collect();
                scope.spawn(move || (i, node_count_for_flat_order(&flat, &names)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("ordering candidate thread panicked")).collect()
    });

    let (best_idx, best_count) =
        counted.into_iter().min_by_key(|(_, count)| *count).expect("at least one ordering candidate");
    debug!("auto ordering selected candidate {best_idx} with {best_count} nodes");
    let mut best_order = candidate_orders.into_iter().nth(best_idx).expect("valid candidate index");

    if n <= 60 {
        best_order = sifting(ast, &best_order);
    }
    best_order
}

/// An owned, `Rc`-free mirror of [`AstRef`], used only to cross the thread boundary in
/// [`auto`]'s parallel section.
#[derive(Clone)]
enum FlatNode {
    Constant(bool),
    Variable(String),
    Not(Box<FlatNode>),
    Binary(BinOp, Box<FlatNode>, Box<FlatNode>),
}

fn flatten_ast(node: &AstRef) -> FlatNode {
    match &**node {
        AstNode::Constant(v) => FlatNode::Constant(*v),
        AstNode::Variable { name, .. } => FlatNode::Variable(name.to_string()),
        AstNode::Unary { operand, .. } => FlatNode::Not(Box::new(flatten_ast(operand))),
        AstNode::Binary { op, left, right } => {
            FlatNode::Binary(*op, Box::new(flatten_ast(left)), Box::new(flatten_ast(right)))
        }
    }
}

fn node_count_for_flat_order(flat: &FlatNode, order: &[String]) -> usize {
    let index_of: HashMap<&str, usize> = order.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect();
    let mut mgr = BddManager::new(order.len());
    let root = build_flat(&mut mgr, flat, &index_of);
    mgr.node_count(root)
}

fn build_flat(mgr: &mut BddManager, node: &FlatNode, index_of: &HashMap<&str, usize>) -> NodeId {
    match node {
        FlatNode::Constant(v) => mgr.bool_node(*v),
        FlatNode::Variable(name) => mgr.variable_node(index_of[name.as_str()]),
        FlatNode::Not(operand) => {
            let o = build_flat(mgr, operand, index_of);
            apply::not(mgr, o)
        }
        FlatNode::Binary(op, left, right) => {
            let l = build_flat(mgr, left, index_of);
            let r = build_flat(mgr, right, index_of);
            match op {
                BinOp::And => apply::and(mgr, l, r),
                BinOp::Or => apply::or(mgr, l, r),
                BinOp::Xor => apply::xor(mgr, l, r),
                BinOp::Implies => apply::imply(mgr, l, r),
                BinOp::Iff => {
                    let x = apply::xor(mgr, l, r);
                    apply::not(mgr, x)
                }
                BinOp::Nand => {
                    let a = apply::and(mgr, l, r);
                    apply::not(mgr, a)
                }
                BinOp::Nor => {
                    let o = apply::or(mgr, l, r);
                    apply::not(mgr, o)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstNode;

    fn vars(names: &[&str]) -> Vec<Rc<str>> {
        names.iter().map(|n| Rc::from(*n)).collect()
    }

    #[test]
    fn alphabetical_sorts_by_name() {
        let ordered = order(&OrderingStrategy::Alphabetical, &AstNode::constant(true), &vars(&["c", "a", "b"]));
        assert_eq!(ordered, vars(&["a", "b", "c"]));
    }

    #[test]
    fn frequency_orders_by_descending_occurrence() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        // a appears twice, b once.
        let ast = AstNode::binary(BinOp::And, AstNode::binary(BinOp::Or, a.clone(), a), b);
        let ordered = order(&OrderingStrategy::Frequency, &ast, &vars(&["b", "a"]));
        assert_eq!(ordered, vars(&["a", "b"]));
    }

    #[test]
    fn seeded_random_is_deterministic() {
        let ast = AstNode::constant(true);
        let v = vars(&["a", "b", "c", "d", "e"]);
        let first = order(&OrderingStrategy::Random { seed: Some(42) }, &ast, &v);
        let second = order(&OrderingStrategy::Random { seed: Some(42) }, &ast, &v);
        assert_eq!(first, second);
    }

    #[test]
    fn composite_chains_strategies() {
        let ast = AstNode::constant(true);
        let v = vars(&["c", "a", "b"]);
        let composite = OrderingStrategy::Composite(vec![OrderingStrategy::Alphabetical]);
        let ordered = order(&composite, &ast, &v);
        assert_eq!(ordered, vars(&["a", "b", "c"]));
    }

    #[test]
    fn auto_picks_a_valid_permutation() {
        let a = AstNode::variable("a");
        let b = AstNode::variable("b");
        let c = AstNode::variable("c");
        let ast = AstNode::binary(
            BinOp::Or,
            AstNode::binary(BinOp::And, a, b),
            AstNode::binary(BinOp::And, AstNode::variable("a"), c),
        );
        let v = vars(&["a", "b", "c"]);
        let mut ordered = order(&OrderingStrategy::Auto, &ast, &v);
        ordered.sort_by(|x, y| x.as_ref().cmp(y.as_ref()));
        assert_eq!(ordered, vars(&["a", "b", "c"]));
    }
}

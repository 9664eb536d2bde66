//! Level swap and sifting: dynamic variable reordering for an existing BDD.
//!
//! Role
//! - [`swap_adjacent`] transposes the variables at two adjacent levels throughout a BDD,
//!   memoized per call so unaffected shared structure is revisited but never rebuilt twice.
//! - [`sift`] repeatedly slides each variable to the level that minimizes node count, stopping
//!   once a full pass over all variables yields no further improvement.
use std::collections::HashMap;

use log::debug;

use crate::bdd::manager::{BddManager, NodeId};

/// Swap the variables at adjacent levels `i` and `i + 1` throughout the BDD rooted at `root`,
/// returning the new root. Nodes above level `i` or below level `i + 1` are unaffected (aside
/// from being revisited to rebuild their edges).
pub fn swap_adjacent(mgr: &mut BddManager, root: NodeId, i: u32) -> NodeId {
    let mut memo = HashMap::new();
    swap_rec(mgr, root, i, &mut memo)
}

fn swap_rec(mgr: &mut BddManager, id: NodeId, i: u32, memo: &mut HashMap<NodeId, NodeId>) -> NodeId {
    if mgr.is_terminal(id) {
        return id;
    }
    if let Some(&cached) = memo.get(&id) {
        return cached;
    }
    let level = mgr.level_of(id);
    let result = if level < i {
        let lo = mgr.low(id);
        let hi = mgr.high(id);
        let new_lo = swap_rec(mgr, lo, i, memo);
        let new_hi = swap_rec(mgr, hi, i, memo);
        mgr.make_node(level, new_lo, new_hi)
    } else if level == i {
        // f0 / f1: this node's cofactors on the level-i variable.
        let f0 = mgr.low(id);
        let f1 = mgr.high(id);
        // Further cofactor each on the level-(i+1) variable.
        let (f00, f01) = mgr.cofactors(f0, i + 1);
        let (f10, f11) = mgr.cofactors(f1, i + 1);
        let new_low = mgr.make_node(i + 1, f00, f10);
        let new_high = mgr.make_node(i + 1, f01, f11);
        mgr.make_node(i, new_low, new_high)
    } else if level == i + 1 {
        // The variable formerly at i + 1 now sits at i; relabel, children untouched.
        let lo = mgr.low(id);
        let hi = mgr.high(id);
        mgr.make_node(i, lo, hi)
    } else {
        id
    };
    memo.insert(id, result);
    result
}

/// Slide the variable currently at `start_level` down to the bottom and back up to the top,
/// recording the node count at each position, then return the BDD with that variable parked at
/// whichever level minimized node count.
fn sift_one_variable(mgr: &mut BddManager, mut root: NodeId, start_level: u32, num_vars: u32) -> NodeId {
    let mut best_root = root;
    let mut best_level = start_level;
    let mut best_count = mgr.node_count(root);
    let mut level = start_level;

    while level + 1 < num_vars {
        root = swap_adjacent(mgr, root, level);
        level += 1;
        let count = mgr.node_count(root);
        if count < best_count {
            best_count = count;
            best_root = root;
            best_level = level;
        }
    }
    while level > 0 {
        root = swap_adjacent(mgr, root, level - 1);
        level -= 1;
        let count = mgr.node_count(root);
        if count < best_count {
            best_count = count;
            best_root = root;
            best_level = level;
        }
    }

    let _ = best_root;
    while level < best_level {
        root = swap_adjacent(mgr, root, level);
        level += 1;
    }
    while level > best_level {
        root = swap_adjacent(mgr, root, level - 1);
        level -= 1;
    }
    root
}

/// Sift `root` over a universe of `num_vars` variables until a full pass yields no further
/// reduction in node count.
pub fn sift(mgr: &mut BddManager, mut root: NodeId, num_vars: usize) -> NodeId {
    if num_vars < 2 {
        return root;
    }
    let num_vars = num_vars as u32;
    loop {
        let before = mgr.node_count(root);
        for level in 0..num_vars {
            root = sift_one_variable(mgr, root, level, num_vars);
        }
        let after = mgr.node_count(root);
        debug!("sifting pass: {before} nodes -> {after} nodes");
        if after >= before {
            break;
        }
    }
    root
}

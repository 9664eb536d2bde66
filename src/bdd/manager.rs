//! The ROBDD manager: arena of nodes, unique table, and apply cache.
//!
//! Role
//! - Nodes live in a flat [`Vec`] addressed by integer handle ([`NodeId`]); handles `0` and `1`
//!   are reserved terminals (`false`, `true`).
//! - The unique table enforces that within one manager, any two nodes with identical
//!   `(level, low, high)` are the same object — structural sharing is load-bearing for
//!   `equivalentTo` to reduce to pointer (handle) equality.
//! - The whole manager is discarded at once; individual nodes are never freed.
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::ast::{AstNode, AstRef, BinOp, UnOp, UNINDEXED};
use crate::bdd::apply;

/// Handle to a node inside a [`BddManager`]'s arena. Terminals are the reserved handles `0`
/// (`false`) and `1` (`true`).
pub type NodeId = u32;

pub const FALSE_ID: NodeId = 0;
pub const TRUE_ID: NodeId = 1;

/// Sentinel used as the "right" operand id for unary apply calls.
pub const NO_OPERAND: NodeId = NodeId::MAX;

#[derive(Debug, Clone, Copy)]
pub(crate) struct BddNode {
    pub(crate) level: u32,
    pub(crate) low: NodeId,
    pub(crate) high: NodeId,
}

/// A single ROBDD arena: every node built through `make_node`, `build`, or an `apply` op lives
/// here until the manager itself is dropped.
pub struct BddManager {
    pub(crate) nodes: Vec<BddNode>,
    pub(crate) unique: HashMap<(u32, NodeId, NodeId), NodeId>,
    pub(crate) apply_cache: HashMap<(apply::ApplyOp, NodeId, NodeId), NodeId>,
    num_vars: usize,
}

impl BddManager {
    /// Create a manager for a universe of `num_vars` variables (indices `0..num_vars`).
    pub fn new(num_vars: usize) -> Self {
        // Terminal placeholders occupy slots 0 and 1; their `level`/`low`/`high` fields are
        // never consulted (is_terminal short-circuits first).
        let nodes = vec![
            BddNode { level: u32::MAX, low: FALSE_ID, high: FALSE_ID },
            BddNode { level: u32::MAX, low: TRUE_ID, high: TRUE_ID },
        ];
        BddManager { nodes, unique: HashMap::new(), apply_cache: HashMap::new(), num_vars }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn false_node(&self) -> NodeId {
        FALSE_ID
    }

    pub fn true_node(&self) -> NodeId {
        TRUE_ID
    }

    pub fn bool_node(&self, value: bool) -> NodeId {
        if value { TRUE_ID } else { FALSE_ID }
    }

    pub fn is_terminal(&self, id: NodeId) -> bool {
        id == FALSE_ID || id == TRUE_ID
    }

    pub fn terminal_value(&self, id: NodeId) -> Option<bool> {
        match id {
            FALSE_ID => Some(false),
            TRUE_ID => Some(true),
            _ => None,
        }
    }

    pub(crate) fn level_of(&self, id: NodeId) -> u32 {
        if self.is_terminal(id) { u32::MAX } else { self.nodes[id as usize].level }
    }

    pub(crate) fn low(&self, id: NodeId) -> NodeId {
        self.nodes[id as usize].low
    }

    pub(crate) fn high(&self, id: NodeId) -> NodeId {
        self.nodes[id as usize].high
    }

    /// Cofactor `id` at `level`: returns `(low, high)` if `id` depends on `level`, otherwise
    /// `(id, id)` since a node unaffected by a level keeps itself for both cofactors.
    pub(crate) fn cofactors(&self, id: NodeId, level: u32) -> (NodeId, NodeId) {
        if self.is_terminal(id) || self.level_of(id) > level {
            (id, id)
        } else {
            let node = &self.nodes[id as usize];
            (node.low, node.high)
        }
    }

    /// `Apply(varLevel, low, high)`: returns `low` if `low == high` (the node is redundant),
    /// otherwise looks up or inserts into the unique table.
    pub(crate) fn make_node(&mut self, level: u32, low: NodeId, high: NodeId) -> NodeId {
        if low == high {
            return low;
        }
        if let Some(&existing) = self.unique.get(&(level, low, high)) {
            return existing;
        }
        let id = self.nodes.len() as NodeId;
        self.nodes.push(BddNode { level, low, high });
        self.unique.insert((level, low, high), id);
        id
    }

    /// The BDD for a single variable at `level`: `makeNode(level, false, true)`.
    pub fn variable_node(&mut self, level: usize) -> NodeId {
        self.make_node(level as u32, self.false_node(), self.true_node())
    }

    /// Count the distinct non-terminal nodes reachable from `root`.
    pub fn node_count(&self, root: NodeId) -> usize {
        let mut seen = std::collections::HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.is_terminal(id) || !seen.insert(id) {
                continue;
            }
            let node = &self.nodes[id as usize];
            stack.push(node.low);
            stack.push(node.high);
        }
        seen.len()
    }

    /// Build a BDD from a fully-indexed, normalized AST. Variables yield `makeNode(level,
    /// false, true)`; unary negation and binary operators go through [`crate::bdd::apply`].
    /// `Iff`/`Nand`/`Nor` are expressed by composing the five exported apply primitives
    /// (`Not`, `And`, `Or`, `Xor`, `Imply`), since those are the only ops the unique-table/
    /// apply-cache layer implements directly.
    pub fn build(&mut self, ast: &AstRef) -> NodeId {
        let root = self.build_inner(ast);
        debug!("built BDD: root={root} nodes={}", self.node_count(root));
        root
    }

    fn build_inner(&mut self, ast: &AstRef) -> NodeId {
        match &**ast {
            AstNode::Constant(v) => self.bool_node(*v),
            AstNode::Variable { index, name } => {
                debug_assert!(*index != UNINDEXED, "variable {name:?} was never assigned an index");
                self.variable_node(*index)
            }
            AstNode::Unary { op: UnOp::Not, operand } => {
                let o = self.build_inner(operand);
                apply::not(self, o)
            }
            AstNode::Binary { op, left, right } => {
                let l = self.build_inner(left);
                let r = self.build_inner(right);
                match op {
                    BinOp::And => apply::and(self, l, r),
                    BinOp::Or => apply::or(self, l, r),
                    BinOp::Xor => apply::xor(self, l, r),
                    BinOp::Implies => apply::imply(self, l, r),
                    BinOp::Iff => {
                        let x = apply::xor(self, l, r);
                        apply::not(self, x)
                    }
                    BinOp::Nand => {
                        let a = apply::and(self, l, r);
                        apply::not(self, a)
                    }
                    BinOp::Nor => {
                        let o = apply::or(self, l, r);
                        apply::not(self, o)
                    }
                }
            }
        }
    }
}

//! Variable-index assignment: the last rewrite step before a tree can reach the BDD manager.
//!
//! Role
//! - Given a name → index mapping (typically derived from a chosen variable ordering), rewrite
//!   every [`crate::ast::AstNode::Variable`] to carry the corresponding index.
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{AstNode, AstRef, UnOp};
use crate::error::EvalError;

/// Build a name → index map from an ordered variable list (the list's position is the index).
pub fn index_map_from_order(order: &[Rc<str>]) -> HashMap<Rc<str>, usize> {
    order.iter().cloned().enumerate().map(|(index, name)| (name, index)).collect()
}

/// Rewrite every variable node in `node` to carry the index `indices` assigns to its name.
///
/// Fails with [`EvalError::UnindexedVariable`] if some variable occurring in the tree has no
/// entry in `indices`.
pub fn assign_indices(node: &AstRef, indices: &HashMap<Rc<str>, usize>) -> Result<AstRef, EvalError> {
    Ok(match &**node {
        AstNode::Constant(_) => node.clone(),
        AstNode::Variable { name, .. } => {
            let index = indices
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UnindexedVariable { name: name.to_string() })?;
            AstNode::variable_indexed(name.clone(), index)
        }
        AstNode::Unary { op: UnOp::Not, operand } => AstNode::not(assign_indices(operand, indices)?),
        AstNode::Binary { op, left, right } => {
            let left = assign_indices(left, indices)?;
            let right = assign_indices(right, indices)?;
            AstNode::binary(*op, left, right)
        }
    })
}

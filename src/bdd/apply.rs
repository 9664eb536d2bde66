//! Bryant's Apply algorithm, generalized over a terminal combinator.
//!
//! Role
//! - Exports exactly five operations — `Not`, `And`, `Or`, `Xor`, `Imply` — matching the ops the
//!   unique-table/apply-cache layer implements directly. `Iff`/`Nand`/`Nor` are composed from
//!   these in [`crate::bdd::manager::BddManager::build`].
//! - No logging here: this is the hottest recursive path in the crate, and the cache already
//!   keeps repeated work bounded.
use crate::bdd::manager::{BddManager, NodeId, NO_OPERAND};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyOp {
    Not,
    And,
    Or,
    Xor,
    Imply,
}

pub fn not(mgr: &mut BddManager, u: NodeId) -> NodeId {
    apply_recursive(mgr, ApplyOp::Not, u, NO_OPERAND)
}

pub fn and(mgr: &mut BddManager, u: NodeId, v: NodeId) -> NodeId {
    apply_recursive(mgr, ApplyOp::And, u, v)
}

pub fn or(mgr: &mut BddManager, u: NodeId, v: NodeId) -> NodeId {
    apply_recursive(mgr, ApplyOp::Or, u, v)
}

pub fn xor(mgr: &mut BddManager, u: NodeId, v: NodeId) -> NodeId {
    apply_recursive(mgr, ApplyOp::Xor, u, v)
}

pub fn imply(mgr: &mut BddManager, u: NodeId, v: NodeId) -> NodeId {
    apply_recursive(mgr, ApplyOp::Imply, u, v)
}

fn apply_recursive(mgr: &mut BddManager, op: ApplyOp, u: NodeId, v: NodeId) -> NodeId {
    if op == ApplyOp::Not {
        if let Some(a) = mgr.terminal_value(u) {
            return mgr.bool_node(!a);
        }
    } else if let (Some(a), Some(b)) = (mgr.terminal_value(u), mgr.terminal_value(v)) {
        let result = match op {
            ApplyOp::And => a && b,
            ApplyOp::Or => a || b,
            ApplyOp::Xor => a ^ b,
            ApplyOp::Imply => !a || b,
            ApplyOp::Not => unreachable!("handled above"),
        };
        return mgr.bool_node(result);
    }

    let cache_key = (op, u, v);
    if let Some(&cached) = mgr.apply_cache.get(&cache_key) {
        return cached;
    }

    let level_u = mgr.level_of(u);
    let level_v = if op == ApplyOp::Not { u32::MAX } else { mgr.level_of(v) };
    let level = level_u.min(level_v);

    let (u_low, u_high) = mgr.cofactors(u, level);
    let result = if op == ApplyOp::Not {
        let low = apply_recursive(mgr, op, u_low, NO_OPERAND);
        let high = apply_recursive(mgr, op, u_high, NO_OPERAND);
        mgr.make_node(level, low, high)
    } else {
        let (v_low, v_high) = mgr.cofactors(v, level);
        let low = apply_recursive(mgr, op, u_low, v_low);
        let high = apply_recursive(mgr, op, u_high, v_high);
        mgr.make_node(level, low, high)
    };

    mgr.apply_cache.insert(cache_key, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_of_true_is_false() {
        let mut mgr = BddManager::new(0);
        assert_eq!(not(&mut mgr, mgr.true_node()), mgr.false_node());
    }

    #[test]
    fn and_of_variable_with_itself_is_itself() {
        let mut mgr = BddManager::new(1);
        let x = mgr.variable_node(0);
        assert_eq!(and(&mut mgr, x, x), x);
    }

    #[test]
    fn or_of_variable_and_its_negation_is_true() {
        let mut mgr = BddManager::new(1);
        let x = mgr.variable_node(0);
        let not_x = not(&mut mgr, x);
        assert_eq!(or(&mut mgr, x, not_x), mgr.true_node());
    }

    #[test]
    fn imply_matches_truth_table() {
        let mut mgr = BddManager::new(2);
        let x = mgr.variable_node(0);
        let y = mgr.variable_node(1);
        // x => y  ==  ~x | y
        let not_x = not(&mut mgr, x);
        let expected = or(&mut mgr, not_x, y);
        let actual = imply(&mut mgr, x, y);
        assert_eq!(actual, expected);
    }

    #[test]
    fn xor_of_variable_with_itself_is_false() {
        let mut mgr = BddManager::new(1);
        let x = mgr.variable_node(0);
        assert_eq!(xor(&mut mgr, x, x), mgr.false_node());
    }
}

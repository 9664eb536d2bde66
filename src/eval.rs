//! Evaluating a boolean AST against an input assignment.
//!
//! Role
//! - [`evaluate_tree`]: direct recursive tree-walk, used as a fallback and for one-off
//!   evaluations where compiling first isn't worth it.
//! - [`compile`]: translates the AST into a closure tree whose leaves index straight into the
//!   input slice, with configurable short-circuiting for `&`/`|`. Meant to be cached (see
//!   [`crate::cache`]) and reused across many evaluations of the same formula.
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{AstNode, AstRef, BinOp, UnOp, UNINDEXED};
use crate::error::EvalError;

/// Evaluate `ast` against a positional input vector (`inputs[variable_index]`).
pub fn evaluate_tree(ast: &AstRef, inputs: &[bool]) -> Result<bool, EvalError> {
    match &**ast {
        AstNode::Constant(v) => Ok(*v),
        AstNode::Variable { index, name } => {
            if *index == UNINDEXED {
                return Err(EvalError::UnindexedVariable { name: name.to_string() });
            }
            inputs.get(*index).copied().ok_or(EvalError::InputLengthMismatch {
                expected: *index + 1,
                actual: inputs.len(),
            })
        }
        AstNode::Unary { op: UnOp::Not, operand } => Ok(!evaluate_tree(operand, inputs)?),
        AstNode::Binary { op, left, right } => {
            let l = evaluate_tree(left, inputs)?;
            let r = evaluate_tree(right, inputs)?;
            Ok(apply_bin(*op, l, r))
        }
    }
}

/// Evaluate `ast` against a name-keyed assignment, in the order given by `order` (also the
/// variable-index assignment the AST was built against). Fails if `inputs` is missing a name
/// `order` expects.
pub fn evaluate_named(ast: &AstRef, inputs: &HashMap<String, bool>, order: &[Rc<str>]) -> Result<bool, EvalError> {
    let mut positional = Vec::with_capacity(order.len());
    for name in order {
        let value = inputs
            .get(name.as_ref())
            .copied()
            .ok_or_else(|| EvalError::MissingVariable { name: name.to_string() })?;
        positional.push(value);
    }
    evaluate_tree(ast, &positional)
}

fn apply_bin(op: BinOp, a: bool, b: bool) -> bool {
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

type BoolFn = Box<dyn Fn(&[bool]) -> bool + Send + Sync>;

/// A compiled closure tree over a fixed, fully-indexed AST.
pub struct CompiledEvaluator {
    func: BoolFn,
}

impl CompiledEvaluator {
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        (self.func)(inputs)
    }
}

/// Compile `ast` into a [`CompiledEvaluator`]. `use_short_circuiting` selects Rust's native
/// short-circuit `&&`/`||` for `&`/`|` versus an eager form that always evaluates both operands
/// (useful when side-effect-free input closures should still be exercised identically regardless
/// of operand order, e.g. for fuzzing or benchmarking).
pub fn compile(ast: &AstRef, use_short_circuiting: bool) -> CompiledEvaluator {
    CompiledEvaluator { func: compile_rec(ast, use_short_circuiting) }
}

fn compile_rec(ast: &AstRef, short_circuit: bool) -> BoolFn {
    match &**ast {
        AstNode::Constant(v) => {
            let v = *v;
            Box::new(move |_| v)
        }
        AstNode::Variable { index, name } => {
            let idx = *index;
            if idx == UNINDEXED {
                // This can only happen if a caller compiles an AST that skipped variable-index
                // assignment; fail loudly rather than indexing out of bounds silently.
                let name = name.to_string();
                panic!("attempted to compile unindexed variable {name:?}");
            }
            Box::new(move |inputs: &[bool]| inputs[idx])
        }
        AstNode::Unary { op: UnOp::Not, operand } => {
            let f = compile_rec(operand, short_circuit);
            Box::new(move |inputs| !f(inputs))
        }
        AstNode::Binary { op, left, right } => {
            let lf = compile_rec(left, short_circuit);
            let rf = compile_rec(right, short_circuit);
            match op {
                BinOp::And if short_circuit => Box::new(move |inputs| lf(inputs) && rf(inputs)),
                BinOp::And => Box::new(move |inputs| {
                    let l = lf(inputs);
                    let r = rf(inputs);
                    l && r
                }),
                BinOp::Or if short_circuit => Box::new(move |inputs| lf(inputs) || rf(inputs)),
                BinOp::Or => Box::new(move |inputs| {
                    let l = lf(inputs);
                    let r = rf(inputs);
                    l || r
                }),
                BinOp::Xor => Box::new(move |inputs| lf(inputs) ^ rf(inputs)),
                BinOp::Implies => Box::new(move |inputs| !lf(inputs) || rf(inputs)),
                BinOp::Iff => Box::new(move |inputs| {
                    let l = lf(inputs);
                    let r = rf(inputs);
                    (!l && !r) || (l && r)
                }),
                BinOp::Nand => Box::new(move |inputs| !(lf(inputs) && rf(inputs))),
                BinOp::Nor => Box::new(move |inputs| !(lf(inputs) || rf(inputs))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::var_index::{assign_indices, index_map_from_order};

    fn indexed(ast: &AstRef, order: &[Rc<str>]) -> AstRef {
        let indices = index_map_from_order(order);
        assign_indices(ast, &indices).unwrap()
    }

    #[test]
    fn evaluates_conjunction() {
        let order: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b")];
        let ast = indexed(&AstNode::binary(BinOp::And, AstNode::variable("a"), AstNode::variable("b")), &order);
        assert!(evaluate_tree(&ast, &[true, true]).unwrap());
        assert!(!evaluate_tree(&ast, &[true, false]).unwrap());
    }

    #[test]
    fn reports_input_length_mismatch() {
        let order: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b")];
        let ast = indexed(&AstNode::variable("b"), &order);
        let err = evaluate_tree(&ast, &[true]).unwrap_err();
        assert!(matches!(err, EvalError::InputLengthMismatch { .. }));
    }

    #[test]
    fn evaluates_named_inputs() {
        let order: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b")];
        let ast = indexed(&AstNode::binary(BinOp::Or, AstNode::variable("a"), AstNode::variable("b")), &order);
        let mut inputs = HashMap::new();
        inputs.insert("a".to_string(), false);
        inputs.insert("b".to_string(), true);
        assert!(evaluate_named(&ast, &inputs, &order).unwrap());
    }

    #[test]
    fn named_evaluation_reports_missing_variable() {
        let order: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b")];
        let ast = indexed(&AstNode::variable("b"), &order);
        let mut inputs = HashMap::new();
        inputs.insert("a".to_string(), true);
        let err = evaluate_named(&ast, &inputs, &order).unwrap_err();
        assert!(matches!(err, EvalError::MissingVariable { .. }));
    }

    #[test]
    fn compiled_evaluator_agrees_with_tree_walk() {
        let order: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b"), Rc::from("c")];
        let ast = indexed(
            &AstNode::binary(
                BinOp::Implies,
                AstNode::binary(BinOp::And, AstNode::variable("a"), AstNode::variable("b")),
                AstNode::variable("c"),
            ),
            &order,
        );
        let compiled_eager = compile(&ast, false);
        let compiled_sc = compile(&ast, true);
        for a in [false, true] {
            for b in [false, true] {
                for c in [false, true] {
                    let inputs = [a, b, c];
                    let expected = evaluate_tree(&ast, &inputs).unwrap();
                    assert_eq!(compiled_eager.evaluate(&inputs), expected);
                    assert_eq!(compiled_sc.evaluate(&inputs), expected);
                }
            }
        }
    }
}

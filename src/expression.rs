//! `Expression`: the facade tying parsing, rewriting, ordering, evaluation, and the BDD engine
//! together into one handle.
//!
//! Role
//! - Holds a normalized (but not index-assigned) AST plus the variable order currently in effect.
//!   Index assignment happens on demand, right before a BDD build or an evaluation, so changing
//!   the order (`with_variable_order`) never requires re-parsing.
//! - `to_dnf`/`to_cnf` are extracted directly from the ROBDD: one conjunction (resp. clause) per
//!   root-to-terminal path, using the levels actually tested on that path as its literals. This is
//!   a standard sum-of-implicants / product-of-clauses reading of a decision diagram, and is
//!   generally far more compact than full minterm/maxterm expansion.
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{AstNode, AstRef, BinOp};
use crate::bdd::manager::{BddManager, NodeId, FALSE_ID, TRUE_ID};
use crate::bdd::{convert, sift};
use crate::config::ParserConfig;
use crate::error::{EvalError, ParseError};
use crate::eval::{self, CompiledEvaluator};
use crate::ordering::{self, OrderingStrategy};
use crate::parser;
use crate::registry::OperatorRegistry;
use crate::rewrite::{self, var_index};

/// A parsed boolean formula, together with the variable order it evaluates and builds BDDs
/// against.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    ast: AstRef,
    order: Vec<Rc<str>>,
}

impl Expression {
    /// Parse `source` into an [`Expression`], with its variable order taken from first-seen
    /// occurrence in the source text.
    pub fn parse(source: &str, registry: &mut OperatorRegistry, config: &ParserConfig) -> Result<Self, ParseError> {
        let ast = parser::parse(source, registry, config)?;
        Ok(Self::from_ast(ast))
    }

    /// Wrap an already-built AST, deriving its variable order from first-seen occurrence.
    pub fn from_ast(ast: AstRef) -> Self {
        let order = ast.collect_variable_names();
        Self { ast, order }
    }

    pub fn ast(&self) -> &AstRef {
        &self.ast
    }

    pub fn variable_order(&self) -> &[Rc<str>] {
        &self.order
    }

    /// Re-derive the variable order via `strategy`, keeping the same AST.
    pub fn with_variable_order(&self, strategy: &OrderingStrategy) -> Self {
        let order = ordering::order(strategy, &self.ast, &self.order);
        Self { ast: self.ast.clone(), order }
    }

    /// Replace the variable order directly (e.g. to align two expressions before comparing them).
    pub fn with_explicit_order(&self, order: Vec<Rc<str>>) -> Self {
        Self { ast: self.ast.clone(), order }
    }

    fn indexed(&self) -> Result<AstRef, EvalError> {
        let indices = var_index::index_map_from_order(&self.order);
        var_index::assign_indices(&self.ast, &indices)
    }

    fn build_bdd(&self) -> Result<(BddManager, NodeId), EvalError> {
        let indexed = self.indexed()?;
        let mut mgr = BddManager::new(self.order.len());
        let root = mgr.build(&indexed);
        Ok((mgr, root))
    }

    /// Evaluate against a positional assignment (`inputs[i]` is `self.variable_order()[i]`).
    pub fn evaluate(&self, inputs: &[bool]) -> Result<bool, EvalError> {
        eval::evaluate_tree(&self.indexed()?, inputs)
    }

    /// Evaluate against a name-keyed assignment.
    pub fn evaluate_named(&self, inputs: &HashMap<String, bool>) -> Result<bool, EvalError> {
        eval::evaluate_named(&self.indexed()?, inputs, &self.order)
    }

    /// Compile to a reusable closure-tree evaluator (see [`crate::cache::DelegateCache`] for
    /// caching these across repeated evaluations).
    pub fn compile(&self, use_short_circuiting: bool) -> Result<CompiledEvaluator, EvalError> {
        Ok(eval::compile(&self.indexed()?, use_short_circuiting))
    }

    /// Apply constant folding, double-negation elimination, De Morgan push-down, and
    /// identity/annihilator laws.
    pub fn normalize(&self) -> Self {
        Self { ast: rewrite::normalizer::normalize(&self.ast), order: self.order.clone() }
    }

    /// Flatten/dedup/sort `&`/`|`/`^`/`<=>` chains into canonical form.
    pub fn canonicalize(&self) -> Self {
        Self { ast: rewrite::canonicalizer::canonicalize(&self.ast), order: self.order.clone() }
    }

    /// Round-trip through a sifted ROBDD and back, yielding a (typically smaller) equivalent AST.
    pub fn minimize(&self) -> Result<Self, EvalError> {
        let (mut mgr, root) = self.build_bdd()?;
        let root = sift::sift(&mut mgr, root, self.order.len());
        let ast = convert::to_ast(&mgr, root, &self.order);
        Ok(Self { ast, order: self.order.clone() })
    }

    /// Disjunctive normal form, as a sum of BDD path-implicants.
    pub fn to_dnf(&self) -> Result<Self, EvalError> {
        let (mgr, root) = self.build_bdd()?;
        let paths = collect_paths(&mgr, root, true);
        let terms: Vec<AstRef> = paths.into_iter().map(|path| conjunction_of_literals(&path, &self.order)).collect();
        let ast = disjunction_of(terms);
        Ok(Self { ast: rewrite::normalizer::normalize(&ast), order: self.order.clone() })
    }

    /// Conjunctive normal form, as a product of BDD path-clauses.
    pub fn to_cnf(&self) -> Result<Self, EvalError> {
        let (mgr, root) = self.build_bdd()?;
        let paths = collect_paths(&mgr, root, false);
        let clauses: Vec<AstRef> = paths.into_iter().map(|path| clause_of_literals(&path, &self.order)).collect();
        let ast = conjunction_of(clauses);
        Ok(Self { ast: rewrite::normalizer::normalize(&ast), order: self.order.clone() })
    }

    pub fn is_tautology(&self) -> Result<bool, EvalError> {
        Ok(self.build_bdd()?.1 == TRUE_ID)
    }

    pub fn is_contradiction(&self) -> Result<bool, EvalError> {
        Ok(self.build_bdd()?.1 == FALSE_ID)
    }

    pub fn is_satisfiable(&self) -> Result<bool, EvalError> {
        Ok(self.build_bdd()?.1 != FALSE_ID)
    }

    /// Whether `self` and `other` are semantically equivalent, checked by building both over a
    /// shared variable order in one manager and comparing root handles (the manager's unique
    /// table guarantees equal formulas collapse to the same node).
    pub fn equivalent_to(&self, other: &Expression) -> Result<bool, EvalError> {
        let mut combined: Vec<Rc<str>> = self.order.clone();
        for name in &other.order {
            if !combined.iter().any(|existing| existing == name) {
                combined.push(name.clone());
            }
        }
        let indices = var_index::index_map_from_order(&combined);
        let lhs = var_index::assign_indices(&self.ast, &indices)?;
        let rhs = var_index::assign_indices(&other.ast, &indices)?;
        let mut mgr = BddManager::new(combined.len());
        let lhs_root = mgr.build(&lhs);
        let rhs_root = mgr.build(&rhs);
        Ok(lhs_root == rhs_root)
    }

    /// Whether `self` and `other` have the exact same AST shape, literally: no normalization,
    /// canonicalization, or variable reordering is applied first. Stricter than
    /// [`Expression::equivalent_to`]: `A & B` and `B & A` are equivalent but not structurally
    /// equal.
    pub fn structural_equals(&self, other: &Expression) -> bool {
        self.ast == other.ast
    }
}

fn collect_paths(mgr: &BddManager, root: NodeId, target: bool) -> Vec<Vec<(usize, bool)>> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    walk_paths(mgr, root, target, &mut path, &mut out);
    out
}

fn walk_paths(mgr: &BddManager, id: NodeId, target: bool, path: &mut Vec<(usize, bool)>, out: &mut Vec<Vec<(usize, bool)>>) {
    if let Some(value) = mgr.terminal_value(id) {
        if value == target {
            out.push(path.clone());
        }
        return;
    }
    let level = mgr.level_of(id) as usize;
    path.push((level, false));
    walk_paths(mgr, mgr.low(id), target, path, out);
    path.pop();

    path.push((level, true));
    walk_paths(mgr, mgr.high(id), target, path, out);
    path.pop();
}

fn conjunction_of_literals(path: &[(usize, bool)], order: &[Rc<str>]) -> AstRef {
    let literals = path.iter().map(|&(level, value)| literal(level, value, order)).collect();
    conjunction_of(literals)
}

/// A clause built from a path to the `false` terminal: the disjunction of each level's *opposite*
/// literal (the assignment that would steer away from `false`).
fn clause_of_literals(path: &[(usize, bool)], order: &[Rc<str>]) -> AstRef {
    let literals = path.iter().map(|&(level, value)| literal(level, !value, order)).collect();
    disjunction_of(literals)
}

fn literal(level: usize, value: bool, order: &[Rc<str>]) -> AstRef {
    let var = AstNode::variable(order[level].clone());
    if value { var } else { AstNode::not(var) }
}

fn conjunction_of(terms: Vec<AstRef>) -> AstRef {
    let mut iter = terms.into_iter();
    let Some(first) = iter.next() else {
        return AstNode::constant(true);
    };
    iter.fold(first, |acc, term| AstNode::binary(BinOp::And, acc, term))
}

fn disjunction_of(terms: Vec<AstRef>) -> AstRef {
    let mut iter = terms.into_iter();
    let Some(first) = iter.next() else {
        return AstNode::constant(false);
    };
    iter.fold(first, |acc, term| AstNode::binary(BinOp::Or, acc, term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expression {
        let mut reg = OperatorRegistry::with_defaults();
        let cfg = ParserConfig::default();
        Expression::parse(source, &mut reg, &cfg).unwrap()
    }

    #[test]
    fn evaluates_by_position_and_name() {
        let expr = parse("A & B");
        assert!(expr.evaluate(&[true, true]).unwrap());
        assert!(!expr.evaluate(&[true, false]).unwrap());

        let mut named = HashMap::new();
        named.insert("A".to_string(), true);
        named.insert("B".to_string(), false);
        assert!(!expr.evaluate_named(&named).unwrap());
    }

    #[test]
    fn compiled_evaluator_agrees_with_evaluate() {
        let expr = parse("A => B");
        let compiled = expr.compile(true).unwrap();
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(compiled.evaluate(&[a, b]), expr.evaluate(&[a, b]).unwrap());
            }
        }
    }

    #[test]
    fn with_variable_order_reorders_without_reparsing() {
        let expr = parse("A & B");
        assert_eq!(expr.variable_order(), &[Rc::from("A"), Rc::from("B")]);
        let reordered = expr.with_variable_order(&OrderingStrategy::Composite(vec![OrderingStrategy::Random {
            seed: Some(1),
        }]));
        assert_eq!(reordered.variable_order().len(), 2);
        assert!(reordered.ast == expr.ast);
    }

    #[test]
    fn minimize_preserves_semantics() {
        let expr = parse("(A & B) | (A & ~B)");
        let minimized = expr.minimize().unwrap();
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(expr.evaluate(&[a, b]).unwrap(), minimized.evaluate(&[a, b]).unwrap());
            }
        }
    }

    #[test]
    fn dnf_and_cnf_are_semantically_equivalent() {
        let expr = parse("(A & B) | (~A & C)");
        let dnf = expr.to_dnf().unwrap();
        let cnf = expr.to_cnf().unwrap();
        for a in [false, true] {
            for b in [false, true] {
                for c in [false, true] {
                    let inputs = [a, b, c];
                    let expected = expr.evaluate(&inputs).unwrap();
                    assert_eq!(dnf.evaluate(&inputs).unwrap(), expected);
                    assert_eq!(cnf.evaluate(&inputs).unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn tautology_contradiction_and_satisfiability() {
        let taut = parse("A | ~A");
        assert!(taut.is_tautology().unwrap());
        assert!(!taut.is_contradiction().unwrap());
        assert!(taut.is_satisfiable().unwrap());

        let contra = parse("A & ~A");
        assert!(contra.is_contradiction().unwrap());
        assert!(!contra.is_tautology().unwrap());
        assert!(!contra.is_satisfiable().unwrap());

        let sat = parse("A & B");
        assert!(sat.is_satisfiable().unwrap());
        assert!(!sat.is_tautology().unwrap());
    }

    #[test]
    fn equivalent_to_ignores_syntactic_differences() {
        let lhs = parse("A & B");
        let rhs = parse("B & A");
        assert!(lhs.equivalent_to(&rhs).unwrap());

        let different = parse("A | B");
        assert!(!lhs.equivalent_to(&different).unwrap());
    }

    #[test]
    fn structural_equals_requires_literal_ast_match() {
        let lhs = parse("A & B");
        let same = parse("A & B");
        assert!(lhs.structural_equals(&same));

        // Equivalent under commutativity, but not the same AST shape.
        let commuted = parse("B & A");
        assert!(lhs.equivalent_to(&commuted).unwrap());
        assert!(!lhs.structural_equals(&commuted));

        let different = parse("A & C");
        assert!(!lhs.structural_equals(&different));
    }
}

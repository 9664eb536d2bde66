use boolforge::prelude::*;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Build a medium-sized random formula over `num_vars` variables, seeded for determinism.
fn build_random_formula(num_vars: usize, budget: usize, seed: u64) -> Expression {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    fn next(budget: usize, num_vars: usize, rng: &mut impl Rng) -> AstRef {
        if budget == 0 || rng.random_bool(0.3) {
            return AstNode::variable(format!("v{}", rng.random_range(0..num_vars)));
        }
        let left = next(budget - 1, num_vars, rng);
        match rng.random_range(0..8) {
            0 => AstNode::binary(BinOp::And, left, next(budget - 1, num_vars, rng)),
            1 => AstNode::binary(BinOp::Or, left, next(budget - 1, num_vars, rng)),
            2 => AstNode::binary(BinOp::Xor, left, next(budget - 1, num_vars, rng)),
            3 => AstNode::binary(BinOp::Implies, left, next(budget - 1, num_vars, rng)),
            4 => AstNode::binary(BinOp::Iff, left, next(budget - 1, num_vars, rng)),
            5 => AstNode::binary(BinOp::Nand, left, next(budget - 1, num_vars, rng)),
            6 => AstNode::binary(BinOp::Nor, left, next(budget - 1, num_vars, rng)),
            7 => AstNode::not(left),
            _ => unreachable!(),
        }
    }

    let ast = next(budget, num_vars, &mut rng);
    Expression::from_ast(ast)
}

fn bench_parse(c: &mut Criterion) {
    let mut registry = OperatorRegistry::with_defaults();
    let config = ParserConfig::default();
    let source = "((A & B) | (C => D)) <=> (~E ^ (F !& G))";

    c.bench_function("parse_shunting_yard", |b| {
        b.iter(|| black_box(Expression::parse(source, &mut registry, &config).unwrap()));
    });

    let pratt_config = ParserConfig { strategy: Strategy::Pratt, ..ParserConfig::default() };
    c.bench_function("parse_pratt", |b| {
        b.iter(|| black_box(Expression::parse(source, &mut registry, &pratt_config).unwrap()));
    });
}

fn bench_rewrite(c: &mut Criterion) {
    let expr = build_random_formula(10, 8, 0x42);

    c.bench_function("normalize", |b| {
        b.iter(|| black_box(expr.normalize()));
    });

    c.bench_function("canonicalize", |b| {
        b.iter(|| black_box(expr.canonicalize()));
    });
}

fn bench_bdd_build(c: &mut Criterion) {
    let small = build_random_formula(8, 6, 0x1);
    let large = build_random_formula(16, 10, 0x2);

    c.bench_function("bdd_build_small", |b| {
        b.iter(|| black_box(small.is_satisfiable().unwrap()));
    });

    c.bench_function("bdd_build_large", |b| {
        b.iter(|| black_box(large.is_satisfiable().unwrap()));
    });
}

fn bench_ordering(c: &mut Criterion) {
    let expr = build_random_formula(12, 9, 0x3);

    c.bench_function("order_alphabetical", |b| {
        b.iter(|| black_box(expr.with_variable_order(&OrderingStrategy::Alphabetical)));
    });

    c.bench_function("order_sifting", |b| {
        b.iter(|| black_box(expr.with_variable_order(&OrderingStrategy::Sifting)));
    });

    c.bench_function("order_auto", |b| {
        b.iter(|| black_box(expr.with_variable_order(&OrderingStrategy::Auto)));
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let expr = build_random_formula(10, 8, 0x4);
    let inputs: Vec<bool> = (0..expr.variable_order().len()).map(|i| i % 2 == 0).collect();
    let compiled = expr.compile(true).unwrap();

    c.bench_function("evaluate_tree_walk", |b| {
        b.iter(|| black_box(expr.evaluate(&inputs).unwrap()));
    });

    c.bench_function("evaluate_compiled", |b| {
        b.iter(|| black_box(compiled.evaluate(&inputs)));
    });
}

fn bench_pretty_print(c: &mut Criterion) {
    let expr = build_random_formula(10, 9, 0x5);
    c.bench_function("pretty_string", |b| {
        b.iter(|| black_box(expr.ast().pretty_string()));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_rewrite,
    bench_bdd_build,
    bench_ordering,
    bench_evaluate,
    bench_pretty_print,
);
criterion_main!(benches);

use boolforge::prelude::*;

fn main() {
    let _ = env_logger::try_init();

    let mut registry = OperatorRegistry::with_defaults();
    let config = ParserConfig::default();

    let expr = Expression::parse("(A & B) | (A & ~B)", &mut registry, &config).unwrap();
    println!("parsed:     {}", expr.ast().pretty_string());

    let minimized = expr.minimize().unwrap();
    println!("minimized:  {}", minimized.ast().pretty_string());

    let dnf = expr.to_dnf().unwrap();
    println!("dnf:        {}", dnf.ast().pretty_string());

    println!("tautology:  {}", expr.is_tautology().unwrap());
    println!("equivalent: {}", expr.equivalent_to(&minimized).unwrap());

    println!();
    print!("{}", boolforge::pretty::truth_table(minimized.ast(), minimized.variable_order()));
}

use std::io::{self, BufRead, Write};

use boolforge::prelude::*;
use clap::{Parser, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Interactive read-eval-print loop over boolean expressions.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Parser strategy to use for every line.
    #[arg(long, value_enum, default_value_t = StrategyArg::ShuntingYard)]
    strategy: StrategyArg,

    /// Disable unicode normalization of input lines.
    #[arg(long, default_value_t = false)]
    no_unicode_normalization: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum StrategyArg {
    ShuntingYard,
    Pratt,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::ShuntingYard => Strategy::ShuntingYard,
            StrategyArg::Pratt => Strategy::Pratt,
        }
    }
}

const HELP: &str = "\
commands:
  :help              show this message
  :order <strategy>  reorder variables (alphabetical | frequency | random | sifting | auto)
  :dnf               print the disjunctive normal form
  :cnf               print the conjunctive normal form
  :truth             print the truth table
  :tautology         print whether the formula is a tautology
  :sat               print whether the formula is satisfiable
  :quit              exit the repl
anything else is parsed as a new boolean expression.";

fn main() {
    let _ = env_logger::try_init();

    let args = Args::parse();
    let config = ParserConfig {
        strategy: args.strategy.into(),
        enable_unicode_normalization: !args.no_unicode_normalization,
        ..ParserConfig::default()
    };
    let mut registry = OperatorRegistry::with_defaults();

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stdout = stdout.lock();
    let mut error_color = ColorSpec::new();
    error_color.set_fg(Some(Color::Red)).set_intense(true);

    println!("boolforge repl. type an expression, or :help for commands.");

    let mut current: Option<Expression> = None;
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            ":quit" | ":q" => break,
            ":help" => println!("{HELP}"),
            ":dnf" => with_expr(&current, &mut stdout, &error_color, |e| {
                println!("{}", e.to_dnf()?.ast().pretty_string());
                Ok(())
            }),
            ":cnf" => with_expr(&current, &mut stdout, &error_color, |e| {
                println!("{}", e.to_cnf()?.ast().pretty_string());
                Ok(())
            }),
            ":truth" => with_expr(&current, &mut stdout, &error_color, |e| {
                print!("{}", boolforge::pretty::truth_table(e.ast(), e.variable_order()));
                Ok(())
            }),
            ":tautology" => with_expr(&current, &mut stdout, &error_color, |e| {
                println!("{}", e.is_tautology()?);
                Ok(())
            }),
            ":sat" => with_expr(&current, &mut stdout, &error_color, |e| {
                println!("{}", e.is_satisfiable()?);
                Ok(())
            }),
            _ if line.starts_with(":order ") => {
                let requested = line.strip_prefix(":order ").unwrap().trim();
                let strategy = match requested {
                    "alphabetical" => Some(OrderingStrategy::Alphabetical),
                    "frequency" => Some(OrderingStrategy::Frequency),
                    "random" => Some(OrderingStrategy::Random { seed: None }),
                    "sifting" => Some(OrderingStrategy::Sifting),
                    "auto" => Some(OrderingStrategy::Auto),
                    other => {
                        writeln!(stdout, "unknown ordering strategy: {other:?}").ok();
                        None
                    }
                };
                match (strategy, &current) {
                    (Some(strategy), Some(expr)) => {
                        let reordered = expr.with_variable_order(&strategy);
                        println!("order: {:?}", reordered.variable_order());
                        current = Some(reordered);
                    }
                    (Some(_), None) => {
                        stdout.set_color(&error_color).ok();
                        writeln!(stdout, "no expression parsed yet").ok();
                        stdout.reset().ok();
                    }
                    (None, _) => {}
                }
            }
            source => match Expression::parse(source, &mut registry, &config) {
                Ok(expr) => {
                    println!("{}", expr.ast().pretty_string());
                    current = Some(expr);
                }
                Err(err) => {
                    stdout.set_color(&error_color).ok();
                    writeln!(stdout, "{}", err.format_with_source(source)).ok();
                    stdout.reset().ok();
                }
            },
        }
    }
}

fn with_expr<W: WriteColor + Write>(
    current: &Option<Expression>,
    stdout: &mut W,
    error_color: &ColorSpec,
    f: impl FnOnce(&Expression) -> Result<(), EvalError>,
) {
    match current {
        Some(expr) => {
            if let Err(err) = f(expr) {
                stdout.set_color(error_color).ok();
                writeln!(stdout, "{err}").ok();
                stdout.reset().ok();
            }
        }
        None => {
            stdout.set_color(error_color).ok();
            writeln!(stdout, "no expression parsed yet").ok();
            stdout.reset().ok();
        }
    }
}

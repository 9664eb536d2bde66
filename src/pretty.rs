//! Pretty-printing: a width-aware, depth-colored renderer for [`AstRef`], plus a truth-table
//! printer.
//!
//! Role
//! - Builds a `pretty::RcDoc` document annotated with [`Style`], the same general shape as the
//!   teacher's own expression pretty-printer: parentheses are colored by nesting depth so a
//!   matching pair is visually obvious, operators and identifiers get their own styles, and a
//!   `termcolor`-backed renderer provides TTY-aware colored output alongside a plain-string form.
//! - Precedence mirrors [`crate::registry::OperatorRegistry::with_defaults`]'s table; parentheses
//!   are only emitted where omitting them would change how the text re-parses.
use std::io::{self, Write};
use std::rc::Rc;

use pretty::{RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::{AstNode, AstRef, BinOp, UnOp};
use crate::eval::evaluate_tree;
use crate::rewrite::var_index::{assign_indices, index_map_from_order};

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Operator,
    Ident,
    Constant,
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Paren(depth) => {
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    5 => Color::Magenta,
                    _ => unreachable!(),
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Ident => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Constant => {
                s.set_fg(Some(Color::Magenta)).set_bold(true);
            }
        }
        s
    }
}

fn op(s: &'static str) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Operator)
}

fn ident(name: &Rc<str>) -> RcDoc<'static, Style> {
    RcDoc::as_string(name.to_string()).annotate(Style::Ident)
}

#[inline]
fn lparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

/// Binding power for a binary operator, mirroring `OperatorRegistry::with_defaults`.
fn precedence(op: BinOp) -> u8 {
    match op {
        BinOp::And | BinOp::Nand => 4,
        BinOp::Xor => 3,
        BinOp::Or | BinOp::Nor => 2,
        BinOp::Implies => 1,
        BinOp::Iff => 0,
    }
}

const NOT_PRECEDENCE: u8 = 5;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Whether `child` needs parens when printed as `parent`'s `side` operand.
fn requires_parens(child: &AstRef, parent: BinOp, side: Side) -> bool {
    let AstNode::Binary { op: child_op, .. } = &**child else {
        return false;
    };
    let child_prec = precedence(*child_op);
    let parent_prec = precedence(parent);
    if child_prec != parent_prec {
        return child_prec < parent_prec;
    }
    if *child_op != parent {
        return true;
    }
    if parent == BinOp::Implies {
        // Right-associative: only the left operand needs disambiguating parens.
        return side == Side::Left;
    }
    side == Side::Right && !parent.is_associative()
}

fn to_doc(node: &AstRef, depth: u8) -> RcDoc<'static, Style> {
    match &**node {
        AstNode::Constant(true) => RcDoc::as_string("true").annotate(Style::Constant),
        AstNode::Constant(false) => RcDoc::as_string("false").annotate(Style::Constant),
        AstNode::Variable { name, .. } => ident(name),
        AstNode::Unary { op: UnOp::Not, operand } => {
            let needs_parens = matches!(&**operand, AstNode::Binary { .. });
            let inner = to_doc(operand, depth + 1);
            op("~").append(if needs_parens {
                lparen(depth).append(inner).append(rparen(depth)).group()
            } else {
                inner
            })
        }
        AstNode::Binary { op: bin_op, left, right } => {
            let left_parens = requires_parens(left, *bin_op, Side::Left);
            let right_parens = requires_parens(right, *bin_op, Side::Right);
            let left_doc = to_doc(left, depth + 1);
            let left_doc = if left_parens {
                lparen(depth).append(left_doc).append(rparen(depth)).group()
            } else {
                left_doc
            };
            let right_doc = to_doc(right, depth + 1);
            let right_doc = if right_parens {
                lparen(depth).append(right_doc).append(rparen(depth)).group()
            } else {
                right_doc
            };
            left_doc.append(RcDoc::space()).append(op(bin_op.symbol())).append(RcDoc::space()).append(right_doc).group()
        }
    }
}

struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'_, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<W: WriteColor + Write> pretty::Render for ColorWriter<'_, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

fn render_to<W: WriteColor + Write>(doc: &RcDoc<'_, Style>, width: usize, out: &mut W) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for an [`AstRef`].
pub trait PrettyAst {
    fn pretty_doc(&self) -> RcDoc<'static, Style>;
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;
    fn pretty_print(&self) -> io::Result<()>;
    fn pretty_string(&self) -> String;
}

impl PrettyAst for AstRef {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc(self, 0)
    }

    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)
    }

    fn pretty_string(&self) -> String {
        let mut buf = String::new();
        let _ = self.pretty_doc().render_fmt(80, &mut buf);
        buf
    }
}

/// Render an exhaustive truth table for `ast` over `order`, one row per assignment, as
/// `v1 v2 ... vn | result`. Exhaustive in `2^order.len()`: only sensible for small variable
/// counts.
pub fn truth_table(ast: &AstRef, order: &[Rc<str>]) -> String {
    let indices = index_map_from_order(order);
    let indexed = assign_indices(ast, &indices).expect("ast only references variables in order");

    let mut out = String::new();
    for name in order {
        out.push_str(name);
        out.push(' ');
    }
    out.push_str("| result\n");

    let n = order.len();
    for assignment in 0..(1u64 << n) {
        let inputs: Vec<bool> = (0..n).map(|i| (assignment >> i) & 1 == 1).collect();
        let result = evaluate_tree(&indexed, &inputs).expect("fully indexed, correctly sized inputs");
        for (i, name) in order.iter().enumerate() {
            out.push_str(if inputs[i] { "1" } else { "0" });
            out.push_str(&" ".repeat(name.len()));
        }
        out.push_str("| ");
        out.push_str(if result { "1" } else { "0" });
        out.push('\n');
    }
    out
}

//! Shunting-yard parser strategy: the default.
//!
//! Role
//! - Classic operator-precedence parsing with an explicit operand stack and operator stack,
//!   reducing eagerly whenever a lower- (or equal-, for left-associative operators) precedence
//!   operator or a closing parenthesis is encountered.
//! - Assumes the token stream already passed [`crate::parser::validator::validate`]; any
//!   inconsistency found here is an internal-logic fault, not a user-facing syntax error.
use crate::ast::{AstNode, AstRef};
use crate::error::ParseError;
use crate::registry::OperatorRegistry;
use crate::tokenizer::{Arity, Token, TokenKind};

enum StackOp<'a> {
    LeftParen,
    Op(&'a Token),
}

/// Parse an already-validated token stream into an AST.
pub fn parse(tokens: &[Token], registry: &OperatorRegistry) -> Result<AstRef, ParseError> {
    let mut operands: Vec<AstRef> = Vec::new();
    let mut operators: Vec<StackOp> = Vec::new();

    for tok in tokens {
        match &tok.kind {
            TokenKind::Identifier => operands.push(AstNode::variable(tok.lexeme.as_str())),
            TokenKind::Constant(v) => operands.push(AstNode::constant(*v)),
            TokenKind::LeftParen => operators.push(StackOp::LeftParen),
            TokenKind::RightParen => {
                while let Some(StackOp::Op(_)) = operators.last() {
                    let Some(StackOp::Op(op_tok)) = operators.pop() else {
                        unreachable!()
                    };
                    reduce(&mut operands, op_tok, registry)?;
                }
                match operators.pop() {
                    Some(StackOp::LeftParen) => {}
                    _ => return Err(ParseError::invalid_sequence("unmatched ')' in shunting-yard")),
                }
            }
            TokenKind::Operator { canonical, .. } => {
                let prec = registry
                    .precedence(canonical)
                    .ok_or_else(|| ParseError::invalid_sequence(format!("unknown operator {canonical:?}")))?;
                let right_assoc = registry.is_right_associative(canonical);
                while let Some(StackOp::Op(top)) = operators.last() {
                    let TokenKind::Operator { canonical: top_canonical, .. } = &top.kind else {
                        unreachable!()
                    };
                    let top_prec = registry.precedence(top_canonical).unwrap();
                    let should_reduce = if right_assoc { top_prec > prec } else { top_prec >= prec };
                    if !should_reduce {
                        break;
                    }
                    let Some(StackOp::Op(op_tok)) = operators.pop() else {
                        unreachable!()
                    };
                    reduce(&mut operands, op_tok, registry)?;
                }
                operators.push(StackOp::Op(tok));
            }
        }
    }

    while let Some(top) = operators.pop() {
        match top {
            StackOp::LeftParen => return Err(ParseError::invalid_sequence("unmatched '(' in shunting-yard")),
            StackOp::Op(op_tok) => reduce(&mut operands, op_tok, registry)?,
        }
    }

    if operands.len() != 1 {
        return Err(ParseError::invalid_sequence("shunting-yard left more than one operand on the stack"));
    }
    Ok(operands.pop().unwrap())
}

fn reduce(operands: &mut Vec<AstRef>, tok: &Token, registry: &OperatorRegistry) -> Result<(), ParseError> {
    let TokenKind::Operator { canonical, arity } = &tok.kind else {
        unreachable!("reduce called on a non-operator token")
    };
    match arity {
        Arity::Unary => {
            let operand = pop_operand(operands)?;
            let _ = registry.unary_op_for(canonical);
            operands.push(AstNode::not(operand));
        }
        Arity::Binary => {
            let right = pop_operand(operands)?;
            let left = pop_operand(operands)?;
            let op = registry
                .binary_op_for(canonical)
                .ok_or_else(|| ParseError::invalid_sequence(format!("unknown binary operator {canonical:?}")))?;
            operands.push(AstNode::binary(op, left, right));
        }
    }
    Ok(())
}

fn pop_operand(operands: &mut Vec<AstRef>) -> Result<AstRef, ParseError> {
    operands
        .pop()
        .ok_or_else(|| ParseError::invalid_sequence("operator is missing an operand"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, BinOp};
    use crate::config::ParserConfig;
    use crate::tokenizer::tokenize;

    fn parse_str(src: &str) -> AstRef {
        let mut reg = OperatorRegistry::with_defaults();
        let cfg = ParserConfig::default();
        let tokens = tokenize(src, &mut reg, &cfg).unwrap();
        parse(&tokens, &reg).unwrap()
    }

    #[test]
    fn parses_simple_conjunction() {
        let ast = parse_str("A & B");
        match &*ast {
            AstNode::Binary { op: BinOp::And, .. } => {}
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn respects_precedence_over_parentheses() {
        // & binds tighter than |, so "A | B & C" parses as "A | (B & C)".
        let ast = parse_str("A | B & C");
        match &*ast {
            AstNode::Binary { op: BinOp::Or, right, .. } => match &**right {
                AstNode::Binary { op: BinOp::And, .. } => {}
                other => panic!("expected And on the right of Or, got {other:?}"),
            },
            other => panic!("expected Or at the root, got {other:?}"),
        }
    }

    #[test]
    fn implies_is_right_associative() {
        // "A => B => C" should parse as "A => (B => C)".
        let ast = parse_str("A => B => C");
        match &*ast {
            AstNode::Binary { op: BinOp::Implies, right, .. } => match &**right {
                AstNode::Binary { op: BinOp::Implies, .. } => {}
                other => panic!("expected nested Implies on the right, got {other:?}"),
            },
            other => panic!("expected Implies at the root, got {other:?}"),
        }
    }

    #[test]
    fn parentheses_override_precedence() {
        let ast = parse_str("(A | B) & C");
        match &*ast {
            AstNode::Binary { op: BinOp::And, left, .. } => match &**left {
                AstNode::Binary { op: BinOp::Or, .. } => {}
                other => panic!("expected Or on the left of And, got {other:?}"),
            },
            other => panic!("expected And at the root, got {other:?}"),
        }
    }
}

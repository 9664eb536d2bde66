//! Pratt (top-down operator-precedence) parser strategy.
//!
//! Role
//! - Alternative to [`crate::parser::shunting_yard`], selected via
//!   [`crate::config::Strategy::Pratt`]. Produces AST's with identical semantics to the
//!   shunting-yard strategy for any input that passed the structural validator; the two exist
//!   side by side so callers can pick whichever recursion style suits their call stack depth.
//! - Null-denotation (`nud`) handles atoms, parenthesized groups, and prefix unary (right binding
//!   power equal to the unary operator's own precedence). Left-denotation (`led`) consumes binary
//!   operators while their precedence is at least the caller's minimum binding power.
use crate::ast::{AstNode, AstRef};
use crate::error::ParseError;
use crate::registry::OperatorRegistry;
use crate::tokenizer::{Arity, Token, TokenKind};

struct Pratt<'a> {
    tokens: &'a [Token],
    pos: usize,
    registry: &'a OperatorRegistry,
}

impl<'a> Pratt<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<AstRef, ParseError> {
        let mut lhs = self.parse_nud()?;
        loop {
            let Some(tok) = self.peek() else { break };
            let TokenKind::Operator { canonical, arity: Arity::Binary } = &tok.kind else {
                break;
            };
            let prec = self
                .registry
                .precedence(canonical)
                .ok_or_else(|| ParseError::invalid_sequence(format!("unknown operator {canonical:?}")))?;
            if prec < min_bp {
                break;
            }
            let tok = self.advance().unwrap();
            let TokenKind::Operator { canonical, .. } = &tok.kind else {
                unreachable!()
            };
            let op = self
                .registry
                .binary_op_for(canonical)
                .ok_or_else(|| ParseError::invalid_sequence(format!("unknown binary operator {canonical:?}")))?;
            let right_assoc = self.registry.is_right_associative(canonical);
            let next_min_bp = if right_assoc { prec } else { prec + 1 };
            let rhs = self.parse_expr(next_min_bp)?;
            lhs = AstNode::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_nud(&mut self) -> Result<AstRef, ParseError> {
        let tok = self
            .advance()
            .ok_or_else(|| ParseError::invalid_sequence("unexpected end of input"))?;
        match &tok.kind {
            TokenKind::LeftParen => {
                let inner = self.parse_expr(0)?;
                match self.advance() {
                    Some(t) if t.kind == TokenKind::RightParen => {}
                    _ => return Err(ParseError::invalid_sequence("expected ')' to close group")),
                }
                Ok(inner)
            }
            TokenKind::Identifier => Ok(AstNode::variable(tok.lexeme.as_str())),
            TokenKind::Constant(v) => Ok(AstNode::constant(*v)),
            TokenKind::Operator { canonical, arity: Arity::Unary } => {
                let rbp = self
                    .registry
                    .precedence(canonical)
                    .ok_or_else(|| ParseError::invalid_sequence(format!("unknown operator {canonical:?}")))?;
                let operand = self.parse_expr(rbp)?;
                Ok(AstNode::not(operand))
            }
            other => Err(ParseError::invalid_sequence(format!(
                "unexpected token in operand position: {other:?}"
            ))),
        }
    }
}

/// Parse an already-validated token stream into an AST.
pub fn parse(tokens: &[Token], registry: &OperatorRegistry) -> Result<AstRef, ParseError> {
    let mut parser = Pratt { tokens, pos: 0, registry };
    let result = parser.parse_expr(0)?;
    if parser.pos != tokens.len() {
        return Err(ParseError::invalid_sequence("trailing tokens after a complete expression"));
    }
    Ok(result)
}

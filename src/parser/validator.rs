//! Structural token validator: enforces context rules before either parser strategy runs.
//!
//! Role
//! - Walks the token stream once, tracking whether the *next* token is expected to open a new
//!   operand (`Prefix` slot) or continue/close the current one (`Infix` slot).
//! - Catches every malformed-sequence case named in [`crate::error::ParseError`] before a parser
//!   strategy ever sees the tokens, so neither strategy needs its own error recovery.
use crate::error::ParseError;
use crate::tokenizer::{Arity, Token, TokenKind};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Expecting an operand, `(`, or a unary operator.
    Prefix,
    /// Expecting a binary operator, `)`, or end of input.
    Infix,
}

/// Validate that `tokens` forms a structurally sound expression. Does not build an AST; a
/// successful return only promises that either parser strategy can consume the stream without
/// hitting a context error of its own.
pub fn validate(tokens: &[Token]) -> Result<(), ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let mut slot = Slot::Prefix;
    let mut paren_depth: usize = 0;

    for (i, tok) in tokens.iter().enumerate() {
        match &tok.kind {
            TokenKind::LeftParen => {
                if slot == Slot::Infix {
                    return Err(ParseError::InvalidTokenBeforeOpenParen {
                        token_index: i,
                        char_index: tok.char_index,
                        lexeme: tok.lexeme.clone(),
                    });
                }
                paren_depth += 1;
                slot = Slot::Prefix;
            }
            TokenKind::RightParen => {
                if slot == Slot::Prefix || paren_depth == 0 {
                    return Err(ParseError::UnmatchedClosingParenthesis {
                        token_index: i,
                        char_index: tok.char_index,
                    });
                }
                paren_depth -= 1;
                slot = Slot::Infix;
            }
            TokenKind::Identifier | TokenKind::Constant(_) => {
                if slot == Slot::Infix {
                    return Err(ParseError::InvalidTokenAfterCloseParen {
                        token_index: i,
                        char_index: tok.char_index,
                        lexeme: tok.lexeme.clone(),
                    });
                }
                slot = Slot::Infix;
            }
            TokenKind::Operator { arity: Arity::Unary, .. } => {
                if slot == Slot::Infix {
                    return Err(ParseError::InvalidBinaryOperatorContext {
                        token_index: i,
                        char_index: tok.char_index,
                        lexeme: tok.lexeme.clone(),
                    });
                }
                slot = Slot::Prefix;
            }
            TokenKind::Operator { arity: Arity::Binary, .. } => {
                if slot == Slot::Prefix {
                    if i == 0 {
                        return Err(ParseError::BinaryOperatorAtEnds {
                            token_index: i,
                            char_index: tok.char_index,
                            lexeme: tok.lexeme.clone(),
                        });
                    }
                    return Err(ParseError::InvalidBinaryOperatorContext {
                        token_index: i,
                        char_index: tok.char_index,
                        lexeme: tok.lexeme.clone(),
                    });
                }
                slot = Slot::Prefix;
            }
        }
    }

    if paren_depth > 0 {
        return Err(ParseError::UnmatchedParentheses { open: paren_depth });
    }

    if slot == Slot::Prefix {
        let last = tokens.last().expect("tokens checked non-empty above");
        return match &last.kind {
            TokenKind::Operator { arity: Arity::Binary, .. } => Err(ParseError::BinaryOperatorAtEnds {
                token_index: tokens.len() - 1,
                char_index: last.char_index,
                lexeme: last.lexeme.clone(),
            }),
            TokenKind::Operator { arity: Arity::Unary, .. } => Err(ParseError::UnaryOperatorMissingOperand {
                token_index: tokens.len() - 1,
                char_index: last.char_index,
                lexeme: last.lexeme.clone(),
            }),
            // A dangling '(' with matched depth-0 count cannot reach here: paren_depth > 0 would
            // already have been caught above. Unreachable in practice.
            _ => Err(ParseError::invalid_sequence("expression ends mid-operand")),
        };
    }

    Ok(())
}

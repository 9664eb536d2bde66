//! Error taxonomy for tokenizing, parsing, and evaluating boolean expressions.
//!
//! Role
//! - One variant per fault category observed by the tokenizer, structural validator, and the
//!   two parser strategies.
//! - Every variant carries enough positional information (token index, char span, lexeme) to
//!   reproduce the offending source line with a caret, the way a compiler diagnostic would.
//!
//! Propagation policy
//! - No recovery is attempted anywhere in this crate: the first fault observed is returned.
//! - [`ParseError::InvalidTokenSequence`] is the catch-all used by [`crate::parser::try_parse`]
//!   to wrap any downstream violation that does not already have a dedicated variant.
use thiserror::Error;

/// A single suggested alias, offered when a token cannot be recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub alias: String,
    pub distance: usize,
}

/// Category label attached to a token for diagnostic purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    LeftParen,
    RightParen,
    Operator,
    Identifier,
    Constant,
    Unknown,
}

impl std::fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenCategory::LeftParen => "left-paren",
            TokenCategory::RightParen => "right-paren",
            TokenCategory::Operator => "operator",
            TokenCategory::Identifier => "identifier",
            TokenCategory::Constant => "constant",
            TokenCategory::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Span of an offending lexeme in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

/// All faults that can be raised while tokenizing or parsing a boolean expression.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("empty expression")]
    EmptyExpression,

    #[error("unexpected token before '(' at char {char_index}: {lexeme:?}")]
    InvalidTokenBeforeOpenParen {
        token_index: usize,
        char_index: usize,
        lexeme: String,
    },

    #[error("unexpected token after ')' at char {char_index}: {lexeme:?}")]
    InvalidTokenAfterCloseParen {
        token_index: usize,
        char_index: usize,
        lexeme: String,
    },

    #[error("unary operator {lexeme:?} at char {char_index} is missing its operand")]
    UnaryOperatorMissingOperand {
        token_index: usize,
        char_index: usize,
        lexeme: String,
    },

    #[error("binary operator {lexeme:?} at char {char_index} cannot appear at the start or end of an expression")]
    BinaryOperatorAtEnds {
        token_index: usize,
        char_index: usize,
        lexeme: String,
    },

    #[error("binary operator {lexeme:?} at char {char_index} has an invalid neighbor")]
    InvalidBinaryOperatorContext {
        token_index: usize,
        char_index: usize,
        lexeme: String,
    },

    #[error("unmatched closing parenthesis at char {char_index}")]
    UnmatchedClosingParenthesis { token_index: usize, char_index: usize },

    #[error("unmatched parentheses ({open} unclosed)")]
    UnmatchedParentheses { open: usize },

    #[error("unknown token {lexeme:?} at char {char_index}")]
    UnknownToken {
        token_index: usize,
        char_index: usize,
        char_code: Option<u32>,
        lexeme: String,
        suggestions: Vec<Suggestion>,
    },

    #[error("invalid token sequence: {cause}")]
    InvalidTokenSequence { cause: String },
}

impl ParseError {
    /// Char index at which the fault was detected, when applicable.
    pub fn char_index(&self) -> Option<usize> {
        match self {
            ParseError::EmptyExpression => None,
            ParseError::InvalidTokenBeforeOpenParen { char_index, .. }
            | ParseError::InvalidTokenAfterCloseParen { char_index, .. }
            | ParseError::UnaryOperatorMissingOperand { char_index, .. }
            | ParseError::BinaryOperatorAtEnds { char_index, .. }
            | ParseError::InvalidBinaryOperatorContext { char_index, .. }
            | ParseError::UnmatchedClosingParenthesis { char_index, .. }
            | ParseError::UnknownToken { char_index, .. } => Some(*char_index),
            ParseError::UnmatchedParentheses { .. } | ParseError::InvalidTokenSequence { .. } => {
                None
            }
        }
    }

    /// Render a two-line diagnostic: the offending source line, followed by a caret marking
    /// the fault column.
    pub fn format_with_source(&self, source: &str) -> String {
        let Some(idx) = self.char_index() else {
            return self.to_string();
        };

        let mut line_start = 0;
        let mut line_end = source.len();
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                if i < idx {
                    line_start = i + 1;
                } else {
                    line_end = i;
                    break;
                }
            }
        }
        let line = &source[line_start..line_end];
        let column = source[line_start..idx].chars().count();
        let caret_line: String = std::iter::repeat(' ')
            .take(column)
            .chain(std::iter::once('^'))
            .collect();
        format!("{self}\n{line}\n{caret_line}")
    }

    /// Wrap any error as the catch-all [`ParseError::InvalidTokenSequence`], preserving the
    /// original message as the cause.
    pub fn invalid_sequence(cause: impl std::fmt::Display) -> Self {
        ParseError::InvalidTokenSequence {
            cause: cause.to_string(),
        }
    }
}

/// Faults raised while evaluating an AST against a set of inputs.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("expected {expected} inputs, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },

    #[error("missing value for variable {name:?}")]
    MissingVariable { name: String },

    #[error("variable {name:?} was never assigned an index")]
    UnindexedVariable { name: String },
}

//! Unicode-aware lexer: turns source text into a finite sequence of [`Token`]s.
//!
//! Role
//! - Pure function of `(source, registry, config)`: no shared state, no suspension points.
//! - Per-character dispatch: whitespace / paren / digit-constant / alpha-identifier /
//!   operator-candidate / error — the closest thing this crate has to a state machine.
//!
//! Unicode handling
//! - When [`crate::config::ParserConfig::enable_unicode_normalization`] is set, the source is
//!   first folded through NFKC (`unicode-normalization`) so visually- or semantically-equivalent
//!   code points (e.g. fullwidth parens, compatibility ligatures) compare identically.
//! - Token positions are reported as 0-based *character* offsets, not byte offsets, so
//!   diagnostics line up with what a user counts when reading the source.
use unicode_normalization::UnicodeNormalization;

use crate::config::ParserConfig;
use crate::error::{ParseError, Suggestion};
use crate::registry::{OperatorRegistry, ResolvedKind};
use crate::utils::levenshtein;

/// Arity of an operator token, carried alongside its canonical symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

/// The kind of a scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Operator { canonical: String, arity: Arity },
    Identifier,
    Constant(bool),
}

/// A single scanned token: its kind, the literal text that produced it, and its 0-based
/// character offset in the (possibly normalized) source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub char_index: usize,
}

impl Token {
    pub fn category(&self) -> crate::error::TokenCategory {
        use crate::error::TokenCategory::*;
        match &self.kind {
            TokenKind::LeftParen => LeftParen,
            TokenKind::RightParen => RightParen,
            TokenKind::Operator { .. } => Operator,
            TokenKind::Identifier => Identifier,
            TokenKind::Constant(_) => Constant,
        }
    }
}

/// Scan `source` into a sequence of tokens, using `registry` to resolve aliases and `config` to
/// control normalization and suggestion behavior.
///
/// `registry` is taken mutably because the longest-match candidate list is rebuilt lazily on
/// first use after a registration; tokenizing itself never mutates the alias tables.
pub fn tokenize(
    source: &str,
    registry: &mut OperatorRegistry,
    config: &ParserConfig,
) -> Result<Vec<Token>, ParseError> {
    let owned_nfkc;
    let text: &str = if config.enable_unicode_normalization {
        owned_nfkc = source.nfkc().collect::<String>();
        &owned_nfkc
    } else {
        source
    };

    let mut tokens = Vec::new();
    let mut rest = text;
    let mut char_pos = 0usize;

    loop {
        let trimmed = rest.trim_start();
        char_pos += rest[..rest.len() - trimmed.len()].chars().count();
        rest = trimmed;
        if rest.is_empty() {
            break;
        }

        let ch = rest.chars().next().unwrap();

        if ch == '(' {
            tokens.push(Token {
                kind: TokenKind::LeftParen,
                lexeme: "(".to_string(),
                char_index: char_pos,
            });
            rest = &rest[1..];
            char_pos += 1;
            continue;
        }
        if ch == ')' {
            tokens.push(Token {
                kind: TokenKind::RightParen,
                lexeme: ")".to_string(),
                char_index: char_pos,
            });
            rest = &rest[1..];
            char_pos += 1;
            continue;
        }
        if ch == '0' || ch == '1' {
            tokens.push(Token {
                kind: TokenKind::Constant(ch == '1'),
                lexeme: ch.to_string(),
                char_index: char_pos,
            });
            rest = &rest[1..];
            char_pos += 1;
            continue;
        }

        // Eagerly recognize `<=>` before any alpha/symbol scanning, so it never gets chopped up
        // by a hypothetical `<` handler.
        if let Some(remainder) = rest.strip_prefix("<=>") {
            tokens.push(Token {
                kind: TokenKind::Operator {
                    canonical: "<=>".to_string(),
                    arity: Arity::Binary,
                },
                lexeme: "<=>".to_string(),
                char_index: char_pos,
            });
            rest = remainder;
            char_pos += 3;
            continue;
        }

        if ch.is_alphabetic() {
            let run_chars = rest.chars().take_while(|c| c.is_alphanumeric() || *c == '_').count();
            let byte_len: usize = rest.chars().take(run_chars).map(|c| c.len_utf8()).sum();
            let ident = &rest[..byte_len];
            let kind = match registry.resolve_identifier(ident) {
                Some(ResolvedKind::Unary(_)) => TokenKind::Operator {
                    canonical: "~".to_string(),
                    arity: Arity::Unary,
                },
                Some(ResolvedKind::Binary(op)) => TokenKind::Operator {
                    canonical: op.symbol().to_string(),
                    arity: Arity::Binary,
                },
                Some(ResolvedKind::Constant(v)) => TokenKind::Constant(v),
                None => TokenKind::Identifier,
            };
            tokens.push(Token {
                kind,
                lexeme: ident.to_string(),
                char_index: char_pos,
            });
            rest = &rest[byte_len..];
            char_pos += run_chars;
            continue;
        }

        if let Some((matched, resolved)) = registry.longest_symbol_match(rest) {
            let kind = match resolved {
                ResolvedKind::Unary(_) => TokenKind::Operator {
                    canonical: "~".to_string(),
                    arity: Arity::Unary,
                },
                ResolvedKind::Binary(op) => TokenKind::Operator {
                    canonical: op.symbol().to_string(),
                    arity: Arity::Binary,
                },
                ResolvedKind::Constant(v) => TokenKind::Constant(v),
            };
            let char_len = matched.chars().count();
            let byte_len = matched.len();
            tokens.push(Token {
                kind,
                lexeme: matched,
                char_index: char_pos,
            });
            rest = &rest[byte_len..];
            char_pos += char_len;
            continue;
        }

        let lexeme = ch.to_string();
        let suggestions = if config.enable_alias_suggestions {
            suggest(&lexeme, registry, config.suggestion_max_distance, config.suggestion_max_items)
        } else {
            Vec::new()
        };
        return Err(ParseError::UnknownToken {
            token_index: tokens.len(),
            char_index: char_pos,
            char_code: Some(ch as u32),
            lexeme,
            suggestions,
        });
    }

    Ok(tokens)
}

fn suggest(
    lexeme: &str,
    registry: &OperatorRegistry,
    max_distance: usize,
    max_items: usize,
) -> Vec<Suggestion> {
    let mut candidates: Vec<Suggestion> = registry
        .all_alias_spellings()
        .into_iter()
        .map(|alias| Suggestion {
            alias: alias.to_string(),
            distance: levenshtein(lexeme, alias),
        })
        .filter(|s| s.distance <= max_distance)
        .collect();
    candidates.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.alias.cmp(&b.alias)));
    candidates.dedup_by(|a, b| a.alias == b.alias);
    candidates.truncate(max_items);
    candidates
}

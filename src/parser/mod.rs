//! Parsing pipeline: tokenize, structurally validate, dispatch to a strategy, normalize.
//!
//! Role
//! - The single public entry point used by [`crate::expression::Expression`] and
//!   [`crate::cache`]; individual strategies are not meant to be called directly outside tests.
pub mod pratt;
pub mod shunting_yard;
pub mod validator;

use crate::ast::AstRef;
use crate::config::{ParserConfig, Strategy};
use crate::error::ParseError;
use crate::registry::OperatorRegistry;
use crate::rewrite::normalizer;
use crate::tokenizer;

/// Parse `source` into a normalized AST, using the strategy and options in `config`.
///
/// `registry` is taken mutably for the same reason [`tokenizer::tokenize`] is: its longest-match
/// candidate cache may need rebuilding on first use.
pub fn parse(source: &str, registry: &mut OperatorRegistry, config: &ParserConfig) -> Result<AstRef, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::EmptyExpression);
    }
    let tokens = tokenizer::tokenize(source, registry, config)?;
    validator::validate(&tokens)?;
    let raw = match config.strategy {
        Strategy::ShuntingYard => shunting_yard::parse(&tokens, registry)?,
        Strategy::Pratt => pratt::parse(&tokens, registry)?,
    };
    Ok(normalizer::normalize(&raw))
}

/// Parse `source`, collapsing any fault into [`ParseError::InvalidTokenSequence`] so callers that
/// only care about "did this parse" don't need to match the full error taxonomy.
pub fn try_parse(source: &str, registry: &mut OperatorRegistry, config: &ParserConfig) -> Result<AstRef, ParseError> {
    parse(source, registry, config).map_err(|err| match err {
        ParseError::InvalidTokenSequence { .. } => err,
        other => ParseError::invalid_sequence(other),
    })
}

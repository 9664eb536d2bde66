//! Tunable configuration surface for the parser, tokenizer, and caches.
//!
//! Role
//! - Hold the options named in the crate's external interface: parser strategy selection,
//!   unicode normalization, alias-suggestion limits, and cache sizing.
//! - Every field has a default matching the documented default behavior.
use std::time::Duration;

/// Which parser strategy an [`crate::expression::Expression`] should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    #[default]
    ShuntingYard,
    Pratt,
}

/// Parser- and tokenizer-level configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    pub strategy: Strategy,
    pub enable_alias_suggestions: bool,
    pub enable_unicode_normalization: bool,
    pub suggestion_max_distance: usize,
    pub suggestion_max_items: usize,
    pub use_short_circuiting: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::ShuntingYard,
            enable_alias_suggestions: true,
            enable_unicode_normalization: true,
            suggestion_max_distance: 2,
            suggestion_max_items: 3,
            use_short_circuiting: true,
        }
    }
}

/// Sizing and eviction policy shared by the AST cache and the compiled-evaluator cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheConfig {
    pub max_size: usize,
    pub evict_percent: u8,
    pub enable_ttl_eviction: bool,
    pub ttl: Duration,
}

impl CacheConfig {
    /// Defaults for the parser AST cache: 1024 entries.
    pub fn ast_defaults() -> Self {
        Self {
            max_size: 1024,
            evict_percent: 100,
            enable_ttl_eviction: false,
            ttl: Duration::from_secs(3600),
        }
    }

    /// Defaults for the compiled-evaluator (delegate) cache: 2048 entries.
    pub fn delegate_defaults() -> Self {
        Self {
            max_size: 2048,
            evict_percent: 100,
            enable_ttl_eviction: false,
            ttl: Duration::from_secs(3600),
        }
    }
}

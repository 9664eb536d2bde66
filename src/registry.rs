//! The operator registry: precedence, associativity, aliases, and suggestion parameters.
//!
//! Role
//! - A single source of truth shared by both parser strategies and the tokenizer.
//! - All lookups are case-insensitive for word-form aliases (`AND`, `and`, `And` are equivalent);
//!   symbol-form aliases (`&&`, `∧`) are matched literally.
//!
//! Mutability
//! - Registration (`register_operator_alias`, `register_constant_alias`) updates the table and
//!   invalidates the cached longest-first candidate list used by the tokenizer's symbol scan.
//!   The crate-wide instance (see [`crate::cache::global_registry`]) is guarded by a
//!   `parking_lot::RwLock`; concurrent registration while parsing is out of scope, matching the
//!   source's own single-writer assumption.
use std::collections::{HashMap, HashSet};

use log::debug;

use crate::ast::{BinOp, UnOp};

/// What kind of token a registered alias or canonical symbol resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedKind {
    Unary(UnOp),
    Binary(BinOp),
    Constant(bool),
}

/// Precedence, associativity, aliasing, and suggestion configuration for the expression
/// language's operator alphabet.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    precedence: HashMap<String, u8>,
    right_assoc: HashSet<String>,
    unary_symbols: HashSet<String>,
    binary_symbols: HashSet<String>,
    /// lowercased alias -> canonical symbol, for word-form operator aliases (`AND`, `IMPLIES`, ...)
    word_operator_aliases: HashMap<String, String>,
    /// literal alias -> canonical symbol, for symbol-form operator aliases (`&&`, `∧`, `->`, ...)
    symbol_operator_aliases: HashMap<String, String>,
    /// lowercased alias -> canonical truth value, for word-form constants (`true`, `false`)
    word_constant_aliases: HashMap<String, bool>,
    /// literal alias -> canonical truth value, for symbol-form constants (`⊤`, `⊥`)
    symbol_constant_aliases: HashMap<String, bool>,
    /// lowercased word-form aliases that denote the unary `~` operator (`NOT`, `не`, ...)
    prefix_unary_word_aliases: HashSet<String>,
    pub suggestion_max_distance: usize,
    pub suggestion_max_items: usize,
    /// Cached, descending-length-sorted list of all symbol-form candidates (canonical ops,
    /// symbol aliases, symbol constants). Rebuilt lazily after invalidation.
    candidate_cache: Option<Vec<String>>,
}

impl OperatorRegistry {
    /// Build the default registry described in the crate documentation.
    pub fn with_defaults() -> Self {
        let mut reg = Self {
            precedence: HashMap::new(),
            right_assoc: HashSet::new(),
            unary_symbols: HashSet::new(),
            binary_symbols: HashSet::new(),
            word_operator_aliases: HashMap::new(),
            symbol_operator_aliases: HashMap::new(),
            word_constant_aliases: HashMap::new(),
            symbol_constant_aliases: HashMap::new(),
            prefix_unary_word_aliases: HashSet::new(),
            suggestion_max_distance: 2,
            suggestion_max_items: 3,
            candidate_cache: None,
        };

        reg.unary_symbols.insert("~".to_string());
        reg.set_precedence("~", 5, true);

        reg.binary_symbols.insert("&".to_string());
        reg.set_precedence("&", 4, false);
        reg.binary_symbols.insert("!&".to_string());
        reg.set_precedence("!&", 4, false);
        reg.binary_symbols.insert("^".to_string());
        reg.set_precedence("^", 3, false);
        reg.binary_symbols.insert("|".to_string());
        reg.set_precedence("|", 2, false);
        reg.binary_symbols.insert("!|".to_string());
        reg.set_precedence("!|", 2, false);
        reg.binary_symbols.insert("=>".to_string());
        reg.set_precedence("=>", 1, true);
        reg.binary_symbols.insert("<=>".to_string());
        reg.set_precedence("<=>", 0, false);

        // Word-form operator aliases.
        for (alias, canonical) in [
            ("and", "&"),
            ("or", "|"),
            ("xor", "^"),
            ("implies", "=>"),
            ("iff", "<=>"),
            ("nand", "!&"),
            ("nor", "!|"),
        ] {
            reg.word_operator_aliases
                .insert(alias.to_string(), canonical.to_string());
        }

        // Symbol-form operator aliases.
        for (alias, canonical) in [
            ("∧", "&"),
            ("&&", "&"),
            ("∨", "|"),
            ("||", "|"),
            ("⊕", "^"),
            ("→", "=>"),
            ("->", "=>"),
            ("≡", "<=>"),
            ("⇔", "<=>"),
            ("↔", "<=>"),
            ("¬", "~"),
            ("!", "~"),
        ] {
            reg.symbol_operator_aliases
                .insert(alias.to_string(), canonical.to_string());
        }

        // Word-form prefix-unary aliases of `~` (checked before generic operator aliases so a
        // standalone `NOT` resolves to negation rather than falling through).
        for alias in ["not", "не"] {
            reg.prefix_unary_word_aliases.insert(alias.to_string());
        }

        // Constant aliases.
        reg.word_constant_aliases.insert("true".to_string(), true);
        reg.word_constant_aliases.insert("false".to_string(), false);
        reg.symbol_constant_aliases.insert("1".to_string(), true);
        reg.symbol_constant_aliases.insert("0".to_string(), false);
        reg.symbol_constant_aliases.insert("⊤".to_string(), true);
        reg.symbol_constant_aliases.insert("⊥".to_string(), false);

        reg
    }

    fn set_precedence(&mut self, symbol: &str, precedence: u8, right_assoc: bool) {
        self.precedence.insert(symbol.to_string(), precedence);
        if right_assoc {
            self.right_assoc.insert(symbol.to_string());
        } else {
            self.right_assoc.remove(symbol);
        }
    }

    pub fn precedence(&self, symbol: &str) -> Option<u8> {
        self.precedence.get(symbol).copied()
    }

    pub fn is_right_associative(&self, symbol: &str) -> bool {
        self.right_assoc.contains(symbol)
    }

    pub fn is_unary(&self, symbol: &str) -> bool {
        self.unary_symbols.contains(symbol)
    }

    pub fn is_binary(&self, symbol: &str) -> bool {
        self.binary_symbols.contains(symbol)
    }

    pub fn unary_op_for(&self, symbol: &str) -> Option<UnOp> {
        if symbol == "~" { Some(UnOp::Not) } else { None }
    }

    pub fn binary_op_for(&self, symbol: &str) -> Option<BinOp> {
        match symbol {
            "&" => Some(BinOp::And),
            "|" => Some(BinOp::Or),
            "^" => Some(BinOp::Xor),
            "=>" => Some(BinOp::Implies),
            "<=>" => Some(BinOp::Iff),
            "!&" => Some(BinOp::Nand),
            "!|" => Some(BinOp::Nor),
            _ => None,
        }
    }

    /// Register a new alias (word- or symbol-form) resolving to an existing canonical operator
    /// symbol. Word-form aliases are matched case-insensitively; symbol-form aliases literally.
    pub fn register_operator_alias(&mut self, alias: &str, canonical: &str) {
        debug!("registering operator alias {alias:?} -> {canonical:?}");
        if alias.chars().next().is_some_and(|c| c.is_alphabetic()) {
            self.word_operator_aliases
                .insert(alias.to_lowercase(), canonical.to_string());
        } else {
            self.symbol_operator_aliases
                .insert(alias.to_string(), canonical.to_string());
        }
        self.candidate_cache = None;
    }

    /// Register a new constant alias (e.g. a localized spelling of `true`/`false`).
    pub fn register_constant_alias(&mut self, alias: &str, value: bool) {
        debug!("registering constant alias {alias:?} -> {value}");
        if alias.chars().next().is_some_and(|c| c.is_alphabetic()) {
            self.word_constant_aliases.insert(alias.to_lowercase(), value);
        } else {
            self.symbol_constant_aliases.insert(alias.to_string(), value);
        }
        self.candidate_cache = None;
    }

    /// Resolve an already-scanned identifier run (letters/digits/underscore) against, in order:
    /// prefix-unary word aliases, operator word aliases, constant word aliases. Returns `None`
    /// if the identifier is none of the above (i.e. it is a genuine variable name).
    pub fn resolve_identifier(&self, ident: &str) -> Option<ResolvedKind> {
        let lower = ident.to_lowercase();
        if self.prefix_unary_word_aliases.contains(&lower) {
            return Some(ResolvedKind::Unary(UnOp::Not));
        }
        if let Some(canonical) = self.word_operator_aliases.get(&lower) {
            return Some(self.resolved_kind_for_symbol(canonical));
        }
        if let Some(value) = self.word_constant_aliases.get(&lower) {
            return Some(ResolvedKind::Constant(*value));
        }
        None
    }

    fn resolved_kind_for_symbol(&self, symbol: &str) -> ResolvedKind {
        if let Some(op) = self.unary_op_for(symbol) {
            return ResolvedKind::Unary(op);
        }
        if let Some(op) = self.binary_op_for(symbol) {
            return ResolvedKind::Binary(op);
        }
        unreachable!("canonical symbol {symbol:?} is neither unary nor binary")
    }

    /// Longest-match lookup for a non-alphanumeric run starting at `input`'s first character.
    /// Returns the matched literal and its resolved kind.
    pub fn longest_symbol_match(&mut self, input: &str) -> Option<(String, ResolvedKind)> {
        if self.candidate_cache.is_none() {
            self.rebuild_candidate_cache();
        }
        let candidates = self.candidate_cache.as_ref().unwrap();
        for candidate in candidates {
            if input.starts_with(candidate.as_str()) {
                let symbol = if let Some(canonical) = self.symbol_operator_aliases.get(candidate) {
                    self.resolved_kind_for_symbol(canonical)
                } else if self.unary_symbols.contains(candidate) || self.binary_symbols.contains(candidate)
                {
                    self.resolved_kind_for_symbol(candidate)
                } else if let Some(value) = self.symbol_constant_aliases.get(candidate) {
                    ResolvedKind::Constant(*value)
                } else {
                    continue;
                };
                return Some((candidate.clone(), symbol));
            }
        }
        None
    }

    fn rebuild_candidate_cache(&mut self) {
        let mut candidates: Vec<String> = Vec::new();
        candidates.extend(self.unary_symbols.iter().cloned());
        candidates.extend(self.binary_symbols.iter().cloned());
        candidates.extend(self.symbol_operator_aliases.keys().cloned());
        candidates.extend(self.symbol_constant_aliases.keys().cloned());
        candidates.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        candidates.dedup();
        self.candidate_cache = Some(candidates);
    }

    /// All alias spellings (word- and symbol-form), used to compute Levenshtein suggestions for
    /// an unrecognized token.
    pub fn all_alias_spellings(&self) -> Vec<&str> {
        let mut all: Vec<&str> = Vec::new();
        all.extend(self.word_operator_aliases.keys().map(String::as_str));
        all.extend(self.symbol_operator_aliases.keys().map(String::as_str));
        all.extend(self.word_constant_aliases.keys().map(String::as_str));
        all.extend(self.symbol_constant_aliases.keys().map(String::as_str));
        all.extend(self.prefix_unary_word_aliases.iter().map(String::as_str));
        all.extend(self.unary_symbols.iter().map(String::as_str));
        all.extend(self.binary_symbols.iter().map(String::as_str));
        all
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_precedences_match_spec() {
        let reg = OperatorRegistry::with_defaults();
        assert_eq!(reg.precedence("~"), Some(5));
        assert_eq!(reg.precedence("&"), Some(4));
        assert_eq!(reg.precedence("!&"), Some(4));
        assert_eq!(reg.precedence("^"), Some(3));
        assert_eq!(reg.precedence("|"), Some(2));
        assert_eq!(reg.precedence("!|"), Some(2));
        assert_eq!(reg.precedence("=>"), Some(1));
        assert_eq!(reg.precedence("<=>"), Some(0));
        assert!(reg.is_right_associative("~"));
        assert!(reg.is_right_associative("=>"));
        assert!(!reg.is_right_associative("&"));
    }

    #[test]
    fn word_aliases_resolve_case_insensitively() {
        let reg = OperatorRegistry::with_defaults();
        assert_eq!(
            reg.resolve_identifier("AND"),
            Some(ResolvedKind::Binary(BinOp::And))
        );
        assert_eq!(
            reg.resolve_identifier("and"),
            Some(ResolvedKind::Binary(BinOp::And))
        );
        assert_eq!(
            reg.resolve_identifier("NOT"),
            Some(ResolvedKind::Unary(UnOp::Not))
        );
        assert_eq!(
            reg.resolve_identifier("TRUE"),
            Some(ResolvedKind::Constant(true))
        );
        assert_eq!(reg.resolve_identifier("myvar"), None);
    }

    #[test]
    fn longest_match_prefers_nand_over_not() {
        let mut reg = OperatorRegistry::with_defaults();
        let (matched, kind) = reg.longest_symbol_match("!& x").unwrap();
        assert_eq!(matched, "!&");
        assert_eq!(kind, ResolvedKind::Binary(BinOp::Nand));

        let (matched, kind) = reg.longest_symbol_match("!x").unwrap();
        assert_eq!(matched, "!");
        assert_eq!(kind, ResolvedKind::Unary(UnOp::Not));
    }

    #[test]
    fn longest_match_prefers_iff_over_implies_prefix() {
        let mut reg = OperatorRegistry::with_defaults();
        let (matched, kind) = reg.longest_symbol_match("<=>x").unwrap();
        assert_eq!(matched, "<=>");
        assert_eq!(kind, ResolvedKind::Binary(BinOp::Iff));
    }

    #[test]
    fn registration_invalidates_candidate_cache() {
        let mut reg = OperatorRegistry::with_defaults();
        assert!(reg.longest_symbol_match("@").is_none());
        reg.register_operator_alias("@", "&");
        let (matched, kind) = reg.longest_symbol_match("@").unwrap();
        assert_eq!(matched, "@");
        assert_eq!(kind, ResolvedKind::Binary(BinOp::And));
    }
}

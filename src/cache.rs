//! Process-wide operator registry, plus bounded caches for parsed ASTs and compiled evaluators.
//!
//! Role
//! - [`global_registry`] is the one genuinely process-wide piece of state here: an
//!   [`OperatorRegistry`] behind a `parking_lot::RwLock`, lazily built on first access.
//! - [`AstCache`] and [`DelegateCache`] are deliberately *not* statics. Their values
//!   ([`AstRef`], and the `CompiledEvaluator` it compiles to) are `Rc`-backed and so are not
//!   `Send`; a `static` holding them would need to be `Sync`, which requires `Send` content.
//!   Instead each is an ordinary struct a caller constructs once (typically held by
//!   [`crate::expression::Expression`]'s context) and shares within one thread, e.g. behind an
//!   `Rc`.
//! - Eviction is coarse: once a cache reaches `max_size`, it drops `evict_percent`% of its
//!   entries in arbitrary order (no LRU bookkeeping), matching the configuration surface in
//!   [`crate::config::CacheConfig`]. TTL eviction is opt-in per `CacheConfig::enable_ttl_eviction`.
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;
use std::time::Instant;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

use crate::ast::AstRef;
use crate::config::{CacheConfig, ParserConfig, Strategy};
use crate::error::ParseError;
use crate::eval::CompiledEvaluator;
use crate::registry::OperatorRegistry;

static REGISTRY: Lazy<RwLock<OperatorRegistry>> = Lazy::new(|| RwLock::new(OperatorRegistry::with_defaults()));

/// The process-wide [`OperatorRegistry`], shared by every parser and tokenizer call that doesn't
/// supply its own.
pub fn global_registry() -> &'static RwLock<OperatorRegistry> {
    &REGISTRY
}

/// Hit/miss/eviction counters for a single cache, as of the moment [`AstCache::stats`] or
/// [`DelegateCache::stats`] is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

struct BoundedCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    stats: Mutex<CacheStats>,
    config: CacheConfig,
}

impl<K: Hash + Eq + Clone, V: Clone> BoundedCache<K, V> {
    fn new(config: CacheConfig) -> Self {
        Self { entries: Mutex::new(HashMap::new()), stats: Mutex::new(CacheStats::default()), config }
    }

    fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        let mut stats = self.stats.lock();
        let expired = self.config.enable_ttl_eviction
            && entries.get(key).is_some_and(|e| e.inserted_at.elapsed() > self.config.ttl);
        if expired {
            entries.remove(key);
            stats.misses += 1;
            stats.size = entries.len();
            return None;
        }
        match entries.get(key) {
            Some(entry) => {
                stats.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        let mut stats = self.stats.lock();
        if entries.len() >= self.config.max_size {
            Self::evict(&mut entries, &mut stats, self.config.max_size, self.config.evict_percent);
        }
        entries.insert(key, Entry { value, inserted_at: Instant::now() });
        stats.size = entries.len();
    }

    fn evict(entries: &mut HashMap<K, Entry<V>>, stats: &mut CacheStats, max_size: usize, evict_percent: u8) {
        let raw = (max_size as u64 * evict_percent as u64) / 100;
        let evict_count = (raw as usize).max(1).min(entries.len());
        let keys: Vec<K> = entries.keys().take(evict_count).cloned().collect();
        for k in keys {
            entries.remove(&k);
            stats.evictions += 1;
        }
    }

    fn clear(&self) {
        self.entries.lock().clear();
        self.stats.lock().size = 0;
    }

    fn stats(&self) -> CacheStats {
        let mut s = *self.stats.lock();
        s.size = self.entries.lock().len();
        s
    }
}

/// Key for a cached parse: the strategy and unicode-normalization flag it was parsed under, plus
/// the raw source text.
pub type CacheKey = (Strategy, bool, String);

/// Cache from source text (plus parse settings) to its parsed, normalized AST.
pub struct AstCache {
    inner: BoundedCache<CacheKey, AstRef>,
}

impl AstCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { inner: BoundedCache::new(config) }
    }

    pub fn get(&self, strategy: Strategy, unicode_normalized: bool, source: &str) -> Option<AstRef> {
        self.inner.get(&(strategy, unicode_normalized, source.to_string()))
    }

    pub fn insert(&self, strategy: Strategy, unicode_normalized: bool, source: &str, ast: AstRef) {
        self.inner.insert((strategy, unicode_normalized, source.to_string()), ast);
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

impl Default for AstCache {
    fn default() -> Self {
        Self::new(CacheConfig::ast_defaults())
    }
}

/// Key for a cached compiled evaluator: the (fully-indexed) AST and whether it was compiled with
/// short-circuiting. `AstRef`'s `Hash`/`Eq` are structural, so two distinct `Rc`s over an
/// identical tree collide correctly.
pub type DelegateKey = (AstRef, bool);

/// Cache from AST to its compiled closure-tree evaluator.
pub struct DelegateCache {
    inner: BoundedCache<DelegateKey, Rc<CompiledEvaluator>>,
}

impl DelegateCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { inner: BoundedCache::new(config) }
    }

    /// Return the cached compiled evaluator for `(ast, use_short_circuiting)`, compiling and
    /// caching it on a miss.
    pub fn get_or_compile(&self, ast: &AstRef, use_short_circuiting: bool) -> Rc<CompiledEvaluator> {
        let key = (ast.clone(), use_short_circuiting);
        if let Some(cached) = self.inner.get(&key) {
            return cached;
        }
        let compiled = Rc::new(crate::eval::compile(ast, use_short_circuiting));
        self.inner.insert(key, compiled.clone());
        compiled
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

impl Default for DelegateCache {
    fn default() -> Self {
        Self::new(CacheConfig::delegate_defaults())
    }
}

/// Parse `source`, consulting `cache` first and storing the result on a miss. The cache key is
/// `(config.strategy, config.enable_unicode_normalization, source)`.
pub fn parse_cached(
    cache: &AstCache,
    source: &str,
    registry: &mut OperatorRegistry,
    config: &ParserConfig,
) -> Result<AstRef, ParseError> {
    if let Some(hit) = cache.get(config.strategy, config.enable_unicode_normalization, source) {
        return Ok(hit);
    }
    let ast = crate::parser::parse(source, registry, config)?;
    cache.insert(config.strategy, config.enable_unicode_normalization, source, ast.clone());
    Ok(ast)
}

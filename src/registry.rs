//! Highlight range registry
//!
//! The painting layer reads ranges from one shared, flat key space. Each
//! highlighter owns the keys ending in its instance suffix and never
//! touches anyone else's, so instances can share a registry freely.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use rand::distr::Alphanumeric;
use rand::Rng;
use tracing::debug;

use crate::error::{HighlightError, Result};
use crate::syntax::{CategoryRanges, RangeSet};

/// Length of generated instance suffixes
const SUFFIX_LEN: usize = 10;

/// Storage the painting layer reads highlight ranges from
pub trait RangeRegistry: Send + Sync {
    /// Insert or replace the ranges stored under a key
    fn register(&self, key: &str, ranges: RangeSet);
    /// Delete one key, returning whether it existed
    fn remove(&self, key: &str) -> bool;
    /// Delete every key ending with `tail`, returning how many went
    fn remove_matching(&self, tail: &str) -> usize;
    /// Every entry whose key ends with `tail`, in registration order
    fn list(&self, tail: &str) -> Vec<(String, RangeSet)>;
}

/// In-memory registry, usable standalone or as the process-wide one
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: Mutex<Vec<(String, RangeSet)>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every highlighter in this process
    pub fn global() -> Arc<MemoryRegistry> {
        static GLOBAL: OnceLock<Arc<MemoryRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(MemoryRegistry::new())))
    }

    /// Total number of keys across all instances
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<RangeSet> {
        self.lock()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, ranges)| ranges.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, RangeSet)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RangeRegistry for MemoryRegistry {
    fn register(&self, key: &str, ranges: RangeSet) {
        let mut entries = self.lock();
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = ranges,
            None => entries.push((key.to_string(), ranges)),
        }
    }

    fn remove(&self, key: &str) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(k, _)| k != key);
        entries.len() != before
    }

    fn remove_matching(&self, tail: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(k, _)| !k.ends_with(tail));
        before - entries.len()
    }

    fn list(&self, tail: &str) -> Vec<(String, RangeSet)> {
        self.lock()
            .iter()
            .filter(|(k, _)| k.ends_with(tail))
            .cloned()
            .collect()
    }
}

/// Opaque token that partitions the registry between instances
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceSuffix(String);

impl InstanceSuffix {
    /// Generate a fresh random suffix
    pub fn generate() -> Self {
        let token: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(SUFFIX_LEN)
            .map(char::from)
            .collect();
        Self(token.to_lowercase())
    }

    /// Use a caller-chosen suffix.
    ///
    /// Only ASCII letters and digits are accepted. A `-` would let one
    /// instance's tail match keys owned by another (`b` vs `a-b`).
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(HighlightError::InvalidSuffix(token));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry key for a category owned by this instance
    pub fn key(&self, category: &str) -> String {
        format!("{category}-{}", self.0)
    }

    /// The part every key owned by this instance ends with
    pub fn tail(&self) -> String {
        format!("-{}", self.0)
    }
}

impl fmt::Display for InstanceSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One instance's view of a shared registry
#[derive(Clone)]
pub struct RegistryScope {
    registry: Arc<dyn RangeRegistry>,
    suffix: InstanceSuffix,
}

impl RegistryScope {
    pub fn new(registry: Arc<dyn RangeRegistry>, suffix: InstanceSuffix) -> Self {
        Self { registry, suffix }
    }

    pub fn suffix(&self) -> &InstanceSuffix {
        &self.suffix
    }

    pub fn register(&self, category: &str, ranges: RangeSet) {
        self.registry.register(&self.suffix.key(category), ranges);
    }

    pub fn remove(&self, category: &str) -> bool {
        self.registry.remove(&self.suffix.key(category))
    }

    /// Clear every entry this instance owns and hand back the suffix
    pub fn remove_all(&self) -> InstanceSuffix {
        let removed = self.registry.remove_matching(&self.suffix.tail());
        debug!(suffix = %self.suffix, removed, "cleared highlight ranges");
        self.suffix.clone()
    }

    /// This instance's entries, keyed by category
    pub fn list(&self) -> Vec<CategoryRanges> {
        let tail = self.suffix.tail();
        self.registry
            .list(&tail)
            .into_iter()
            .map(|(key, ranges)| CategoryRanges {
                category: key.strip_suffix(tail.as_str()).unwrap_or(&key).to_string(),
                ranges,
            })
            .collect()
    }
}

impl fmt::Debug for RegistryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryScope")
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::MatchRange;

    fn ranges(pairs: &[(usize, usize)]) -> RangeSet {
        pairs.iter().map(|&(s, e)| MatchRange::new(s, e)).collect()
    }

    fn scope(registry: &Arc<MemoryRegistry>, suffix: &str) -> RegistryScope {
        RegistryScope::new(registry.clone(), InstanceSuffix::new(suffix).unwrap())
    }

    #[test]
    fn test_generated_suffixes_differ() {
        let a = InstanceSuffix::generate();
        let b = InstanceSuffix::generate();
        assert_eq!(a.as_str().len(), SUFFIX_LEN);
        assert_ne!(a, b);
        assert_eq!(a.key("tag"), format!("tag-{a}"));
    }

    #[test]
    fn test_suffix_rejects_separator() {
        for bad in ["", "a-b", "x y", "ü"] {
            assert!(
                matches!(InstanceSuffix::new(bad), Err(HighlightError::InvalidSuffix(_))),
                "{bad:?}"
            );
        }
        assert_eq!(InstanceSuffix::new("B2").unwrap().as_str(), "B2");
    }

    #[test]
    fn test_nested_suffix_cannot_clear_neighbour() {
        // "b" and "a-b" would share the "-b" tail; only the first is allowed
        let registry = Arc::new(MemoryRegistry::new());
        let b = scope(&registry, "b");
        let ab = scope(&registry, "ab");
        ab.register("tag", ranges(&[(0, 1)]));
        b.register("tag", ranges(&[(2, 3)]));

        b.remove_all();
        assert_eq!(ab.list().len(), 1);
        assert!(b.list().is_empty());
    }

    #[test]
    fn test_register_replaces() {
        let registry = Arc::new(MemoryRegistry::new());
        let scope = scope(&registry, "one");
        scope.register("number", ranges(&[(0, 1)]));
        scope.register("number", ranges(&[(2, 3)]));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("number-one"), Some(ranges(&[(2, 3)])));
    }

    #[test]
    fn test_scopes_do_not_collide() {
        let registry = Arc::new(MemoryRegistry::new());
        let one = scope(&registry, "one");
        let two = scope(&registry, "two");
        one.register("tag", ranges(&[(0, 1)]));
        one.register("string", ranges(&[(1, 2)]));
        two.register("tag", ranges(&[(5, 6)]));

        assert_eq!(one.list().len(), 2);
        assert_eq!(two.list()[0].category, "tag");

        assert_eq!(one.remove_all().as_str(), "one");
        assert!(one.list().is_empty());
        assert_eq!(two.list().len(), 1);
    }

    #[test]
    fn test_remove_all_idempotent() {
        let registry = Arc::new(MemoryRegistry::new());
        let scope = scope(&registry, "x");
        scope.register("tag", ranges(&[(0, 1)]));
        scope.remove_all();
        scope.remove_all();
        assert!(scope.list().is_empty());
    }

    #[test]
    fn test_remove_single_category() {
        let registry = Arc::new(MemoryRegistry::new());
        let scope = scope(&registry, "x");
        scope.register("tag", ranges(&[(0, 1)]));
        scope.register("string", ranges(&[(1, 2)]));
        assert!(scope.remove("tag"));
        assert!(!scope.remove("tag"));
        let left: Vec<_> = scope.list().into_iter().map(|c| c.category).collect();
        assert_eq!(left, ["string"]);
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let registry = Arc::new(MemoryRegistry::new());
        let scope = scope(&registry, "x");
        for category in ["comment", "argument", "tag"] {
            scope.register(category, RangeSet::new());
        }
        let order: Vec<_> = scope.list().into_iter().map(|c| c.category).collect();
        assert_eq!(order, ["comment", "argument", "tag"]);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&MemoryRegistry::global(), &MemoryRegistry::global()));
    }
}

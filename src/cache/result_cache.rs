//! Normalized-result cache with TTL expiry.
//!
//! In-process only — no state outlives the TTL, so entries live in a
//! concurrent map and die with the process. Cache key is a SHA-256 digest
//! of `(endpoint prefix, prompt)`.

use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::codes::CodesResult;

/// Fixed entry lifetime. Not client-configurable.
pub const CACHE_TTL_SECS: u64 = 60 * 60;

/// A single cached normalized result.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    /// The normalized result returned verbatim on a hit.
    pub(crate) value: CodesResult,
    /// Unix timestamp when the entry was stored.
    pub(crate) stored_at: u64,
}

/// Concurrent TTL cache for normalized code results.
///
/// Readers and writers may race on the same key; entries are overwritten
/// whole, never mutated in place. An expired entry is indistinguishable
/// from an absent one.
pub struct ResultCache {
    pub(crate) entries: DashMap<String, CacheEntry>,
    ttl_secs: u64,
}

impl ResultCache {
    /// Create a cache with the given TTL.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_secs,
        }
    }

    /// Build a deterministic cache key: SHA-256 of `(endpoint, prompt)`.
    ///
    /// Uses length-prefixed encoding to prevent separator collisions
    /// (e.g. endpoint `"a:b"` vs endpoint `"a"` with prompt `"b…"`). The
    /// endpoint prefix keeps identical prompts on different endpoints in
    /// distinct entries.
    pub fn cache_key(endpoint: &str, prompt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update((endpoint.len() as u64).to_le_bytes());
        hasher.update(endpoint.as_bytes());
        hasher.update((prompt.len() as u64).to_le_bytes());
        hasher.update(prompt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a live entry. Returns `None` if the key is absent or expired.
    ///
    /// Expired entries are removed on read so stale data can never be
    /// returned, whatever the eviction timing.
    pub fn get(&self, key: &str) -> Option<CodesResult> {
        let now = Self::now_secs();
        let expired = {
            let entry = self.entries.get(key)?;
            if now.saturating_sub(entry.stored_at) <= self.ttl_secs {
                return Some(entry.value.clone());
            }
            true
        };
        if expired {
            debug!(key = %&key[..8.min(key.len())], "cache entry expired, removing");
            self.entries.remove(key);
        }
        None
    }

    /// Store a result, overwriting any previous entry for the key.
    pub fn put(&self, key: String, value: CodesResult) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Self::now_secs(),
            },
        );
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries currently stored (live or not yet swept).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{CodesResult, ParseMode};

    fn simple(codes: &[&str]) -> CodesResult {
        CodesResult::Simple(codes.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_cache_key_deterministic() {
        let k1 = ResultCache::cache_key("codes", "nike discount codes");
        let k2 = ResultCache::cache_key("codes", "nike discount codes");
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_cache_key_endpoint_aware() {
        let k1 = ResultCache::cache_key("codes", "nike discount codes");
        let k2 = ResultCache::cache_key("codes_detailed", "nike discount codes");
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_cache_key_prompt_aware() {
        let k1 = ResultCache::cache_key("codes", "nike discount codes");
        let k2 = ResultCache::cache_key("codes", "adidas discount codes");
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_cache_key_no_separator_collision() {
        let k1 = ResultCache::cache_key("a:b", "c");
        let k2 = ResultCache::cache_key("a", "b:c");
        assert_ne!(
            k1, k2,
            "length-prefixed encoding must prevent separator collisions"
        );
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = ResultCache::new(3600);
        let key = ResultCache::cache_key("codes", "p");
        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), simple(&["SAVE20"]));
        assert_eq!(cache.get(&key), Some(simple(&["SAVE20"])));
    }

    #[test]
    fn test_expired_entry_indistinguishable_from_absent() {
        let cache = ResultCache::new(3600);
        cache.put("key".into(), simple(&["SAVE20"]));
        // Backdate past the TTL to force expiry.
        cache.entries.get_mut("key").unwrap().stored_at -= 3601;
        assert!(cache.get("key").is_none());
        assert!(cache.is_empty(), "expired entry removed on read");
    }

    #[test]
    fn test_entry_just_inside_ttl_still_live() {
        let cache = ResultCache::new(3600);
        cache.put("key".into(), simple(&["SAVE20"]));
        cache.entries.get_mut("key").unwrap().stored_at -= 3600;
        assert!(cache.get("key").is_some());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = ResultCache::new(3600);
        cache.put("key".into(), simple(&["OLD99"]));
        cache.put("key".into(), simple(&["NEW99"]));
        assert_eq!(cache.get("key"), Some(simple(&["NEW99"])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_result_is_cacheable() {
        // An empty parse is a valid, successful response and may be cached.
        let cache = ResultCache::new(3600);
        cache.put("key".into(), CodesResult::empty(ParseMode::Detailed));
        assert_eq!(
            cache.get("key"),
            Some(CodesResult::empty(ParseMode::Detailed))
        );
    }

    #[test]
    fn test_clear() {
        let cache = ResultCache::new(3600);
        cache.put("a".into(), simple(&[]));
        cache.put("b".into(), simple(&[]));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }
}

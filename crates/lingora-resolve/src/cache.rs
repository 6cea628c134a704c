//! Shared cache abstraction.
//!
//! Production deployments inject an implementation backed by the host's
//! shared cache layer so that every worker process sees one
//! authoritative copy of the merged dictionaries; [`MemoryCache`] is the
//! in-process default and the test double. Invalidation is key
//! deletion, a deliberate cross-process signal.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

/// Cached payloads are flat language dictionaries.
pub type Dict = HashMap<String, String>;

pub trait SharedCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Dict>;
    fn set(&self, key: &str, value: Dict);
    fn delete(&self, key: &str);
    /// Delete every key starting with `prefix` (used to drop all
    /// languages at once).
    fn delete_prefix(&self, prefix: &str);

    /// Generator-on-miss: return the cached value or build, store and
    /// return it.
    fn get_or_insert_with(&self, key: &str, generator: &dyn Fn() -> Dict) -> Dict {
        if let Some(hit) = self.get(key) {
            return hit;
        }
        let value = generator();
        self.set(key, value.clone());
        value
    }
}

/// LRU-bounded in-memory cache.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Dict>>,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        // a dictionary per (kind, language) pair; 128 is plenty
        Self::new(128)
    }
}

impl SharedCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Dict> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Dict) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key.to_string(), value);
        }
    }

    fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.pop(key);
        }
    }

    fn delete_prefix(&self, prefix: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            let doomed: Vec<String> = entries
                .iter()
                .filter(|(k, _)| k.starts_with(prefix))
                .map(|(k, _)| k.clone())
                .collect();
            for key in doomed {
                entries.pop(&key);
            }
        }
    }
}

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

/// Key of a cached response. Tweets and users share one map, so the key
/// carries the resource kind; batch lookups key on the ordered id list
/// they were requested with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Tweet(u64),
    User(u64),
    Tweets(Vec<u64>),
}

/// Last-fetched response bodies, one entry per key.
///
/// Entries live until a later fetch overwrites them; there is no expiry.
/// Lookups signal a miss with `None` and never panic, so read-through
/// callers can branch on the return value.
#[derive(Debug, Default)]
pub struct Cache {
    entries: RwLock<HashMap<CacheKey, Value>>,
}

impl Cache {
    pub fn new() -> Cache {
        Cache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store a response body, replacing any previous entry for the key.
    pub fn save(&self, key: CacheKey, value: Value) {
        self.write().insert(key, value);
    }

    /// Exact lookup.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Lookup plus nested-field projection. `None` when the key or any
    /// path segment is absent.
    pub fn get_path(&self, key: &CacheKey, path: &[&str]) -> Option<Value> {
        let entries = self.read();
        project(entries.get(key)?, path).cloned()
    }

    /// Snapshot of every cached entry.
    pub fn all(&self) -> HashMap<CacheKey, Value> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, Value>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, Value>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Walk `path` into a decoded body.
pub(crate) fn project<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |value, segment| value.get(segment))
}

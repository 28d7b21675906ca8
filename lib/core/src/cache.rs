use crate::{Error, Result};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Bounded query-result cache: `query_id -> ordered face_id list`.
///
/// Every insert uses a freshly generated unique key, so writers never
/// contend on the same entry; a single mutex around the map plus an LRU
/// order queue is enough. The capacity cap replaces the unbounded growth
/// this store would otherwise exhibit.
pub struct QueryCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

struct CacheInner {
    entries: AHashMap<String, Vec<String>>,
    // Front = least recently used.
    order: VecDeque<String>,
}

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl QueryCache {
    /// Create a cache holding at most `capacity` result lists. A zero
    /// capacity is bumped to one so inserts are never silently dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: AHashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a result list under a fresh query id, evicting the least
    /// recently used entry when full.
    pub fn insert(&self, query_id: String, face_ids: Vec<String>) {
        let mut inner = self.inner.lock();
        if inner.entries.len() >= self.capacity && !inner.entries.contains_key(&query_id) {
            if let Some(evicted) = inner.order.pop_front() {
                inner.entries.remove(&evicted);
            }
        }
        inner.order.retain(|id| id != &query_id);
        inner.order.push_back(query_id.clone());
        inner.entries.insert(query_id, face_ids);
    }

    /// Look up a cached result list, refreshing its recency.
    pub fn lookup(&self, query_id: &str) -> Result<Vec<String>> {
        let mut inner = self.inner.lock();
        let face_ids = inner
            .entries
            .get(query_id)
            .cloned()
            .ok_or_else(|| Error::UnknownQueryId(query_id.to_string()))?;
        inner.order.retain(|id| id != query_id);
        inner.order.push_back(query_id.to_string());
        Ok(face_ids)
    }

    /// Drop an entry. Returns whether it existed.
    pub fn evict(&self, query_id: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.order.retain(|id| id != query_id);
        inner.entries.remove(query_id).is_some()
    }
}

//! Search Session Cache
//!
//! Maps an exact `(query, max_results)` pair to the serialized search
//! response, error responses included. No normalization is applied to the
//! query text. Eviction is pluggable; the default keeps every entry for the
//! lifetime of the cache.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub max_results: usize,
}

impl CacheKey {
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
        }
    }
}

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entry_count: usize,
    pub evictions: u64,
}

/// Decides how many of the oldest entries to drop before an insert
pub trait EvictionPolicy: Send + Sync + std::fmt::Debug {
    fn evict_count(&self, current_len: usize) -> usize;
}

/// Unbounded: never evicts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEviction;

impl EvictionPolicy for NoEviction {
    fn evict_count(&self, _current_len: usize) -> usize {
        0
    }
}

/// First-in first-out bound on the number of entries
#[derive(Debug, Clone, Copy)]
pub struct MaxEntries(pub usize);

impl EvictionPolicy for MaxEntries {
    fn evict_count(&self, current_len: usize) -> usize {
        (current_len + 1).saturating_sub(self.0.max(1))
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, String>,
    insertion_order: VecDeque<CacheKey>,
    stats: CacheStats,
}

#[derive(Debug)]
pub struct SearchCache {
    state: Mutex<CacheState>,
    policy: Box<dyn EvictionPolicy>,
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchCache {
    pub fn new() -> Self {
        Self::with_policy(NoEviction)
    }

    pub fn with_policy(policy: impl EvictionPolicy + 'static) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            policy: Box::new(policy),
        }
    }

    /// Look up a cached response, counting the hit or miss
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut state = self.state.lock();
        match state.entries.get(key).cloned() {
            Some(value) => {
                state.stats.hits += 1;
                debug!(query = %key.query, max_results = key.max_results, "Search cache hit");
                Some(value)
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&self, key: CacheKey, value: String) {
        let mut state = self.state.lock();

        if let Some(existing) = state.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        let evict = self.policy.evict_count(state.entries.len());
        for _ in 0..evict {
            let Some(oldest) = state.insertion_order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
            state.stats.evictions += 1;
            debug!(query = %oldest.query, "Evicted cached search");
        }

        state.insertion_order.push_back(key.clone());
        state.entries.insert(key, value);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entry_count: state.entries.len(),
            ..state.stats.clone()
        }
    }

    /// Drop every entry and reset the statistics
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.insertion_order.clear();
        state.stats = CacheStats::default();
    }
}

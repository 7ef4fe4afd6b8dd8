//! Memoised search results.
//! Thread-safe via Mutex; keyed by graph fingerprint so a rebuilt graph never
//! sees results computed on an older one.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use tracing::debug;

use crate::compare::Algorithm;
use crate::graph::GeoGraph;
use crate::models::{CityId, PathResult};
use crate::options::SearchOptions;

type RouteKey = (u64, Algorithm, CityId, CityId);

/// LRU cache of `PathResult`s for one set of [`SearchOptions`].
pub struct RouteCache {
    options: SearchOptions,
    capacity: usize,
    inner: Mutex<LruCache<RouteKey, PathResult>>,
}

impl RouteCache {
    /// Capacity comes from `options.cache_capacity` (at least 1).
    pub fn new(options: SearchOptions) -> Self {
        let capacity = options.cache_capacity.max(1);
        let cap_nz = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { options, capacity, inner: Mutex::new(LruCache::new(cap_nz)) }
    }

    pub fn options(&self) -> &SearchOptions { &self.options }

    /// Cached result for the query, running the engine on a miss.
    pub fn route(&self, graph: &GeoGraph, algorithm: Algorithm, start: CityId, end: CityId) -> PathResult {
        self.get_or_compute(graph, algorithm, start, end, || algorithm.run(graph, start, end, &self.options))
    }

    /// Cached result for the key, or `compute()`'s. BFS timeouts are not
    /// stored since a retry may succeed.
    pub fn get_or_compute(
        &self,
        graph: &GeoGraph,
        algorithm: Algorithm,
        start: CityId,
        end: CityId,
        compute: impl FnOnce() -> PathResult,
    ) -> PathResult {
        let key = (graph.fingerprint(), algorithm, start, end);
        if let Some(hit) = self.lookup(&key) {
            debug!(algorithm = algorithm.name(), start, end, "route_cache_hit");
            return hit;
        }
        // Miss: run the search outside the lock
        let result = compute();
        let timed_out = result.metrics.as_ref().is_some_and(|m| m.timeout);
        if !timed_out {
            if let Ok(mut guard) = self.inner.lock() {
                guard.put(key, result.clone());
            }
        }
        result
    }

    fn lookup(&self, key: &RouteKey) -> Option<PathResult> {
        let mut guard = self.inner.lock().ok()?;
        guard.get(key).cloned()
    }

    /// Current number of cached results.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.clear();
        }
    }
}

#[allow(dead_code)]
fn _assert_send_sync() {
    fn assert_bound<T: Send + Sync>() {}
    assert_bound::<RouteCache>();
}

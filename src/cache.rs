//! Route chain lookup caching.
//!
//! Every navigation has to find the target route in the installed tree and
//! collect its ancestors, because requirements on a parent also protect its
//! children. [`RouteCache`] remembers the result per target path so repeated
//! visits (tab switches, back/forward) skip the tree walk. It is gated behind
//! the `cache` feature flag and uses the [`lru`] crate internally.
//!
//! Entries are only valid for the tree they were computed on; the navigator
//! clears the cache whenever the installed routes change.
//!
//! # Examples
//!
//! ```
//! use admin_navigator::cache::{RouteCache, RouteId};
//!
//! let mut cache = RouteCache::new();
//! cache.insert(
//!     "/system/user".to_string(),
//!     vec![RouteId::from_path("/system"), RouteId::from_path("/system/user")],
//! );
//!
//! assert_eq!(cache.get("/system/user").unwrap().len(), 2);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::route::{MergedRoute, RouteSource};
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Identifies a route by its full path and the tree it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteId {
    pub path: String,
    pub source: RouteSource,
}

impl RouteId {
    pub fn from_route(route: &MergedRoute) -> Self {
        Self::from_path(route.path.clone())
    }

    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: RouteSource::Installed,
        }
    }

    pub fn with_source(mut self, source: RouteSource) -> Self {
        self.source = source;
        self
    }
}

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Number of full cache invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from target path to its route chain (root first).
///
/// An empty chain records that the path is not in the tree.
#[derive(Debug)]
pub struct RouteCache {
    chains: LruCache<String, Vec<RouteId>>,
    stats: CacheStats,
}

impl RouteCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding up to `capacity` paths. Zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            chains: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.chains.len();
        self.chains.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Route cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up the cached chain for `path`. Updates hit/miss stats.
    pub fn get(&mut self, path: &str) -> Option<Vec<RouteId>> {
        if let Some(chain) = self.chains.get(path) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for '{}'", path);
            Some(chain.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for '{}'", path);
            None
        }
    }

    pub fn insert(&mut self, path: String, chain: Vec<RouteId>) {
        trace_log!("Caching chain of {} routes for '{}'", chain.len(), path);
        self.chains.push(path, chain);
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

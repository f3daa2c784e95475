//! In-memory LRU tier for decoded images.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{CacheKey, DecodedImage};

/// Number of decoded images the memory tier keeps before discarding the
/// least recently used one.
pub const MEMORY_CAPACITY: usize = 100;

/// Bounded in-memory cache for decoded images.
///
/// Access is synchronous so a hit can be published without suspending.
/// The lock is held only for the map operation itself.
pub struct MemoryImageCache {
    cache: Mutex<LruCache<CacheKey, DecodedImage>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    pub(crate) fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the image for `key`, marking it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<DecodedImage> {
        let found = self.cache.lock().get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
        }
        found
    }

    /// Returns the image for `key` without touching recency or stats.
    pub fn peek(&self, key: &CacheKey) -> Option<DecodedImage> {
        self.cache.lock().peek(key).cloned()
    }

    /// Stores `image`, discarding the least recently used entry when full.
    pub fn put(&self, key: CacheKey, image: DecodedImage) {
        trace!(key = %key, "Storing image in memory cache");
        if let Some((evicted, _)) = self.cache.lock().push(key.clone(), image)
            && evicted != key
        {
            debug!(key = %evicted, "Memory cache discarded least recently used image");
        }
    }

    /// Drops `key` from memory.
    pub fn remove(&self, key: &CacheKey) {
        if self.cache.lock().pop(key).is_some() {
            trace!(key = %key, "Removed image from memory cache");
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.cache.lock().clear();
        debug!("Cleared memory image cache");
    }

    /// Number of images held.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns hit/miss statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::new(MEMORY_CAPACITY)
    }
}

/// Statistics about memory tier performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of memory hits.
    pub hits: u64,
    /// Number of memory misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

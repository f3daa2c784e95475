//! Two-tier image cache: memory first, then disk.
//!
//! One instance is built by the composition root and shared by every
//! loader through an `Arc`. Keys are sanitized identifiers; every public
//! entry point accepts anything convertible into a [`CacheKey`], so raw
//! URLs and prebuilt keys resolve to the same entry.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{CacheKey, DecodedImage, ImageSource, LoadedImage};
use crate::domain::errors::{ImageError, ImageResult};
use crate::domain::image_event::{EventSink, ImageEvent};
use crate::domain::ports::ImageFetcherPort;

use super::codec;
use super::disk_cache::DiskImageCache;
use super::memory_cache::{CacheStats, MemoryImageCache};

type PendingFetch = Shared<BoxFuture<'static, ImageResult<LoadedImage>>>;

/// Removes a key from the in-flight map when its fetch task ends, including
/// when the task panics.
struct PendingEntry<'a> {
    pending: &'a Mutex<HashMap<CacheKey, PendingFetch>>,
    key: &'a CacheKey,
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(self.key);
    }
}

/// Process-wide image store across a bounded memory tier and a disk tier.
pub struct ImageCache {
    memory: MemoryImageCache,
    disk: DiskImageCache,
    pending: Mutex<HashMap<CacheKey, PendingFetch>>,
    events: EventSink,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("dir", &self.disk.dir())
            .field("memory_len", &self.memory.len())
            .finish_non_exhaustive()
    }
}

impl ImageCache {
    /// Creates a cache over the given disk tier.
    #[must_use]
    pub fn new(disk: DiskImageCache) -> Self {
        Self {
            memory: MemoryImageCache::default(),
            disk,
            pending: Mutex::new(HashMap::new()),
            events: EventSink::none(),
        }
    }

    /// Creates a cache whose disk tier lives in `<base>/ImageCache`.
    #[must_use]
    pub fn under(base: &Path) -> Self {
        Self::new(DiskImageCache::under(base))
    }

    /// Creates a cache in the platform cache directory.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(DiskImageCache::default_location())
    }

    /// Forwards cache events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Returns the memory tier.
    #[must_use]
    pub const fn memory(&self) -> &MemoryImageCache {
        &self.memory
    }

    /// Returns the disk tier.
    #[must_use]
    pub const fn disk(&self) -> &DiskImageCache {
        &self.disk
    }

    /// Returns memory tier statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.memory.stats()
    }

    /// Checks the memory tier only. Never touches disk and never suspends.
    pub fn get_from_memory(&self, key: impl Into<CacheKey>) -> Option<DecodedImage> {
        let key = key.into();
        let image = self.memory.get(&key)?;
        self.events.emit(ImageEvent::MemoryHit(key));
        Some(image)
    }

    /// Looks `key` up in memory, then on disk.
    ///
    /// A disk hit is promoted into memory. Absent, unreadable and
    /// undecodable entries are all a plain miss.
    pub async fn get(&self, key: impl Into<CacheKey>) -> Option<DecodedImage> {
        self.lookup(&key.into()).await.map(|loaded| loaded.image)
    }

    /// Like [`get`](Self::get), also reporting which tier answered.
    pub async fn lookup(&self, key: &CacheKey) -> Option<LoadedImage> {
        if let Some(image) = self.memory.get(key) {
            self.events.emit(ImageEvent::MemoryHit(key.clone()));
            return Some(LoadedImage {
                key: key.clone(),
                image,
                source: ImageSource::MemoryCache,
            });
        }

        if let Some(image) = self.disk.get(key).await {
            self.memory.put(key.clone(), image.clone());
            self.events.emit(ImageEvent::DiskHit(key.clone()));
            return Some(LoadedImage {
                key: key.clone(),
                image,
                source: ImageSource::DiskCache,
            });
        }

        trace!(key = %key, "Image cache miss");
        self.events.emit(ImageEvent::Miss(key.clone()));
        None
    }

    /// Stores `image` in memory and persists it to disk.
    ///
    /// The memory store always happens. A failed disk write is logged and
    /// otherwise ignored; memory stays authoritative for the process.
    pub async fn set(&self, image: DecodedImage, key: impl Into<CacheKey>) {
        let key = key.into();
        self.memory.put(key.clone(), image.clone());

        match self.disk.put(&key, &image).await {
            Ok(()) => self.events.emit(ImageEvent::Stored(key)),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to persist image to disk");
                self.events.emit(ImageEvent::PersistFailed {
                    key,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Drops every memory entry and deletes the disk directory.
    ///
    /// Fetches already in flight may repopulate their own key afterwards.
    pub async fn clear(&self) {
        self.memory.clear();
        if let Err(e) = self.disk.clear().await {
            warn!(error = %e, "Failed to clear disk cache");
        }
        self.events.emit(ImageEvent::Cleared);
        info!("Cleared all image caches");
    }

    /// Drops the memory tier only, as the host would under memory pressure.
    pub fn purge_memory(&self) {
        self.memory.clear();
    }

    /// Number of network fetches currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }

    /// Resolves `url` through both tiers, fetching it on a miss.
    ///
    /// Concurrent calls for the same key share one fetch: the first caller
    /// starts a background task (fetch, decode, store) and later callers
    /// await its result. The task runs to completion even if every caller
    /// goes away.
    ///
    /// # Errors
    /// Returns the fetch or decode failure; nothing is cached in that case.
    pub async fn fetch_through(
        self: &Arc<Self>,
        url: &str,
        fetcher: Arc<dyn ImageFetcherPort>,
    ) -> ImageResult<LoadedImage> {
        let key = CacheKey::from_identifier(url);

        let (pending, joined) = {
            let mut map = self.pending.lock();
            if let Some(existing) = map.get(&key) {
                (existing.clone(), true)
            } else {
                let task = tokio::spawn(Arc::clone(self).fetch_task(
                    key.clone(),
                    url.to_string(),
                    fetcher,
                ));
                let shared = async move {
                    task.await
                        .unwrap_or_else(|e| Err(ImageError::task(format!("Fetch task failed: {e}"))))
                }
                .boxed()
                .shared();
                map.insert(key.clone(), shared.clone());
                (shared, false)
            }
        };

        if joined {
            debug!(key = %key, "Joining in-flight image fetch");
            self.events.emit(ImageEvent::FetchJoined(key));
        }

        pending.await
    }

    async fn fetch_task(
        self: Arc<Self>,
        key: CacheKey,
        url: String,
        fetcher: Arc<dyn ImageFetcherPort>,
    ) -> ImageResult<LoadedImage> {
        let _entry = PendingEntry {
            pending: &self.pending,
            key: &key,
        };
        self.fetch_uncached(&key, &url, fetcher.as_ref()).await
    }

    async fn fetch_uncached(
        &self,
        key: &CacheKey,
        url: &str,
        fetcher: &dyn ImageFetcherPort,
    ) -> ImageResult<LoadedImage> {
        if let Some(hit) = self.lookup(key).await {
            return Ok(hit);
        }

        debug!(key = %key, url = %url, "Downloading image from network");
        let bytes = match fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(key = %key, error = %error, "Image fetch failed");
                self.events.emit(ImageEvent::FetchFailed {
                    key: key.clone(),
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        let image = match codec::decode(bytes).await {
            Ok(image) => image,
            Err(error) => {
                warn!(key = %key, error = %error, "Fetched bytes are not an image");
                self.events.emit(ImageEvent::DecodeFailed {
                    key: key.clone(),
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        self.events.emit(ImageEvent::Fetched(key.clone()));
        self.set(image.clone(), key.clone()).await;

        debug!(key = %key, source = "network", "Image loaded successfully");
        Ok(LoadedImage {
            key: key.clone(),
            image,
            source: ImageSource::Network,
        })
    }
}

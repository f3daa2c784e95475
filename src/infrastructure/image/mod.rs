//! Image handling infrastructure.
//!
//! This module provides:
//! - A bounded in-memory LRU tier
//! - A JPEG-per-key disk tier for persistence
//! - The two-tier [`ImageCache`] with shared in-flight fetches
//! - An HTTP fetcher for cache misses

pub mod codec;
pub mod disk_cache;
pub mod http_fetcher;
pub mod image_cache;
pub mod memory_cache;

pub use disk_cache::{CACHE_DIR_NAME, DiskImageCache};
pub use http_fetcher::HttpImageFetcher;
pub use image_cache::ImageCache;
pub use memory_cache::{CacheStats, MEMORY_CAPACITY, MemoryImageCache};

//! Disk tier: one JPEG file per cache key, persisted across sessions.

use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, trace, warn};

use crate::domain::entities::{CacheKey, DecodedImage};

use super::codec;

/// Name of the cache directory under the platform cache area.
pub const CACHE_DIR_NAME: &str = "ImageCache";

/// Disk-based image cache.
///
/// Entries are written to a temporary file in the cache directory and
/// renamed into place, so a reader never observes a partial file. Temporary
/// files start with `.` and can never collide with a sanitized key.
#[derive(Debug, Clone)]
pub struct DiskImageCache {
    cache_dir: PathBuf,
}

impl DiskImageCache {
    /// Creates a disk tier rooted at `cache_dir`, creating it if absent.
    ///
    /// A directory that cannot be created is not an error here: reads miss
    /// and writes fail silently until it can be.
    #[must_use]
    pub fn new(cache_dir: PathBuf) -> Self {
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            warn!(path = %cache_dir.display(), error = %e, "Failed to create image cache dir");
        }
        Self { cache_dir }
    }

    /// Creates a disk tier in the platform cache area.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(default_cache_dir())
    }

    /// Creates a disk tier in `<base>/ImageCache`.
    #[must_use]
    pub fn under(base: &Path) -> Self {
        Self::new(base.join(CACHE_DIR_NAME))
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the file path for `key`.
    #[must_use]
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.as_str())
    }

    /// Reads the raw bytes stored for `key`.
    pub async fn get_bytes(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(key = %key, path = %path.display(), "Disk cache hit");
                Some(bytes)
            }
            Err(e) => {
                trace!(key = %key, error = %e, "Disk cache miss");
                None
            }
        }
    }

    /// Loads and decodes the image stored for `key`.
    ///
    /// Undecodable bytes count as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<DecodedImage> {
        let bytes = self.get_bytes(key).await?;
        match codec::decode(bytes.into()).await {
            Ok(image) => {
                debug!(key = %key, "Decoded image from disk cache");
                Some(image)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to decode cached image");
                None
            }
        }
    }

    /// Encodes `image` as JPEG and atomically writes it for `key`.
    ///
    /// # Errors
    /// Returns error if encoding fails or the file cannot be written.
    pub async fn put(&self, key: &CacheKey, image: &DecodedImage) -> std::io::Result<()> {
        let image = image.clone();
        let dir = self.cache_dir.clone();
        let path = self.path_for(key);

        let size = tokio::task::spawn_blocking(move || -> std::io::Result<usize> {
            let bytes = codec::encode_jpeg(image.as_dynamic()).map_err(std::io::Error::other)?;
            write_atomic(&dir, &path, &bytes)?;
            Ok(bytes.len())
        })
        .await
        .map_err(std::io::Error::other)??;

        debug!(key = %key, size = size, "Stored image in disk cache");
        Ok(())
    }

    /// Removes the entry for `key`.
    pub async fn evict(&self, key: &CacheKey) {
        if let Err(e) = fs::remove_file(self.path_for(key)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(key = %key, error = %e, "Failed to evict from disk cache");
            }
        } else {
            debug!(key = %key, "Evicted from disk cache");
        }
    }

    /// Recursively deletes the cache directory.
    ///
    /// A directory that is already gone counts as cleared. The directory is
    /// recreated by the next write.
    ///
    /// # Errors
    /// Returns error if the directory exists but cannot be removed.
    pub async fn clear(&self) -> std::io::Result<()> {
        match fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => {
                debug!(path = %self.cache_dir.display(), "Cleared disk cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Checks if an entry exists for `key`.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        fs::try_exists(self.path_for(key)).await.unwrap_or(false)
    }

    /// Number of entries and their total size in bytes.
    pub async fn usage(&self) -> (usize, u64) {
        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return (0, 0);
        };

        let mut count = 0usize;
        let mut total = 0u64;
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            if let Ok(meta) = entry.metadata().await
                && meta.is_file()
            {
                count += 1;
                total += meta.len();
            }
        }
        (count, total)
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut temp_file = tempfile::Builder::new()
        .prefix(".pending-")
        .tempfile_in(dir)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Returns the default cache directory path.
fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "recipedeck", "recipe-deck").map_or_else(
        || {
            std::env::temp_dir()
                .join("recipe-deck")
                .join(CACHE_DIR_NAME)
        },
        |dirs| dirs.cache_dir().join(CACHE_DIR_NAME),
    )
}

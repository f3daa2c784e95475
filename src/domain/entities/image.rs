//! Domain types for decoded images.

use std::sync::Arc;

use image::DynamicImage;

use super::CacheKey;

/// A decoded, in-memory image.
///
/// Cheap to clone: the pixel buffer is shared behind an `Arc`, so the same
/// allocation is held by the memory tier and by every published consumer.
#[derive(Clone)]
pub struct DecodedImage(Arc<DynamicImage>);

impl DecodedImage {
    /// Wraps an already decoded image.
    #[must_use]
    pub fn new(image: DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Returns the underlying pixel data.
    #[must_use]
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.0
    }

    /// Returns true if both handles point at the same pixel buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<DynamicImage> for DecodedImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("color", &self.0.color())
            .finish()
    }
}

/// Where an image was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Loaded from the in-memory tier.
    MemoryCache,
    /// Loaded from the disk tier and promoted into memory.
    DiskCache,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// An image together with the tier that produced it.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Key the image is cached under.
    pub key: CacheKey,
    /// The decoded image.
    pub image: DecodedImage,
    /// Tier the image came from.
    pub source: ImageSource,
}

//! Port definition for fetching encoded image bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::ImageResult;

/// Port for downloading image bytes from a resource identifier.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Fetches the raw bytes at `url`.
    ///
    /// Transport failures and non-success responses are errors; the bytes
    /// are not validated as an image.
    async fn fetch(&self, url: &str) -> ImageResult<Bytes>;
}

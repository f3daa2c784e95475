//! HTTP implementation of [`ImageFetcherPort`].

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::domain::errors::{ImageError, ImageResult};
use crate::domain::ports::ImageFetcherPort;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Downloads image bytes with a plain HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> ImageResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::fetch("", format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> ImageResult<Bytes> {
        debug!(url = %url, "Fetching image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::fetch(url, format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| ImageError::fetch(url, format!("Failed to read body: {e}")))
    }
}

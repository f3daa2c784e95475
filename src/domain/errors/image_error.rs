//! Image pipeline error types.

use thiserror::Error;

/// Result type for image fetch and decode operations.
pub type ImageResult<T> = std::result::Result<T, ImageError>;

/// Failures while bringing an image in from the network.
///
/// `Clone` so one in-flight result can be handed to every waiter.
/// Cache misses and disk write failures are never represented here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ImageError {
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode image: {message}")]
    Decode { message: String },

    #[error("image task failed: {message}")]
    Task { message: String },
}

impl ImageError {
    /// Creates a transport error.
    #[must_use]
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a task error (panicked or cancelled background work).
    #[must_use]
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }

    /// Returns whether the failure happened before any bytes were decoded.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Status { .. })
    }
}

//! Recipe fetch error types.

use thiserror::Error;

/// Errors returned by the recipes endpoint client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RecipeError {
    #[error("invalid recipes URL: {url:?}")]
    InvalidUrl { url: String },

    #[error("recipe request failed: {message}")]
    RequestFailed { message: String },

    #[error("failed to decode recipes: {message}")]
    Decoding { message: String },
}

impl RecipeError {
    /// Creates request failed error.
    #[must_use]
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }

    /// Creates decoding error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }
}

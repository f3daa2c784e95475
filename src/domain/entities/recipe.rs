use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recipe as served by the recipes endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub cuisine: String,
    #[serde(default)]
    pub photo_url_small: Option<String>,
    #[serde(default)]
    pub photo_url_large: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
}

impl Recipe {
    /// Creates a recipe with no links.
    #[must_use]
    pub fn new(name: impl Into<String>, cuisine: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cuisine: cuisine.into(),
            photo_url_small: None,
            photo_url_large: None,
            source_url: None,
            youtube_url: None,
        }
    }

    /// Sets the thumbnail photo URL.
    #[must_use]
    pub fn with_small_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url_small = Some(url.into());
        self
    }

    /// Sets the full-size photo URL.
    #[must_use]
    pub fn with_large_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url_large = Some(url.into());
        self
    }

    /// Photo URL to show for a given size, falling back to the other size.
    #[must_use]
    pub fn photo_url(&self, large: bool) -> Option<&str> {
        let (preferred, fallback) = if large {
            (&self.photo_url_large, &self.photo_url_small)
        } else {
            (&self.photo_url_small, &self.photo_url_large)
        };
        preferred.as_deref().or(fallback.as_deref())
    }
}

/// Top-level payload of the recipes endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeResponse {
    pub recipes: Vec<Recipe>,
}

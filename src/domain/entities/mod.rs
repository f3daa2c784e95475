//! Domain entity definitions.

mod cache_key;
mod image;
mod recipe;

pub use cache_key::{CacheKey, SUBSTITUTE, sanitize};
pub use image::{DecodedImage, ImageSource, LoadedImage};
pub use recipe::{Recipe, RecipeResponse};

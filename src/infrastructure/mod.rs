//! Infrastructure layer with storage and network adapters.

/// Application configuration.
pub mod config;
/// Favorite recipes persistence.
pub mod favorites_store;
/// Two-tier image cache and image fetching.
pub mod image;
/// Recipes endpoint client.
pub mod recipes;

pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel};
pub use favorites_store::FavoritesStore;
pub use image::{DiskImageCache, HttpImageFetcher, ImageCache, MemoryImageCache};
pub use recipes::RecipeApiClient;

//! Recipe list adapters.

pub mod client;

pub use client::{DEFAULT_RECIPES_ENDPOINT, RecipeApiClient};

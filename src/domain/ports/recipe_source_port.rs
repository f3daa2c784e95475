//! Port definition for the upstream recipe list.

use async_trait::async_trait;

use crate::domain::entities::Recipe;
use crate::domain::errors::RecipeError;

/// Port for fetching the recipe list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeSourcePort: Send + Sync {
    /// Fetches every recipe. An empty list is a valid answer.
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, RecipeError>;
}

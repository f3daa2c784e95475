//! Recipes endpoint HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::domain::entities::{Recipe, RecipeResponse};
use crate::domain::errors::RecipeError;
use crate::domain::ports::RecipeSourcePort;

/// Default recipes endpoint.
pub const DEFAULT_RECIPES_ENDPOINT: &str = "https://d3jbb8n5wk0qxi.cloudfront.net/recipes.json";

/// Fetches the recipe list from a JSON endpoint.
#[derive(Debug, Clone)]
pub struct RecipeApiClient {
    client: Client,
    endpoint: String,
}

impl RecipeApiClient {
    /// Creates a client for `endpoint` with the given request timeout.
    ///
    /// The endpoint is validated on every fetch, not here.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, RecipeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecipeError::request_failed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn endpoint_url(&self) -> Result<Url, RecipeError> {
        Url::parse(self.endpoint.trim()).map_err(|_| RecipeError::InvalidUrl {
            url: self.endpoint.clone(),
        })
    }
}

#[async_trait]
impl RecipeSourcePort for RecipeApiClient {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, RecipeError> {
        let url = self.endpoint_url()?;
        debug!(url = %url, "Fetching recipes");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach recipes endpoint");
            if e.is_timeout() {
                RecipeError::request_failed("request timed out")
            } else if e.is_connect() {
                RecipeError::request_failed("failed to connect to recipes endpoint")
            } else {
                RecipeError::request_failed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecipeError::request_failed(format!(
                "recipes endpoint returned {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RecipeError::request_failed(format!("failed to read body: {e}")))?;

        let decoded: RecipeResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse recipes response");
            RecipeError::decoding(e.to_string())
        })?;

        debug!(count = decoded.recipes.len(), "Recipes fetched");
        Ok(decoded.recipes)
    }
}

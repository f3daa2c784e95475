//! Recipe list state: fetch, search, sort and derived views.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::entities::Recipe;
use crate::domain::errors::RecipeError;
use crate::domain::ports::RecipeSourcePort;
use crate::infrastructure::FavoritesStore;

/// Message shown when the recipe list cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load recipes. Try again later.";

/// Order of the displayed list, by recipe name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "A-Z"),
            Self::Descending => write!(f, "Z-A"),
        }
    }
}

pub struct RecipeCatalog {
    source: Arc<dyn RecipeSourcePort>,
    recipes: Vec<Recipe>,
    is_loading: bool,
    error_message: Option<String>,
    search: String,
    sort: SortOrder,
}

impl fmt::Debug for RecipeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeCatalog")
            .field("recipes", &self.recipes.len())
            .field("is_loading", &self.is_loading)
            .field("error_message", &self.error_message)
            .field("search", &self.search)
            .field("sort", &self.sort)
            .finish_non_exhaustive()
    }
}

impl RecipeCatalog {
    #[must_use]
    pub fn new(source: Arc<dyn RecipeSourcePort>) -> Self {
        Self {
            source,
            recipes: Vec::new(),
            is_loading: false,
            error_message: None,
            search: String::new(),
            sort: SortOrder::default(),
        }
    }

    /// Replaces the list with a fresh fetch. Returns the number of recipes.
    ///
    /// On failure the list is cleared and [`Self::error_message`] is set.
    ///
    /// # Errors
    /// Returns the source error after recording it.
    pub async fn refresh(&mut self) -> Result<usize, RecipeError> {
        self.is_loading = true;
        self.error_message = None;
        let result = self.source.fetch_recipes().await;
        self.is_loading = false;

        match result {
            Ok(recipes) => {
                debug!(count = recipes.len(), "Loaded recipes");
                self.recipes = recipes;
                Ok(self.recipes.len())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load recipes");
                self.recipes.clear();
                self.error_message = Some(LOAD_ERROR_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    #[must_use]
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Recipes matching the search text in name or cuisine, in sort order.
    ///
    /// Matching is a substring test ignoring case and accents; blank search
    /// matches all.
    #[must_use]
    pub fn displayed(&self) -> Vec<&Recipe> {
        let needle = fold(self.search.trim());
        let matching = self.recipes.iter().filter(|recipe| {
            needle.is_empty()
                || fold(&recipe.name).contains(&needle)
                || fold(&recipe.cuisine).contains(&needle)
        });
        self.sorted(matching)
    }

    /// Distinct cuisines, alphabetically.
    #[must_use]
    pub fn cuisines(&self) -> Vec<&str> {
        self.recipes
            .iter()
            .map(|recipe| recipe.cuisine.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Recipes of one cuisine (case-insensitive), in sort order.
    #[must_use]
    pub fn recipes_in_cuisine(&self, cuisine: &str) -> Vec<&Recipe> {
        self.sorted(
            self.recipes
                .iter()
                .filter(|recipe| recipe.cuisine.eq_ignore_ascii_case(cuisine)),
        )
    }

    /// Favorited recipes, in sort order.
    #[must_use]
    pub fn favorites(&self, store: &FavoritesStore) -> Vec<&Recipe> {
        self.sorted(self.recipes.iter().filter(|recipe| store.contains(&recipe.id)))
    }

    fn sorted<'a>(&self, recipes: impl Iterator<Item = &'a Recipe>) -> Vec<&'a Recipe> {
        let mut recipes: Vec<_> = recipes.collect();
        recipes.sort_by(|a, b| {
            self.sort.apply(
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name)),
            )
        });
        recipes
    }
}

/// Lowercases `text` and strips diacritics, so "Crème" and "creme" compare equal.
fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockRecipeSourcePort;
    use tempfile::tempdir;

    fn sample() -> Vec<Recipe> {
        vec![
            Recipe::new("Bakewell Tart", "British"),
            Recipe::new("apam balik", "Malaysian"),
            Recipe::new("Chocolate Gateau", "French"),
            Recipe::new("Banana Pancakes", "American"),
            Recipe::new("Budino Di Ricotta", "Italian"),
            Recipe::new("Blackberry Fool", "British"),
        ]
    }

    fn source_returning(result: Result<Vec<Recipe>, RecipeError>) -> Arc<dyn RecipeSourcePort> {
        let mut source = MockRecipeSourcePort::new();
        source
            .expect_fetch_recipes()
            .times(1)
            .returning(move || result.clone());
        Arc::new(source)
    }

    async fn loaded() -> RecipeCatalog {
        let mut catalog = RecipeCatalog::new(source_returning(Ok(sample())));
        catalog.refresh().await.unwrap();
        catalog
    }

    fn names<'a>(recipes: &[&'a Recipe]) -> Vec<&'a str> {
        recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_loads_recipes() {
        let catalog = loaded().await;
        assert_eq!(catalog.recipes().len(), 6);
        assert!(!catalog.is_loading());
        assert!(catalog.error_message().is_none());
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_list() {
        let mut catalog = loaded().await;
        catalog.source = source_returning(Err(RecipeError::decoding("missing field `name`")));

        let err = catalog.refresh().await.unwrap_err();

        assert!(matches!(err, RecipeError::Decoding { .. }));
        assert!(catalog.recipes().is_empty());
        assert_eq!(catalog.error_message(), Some(LOAD_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let mut catalog = RecipeCatalog::new(source_returning(Ok(Vec::new())));
        assert_eq!(catalog.refresh().await.unwrap(), 0);
        assert!(catalog.error_message().is_none());
        assert!(catalog.displayed().is_empty());
    }

    #[tokio::test]
    async fn test_displayed_sorts_case_insensitively() {
        let mut catalog = loaded().await;
        assert_eq!(
            names(&catalog.displayed()),
            [
                "apam balik",
                "Bakewell Tart",
                "Banana Pancakes",
                "Blackberry Fool",
                "Budino Di Ricotta",
                "Chocolate Gateau",
            ]
        );

        catalog.set_sort(SortOrder::Descending);
        assert_eq!(catalog.displayed()[0].name, "Chocolate Gateau");
        assert_eq!(catalog.displayed()[5].name, "apam balik");
    }

    #[tokio::test]
    async fn test_search_matches_name_or_cuisine() {
        let mut catalog = loaded().await;

        catalog.set_search("BRIT");
        assert_eq!(names(&catalog.displayed()), ["Bakewell Tart", "Blackberry Fool"]);

        catalog.set_search("cake");
        assert_eq!(names(&catalog.displayed()), ["Banana Pancakes"]);

        catalog.set_search("   ");
        assert_eq!(catalog.displayed().len(), 6);

        catalog.set_search("sushi");
        assert!(catalog.displayed().is_empty());
    }

    #[tokio::test]
    async fn test_search_ignores_accents() {
        let mut recipes = sample();
        recipes.push(Recipe::new("Crème Brûlée", "French"));
        recipes.push(Recipe::new("Pão de Queijo", "Brazilian"));
        let mut catalog = RecipeCatalog::new(source_returning(Ok(recipes)));
        catalog.refresh().await.unwrap();

        catalog.set_search("creme brulee");
        assert_eq!(names(&catalog.displayed()), ["Crème Brûlée"]);

        catalog.set_search("BRÛLÉE");
        assert_eq!(names(&catalog.displayed()), ["Crème Brûlée"]);

        catalog.set_search("pao");
        assert_eq!(names(&catalog.displayed()), ["Pão de Queijo"]);
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Crème Brûlée"), "creme brulee");
        assert_eq!(fold("ÉCLAIR"), "eclair");
        assert_eq!(fold("plain"), "plain");
    }

    #[tokio::test]
    async fn test_cuisines_are_unique_and_sorted() {
        let catalog = loaded().await;
        assert_eq!(
            catalog.cuisines(),
            ["American", "British", "French", "Italian", "Malaysian"]
        );
    }

    #[tokio::test]
    async fn test_recipes_in_cuisine() {
        let catalog = loaded().await;
        assert_eq!(
            names(&catalog.recipes_in_cuisine("british")),
            ["Bakewell Tart", "Blackberry Fool"]
        );
        assert!(catalog.recipes_in_cuisine("Thai").is_empty());
    }

    #[tokio::test]
    async fn test_favorites_view() {
        let catalog = loaded().await;
        let dir = tempdir().unwrap();
        let mut store = FavoritesStore::open(dir.path().join("favorites.toml")).unwrap();
        store.add(catalog.recipes()[2].id).unwrap();
        store.add(catalog.recipes()[1].id).unwrap();

        assert_eq!(
            names(&catalog.favorites(&store)),
            ["apam balik", "Chocolate Gateau"]
        );
    }

    #[test]
    fn test_sort_order_labels() {
        assert_eq!(SortOrder::default().to_string(), "A-Z");
        assert_eq!(SortOrder::Descending.to_string(), "Z-A");
    }
}

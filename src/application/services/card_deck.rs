//! Swipe deck of recipes not yet favorited.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::domain::entities::Recipe;
use crate::domain::errors::StorageError;
use crate::infrastructure::FavoritesStore;

/// Share of half the screen width a card must travel to count as a swipe.
pub const SWIPE_CUTOFF_RATIO: f64 = 0.8;

/// Cutoff for a 375 point wide screen.
pub const DEFAULT_SWIPE_CUTOFF: f64 = 150.0;

/// Result of releasing a dragged card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    ReturnToCenter,
    Favorite,
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct CardDeck {
    cards: Vec<Recipe>,
    cutoff: f64,
}

impl Default for CardDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl CardDeck {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_cutoff(DEFAULT_SWIPE_CUTOFF)
    }

    /// Deck whose swipe cutoff scales with the screen width.
    #[must_use]
    pub fn for_screen_width(width: f64) -> Self {
        Self::with_cutoff(width / 2.0 * SWIPE_CUTOFF_RATIO)
    }

    #[must_use]
    pub const fn with_cutoff(cutoff: f64) -> Self {
        Self {
            cards: Vec::new(),
            cutoff,
        }
    }

    /// Refills the deck with the recipes not in `favorites`, shuffled.
    pub fn load<R: Rng + ?Sized>(
        &mut self,
        recipes: &[Recipe],
        favorites: &FavoritesStore,
        rng: &mut R,
    ) {
        self.cards = recipes
            .iter()
            .filter(|recipe| !favorites.contains(&recipe.id))
            .cloned()
            .collect();
        self.cards.shuffle(rng);
        debug!(cards = self.cards.len(), "Dealt deck");
    }

    /// Cards from bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Recipe] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card currently shown.
    #[must_use]
    pub fn top(&self) -> Option<&Recipe> {
        self.cards.last()
    }

    /// Classifies a drag ending `width` points right (positive) or left
    /// (negative) of center.
    #[must_use]
    pub fn classify_drag(&self, width: f64) -> DragOutcome {
        if width.abs() <= self.cutoff {
            DragOutcome::ReturnToCenter
        } else if width > 0.0 {
            DragOutcome::Favorite
        } else {
            DragOutcome::Dismiss
        }
    }

    /// Applies a released drag. Returns the card that left the deck, if any.
    ///
    /// # Errors
    /// Returns error if the favorites change cannot be persisted.
    pub fn release(
        &mut self,
        width: f64,
        store: &mut FavoritesStore,
    ) -> Result<Option<Recipe>, StorageError> {
        match self.classify_drag(width) {
            DragOutcome::ReturnToCenter => Ok(None),
            DragOutcome::Favorite => self.swipe_right(store),
            DragOutcome::Dismiss => self.swipe_left(store),
        }
    }

    /// Favorites the top card and removes it.
    ///
    /// # Errors
    /// Returns error if the favorite cannot be persisted; the card stays.
    pub fn swipe_right(
        &mut self,
        store: &mut FavoritesStore,
    ) -> Result<Option<Recipe>, StorageError> {
        let Some(top) = self.top() else {
            return Ok(None);
        };
        store.add(top.id)?;
        Ok(self.cards.pop())
    }

    /// Un-favorites the top card and removes it.
    ///
    /// # Errors
    /// Returns error if the change cannot be persisted; the card stays.
    pub fn swipe_left(
        &mut self,
        store: &mut FavoritesStore,
    ) -> Result<Option<Recipe>, StorageError> {
        let Some(top) = self.top() else {
            return Ok(None);
        };
        store.remove(&top.id)?;
        Ok(self.cards.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::{TempDir, tempdir};
    use test_case::test_case;

    fn recipes() -> Vec<Recipe> {
        (0..8)
            .map(|i| Recipe::new(format!("Recipe {i}"), "Test"))
            .collect()
    }

    fn store() -> (FavoritesStore, TempDir) {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::open(dir.path().join("favorites.toml")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_load_skips_favorites() {
        let recipes = recipes();
        let (mut store, _dir) = store();
        store.add(recipes[0].id).unwrap();
        store.add(recipes[5].id).unwrap();

        let mut deck = CardDeck::new();
        deck.load(&recipes, &store, &mut StdRng::seed_from_u64(1));

        assert_eq!(deck.len(), 6);
        assert!(deck.cards().iter().all(|r| !store.contains(&r.id)));
    }

    #[test]
    fn test_load_shuffles_deterministically_per_seed() {
        let recipes = recipes();
        let (store, _dir) = store();
        let mut a = CardDeck::new();
        let mut b = CardDeck::new();

        a.load(&recipes, &store, &mut StdRng::seed_from_u64(42));
        b.load(&recipes, &store, &mut StdRng::seed_from_u64(42));

        assert_eq!(a.cards(), b.cards());
        let mut ids: Vec<_> = a.cards().iter().map(|r| r.id).collect();
        let mut expected: Vec<_> = recipes.iter().map(|r| r.id).collect();
        ids.sort();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test_case(0.0, DragOutcome::ReturnToCenter ; "no drag")]
    #[test_case(150.0, DragOutcome::ReturnToCenter ; "right at cutoff")]
    #[test_case(-150.0, DragOutcome::ReturnToCenter ; "left at cutoff")]
    #[test_case(151.0, DragOutcome::Favorite ; "past right")]
    #[test_case(-400.0, DragOutcome::Dismiss ; "past left")]
    fn test_classify_drag(width: f64, expected: DragOutcome) {
        assert_eq!(CardDeck::new().classify_drag(width), expected);
    }

    #[test]
    fn test_cutoff_scales_with_screen() {
        let deck = CardDeck::for_screen_width(375.0);
        assert_eq!(deck.classify_drag(150.0), DragOutcome::ReturnToCenter);
        assert_eq!(deck.classify_drag(150.5), DragOutcome::Favorite);

        let wide = CardDeck::for_screen_width(1000.0);
        assert_eq!(wide.classify_drag(-300.0), DragOutcome::ReturnToCenter);
        assert_eq!(wide.classify_drag(-401.0), DragOutcome::Dismiss);
    }

    #[test]
    fn test_swipes_take_top_card() {
        let recipes = recipes();
        let (mut store, _dir) = store();
        let mut deck = CardDeck::new();
        deck.load(&recipes, &store, &mut StdRng::seed_from_u64(7));

        let top = deck.top().unwrap().id;
        let taken = deck.swipe_right(&mut store).unwrap().unwrap();
        assert_eq!(taken.id, top);
        assert!(store.contains(&top));
        assert_eq!(deck.len(), 7);

        let next = deck.top().unwrap().id;
        store.add(next).unwrap();
        deck.swipe_left(&mut store).unwrap();
        assert!(!store.contains(&next));
        assert_eq!(deck.len(), 6);
    }

    #[test]
    fn test_release_inside_cutoff_keeps_card() {
        let recipes = recipes();
        let (mut store, _dir) = store();
        let mut deck = CardDeck::with_cutoff(50.0);
        deck.load(&recipes, &store, &mut StdRng::seed_from_u64(3));

        assert!(deck.release(30.0, &mut store).unwrap().is_none());
        assert_eq!(deck.len(), 8);

        assert!(deck.release(80.0, &mut store).unwrap().is_some());
        assert_eq!(deck.len(), 7);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_swipe_on_empty_deck() {
        let (mut store, _dir) = store();
        let mut deck = CardDeck::new();
        assert!(deck.top().is_none());
        assert!(deck.swipe_right(&mut store).unwrap().is_none());
        assert!(deck.swipe_left(&mut store).unwrap().is_none());
        assert!(store.is_empty());
    }
}

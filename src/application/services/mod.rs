//! Application services.

pub mod card_deck;
pub mod image_loader;
pub mod recipe_catalog;

pub use card_deck::{CardDeck, DEFAULT_SWIPE_CUTOFF, DragOutcome, SWIPE_CUTOFF_RATIO};
pub use image_loader::{ImageLoader, LoadStatus};
pub use recipe_catalog::{LOAD_ERROR_MESSAGE, RecipeCatalog, SortOrder};

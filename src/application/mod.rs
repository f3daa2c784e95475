//! Application layer: state-holding services driven by the presentation layer.

/// Loader, catalog and deck services.
pub mod services;

pub use services::{CardDeck, DragOutcome, ImageLoader, LoadStatus, RecipeCatalog, SortOrder};

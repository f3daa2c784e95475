//! Domain layer with core entities, events and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Image pipeline events.
pub mod image_event;
/// Port definitions.
pub mod ports;

pub use entities::{CacheKey, DecodedImage, ImageSource, LoadedImage, Recipe, sanitize};
pub use errors::{ImageError, RecipeError, StorageError};
pub use image_event::{EventSink, ImageEvent};
pub use ports::{ImageFetcherPort, RecipeSourcePort};

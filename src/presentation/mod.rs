//! Presentation layer: renderer-agnostic view bindings.

/// Reusable widgets.
pub mod widgets;

pub use widgets::{AsyncImage, ContentMode, Rendered};

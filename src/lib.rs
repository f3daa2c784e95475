//! Recipe Deck - recipe browsing with a two-tier image cache.
//!
//! The core of this crate is [`infrastructure::ImageCache`], a bounded
//! in-memory tier over a persistent on-disk tier, and
//! [`application::ImageLoader`], which binds one view to the image for its
//! current URL. Recipe listing, favorites and the swipe deck sit around it.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the loader, catalog and deck services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing caches, HTTP clients and persistence.
pub mod infrastructure;
/// Presentation layer containing the async image view binding.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "recipe-deck";

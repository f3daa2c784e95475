mod image_fetcher_port;
mod recipe_source_port;

pub use image_fetcher_port::ImageFetcherPort;
pub use recipe_source_port::RecipeSourcePort;

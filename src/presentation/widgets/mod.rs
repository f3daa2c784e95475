mod async_image;

pub use async_image::{AsyncImage, ContentMode, Rendered, Size, scaled_size};

//! Image encode/decode helpers.

use bytes::Bytes;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use crate::domain::entities::DecodedImage;
use crate::domain::errors::{ImageError, ImageResult};

/// JPEG quality used for disk entries (near-lossless re-encode).
pub const JPEG_QUALITY: u8 = 100;

/// Encodes `image` as JPEG at [`JPEG_QUALITY`].
///
/// JPEG carries no alpha channel, so the image is flattened to RGB first.
///
/// # Errors
/// Returns error if the encoder rejects the image (e.g. zero dimensions).
pub fn encode_jpeg(image: &DynamicImage) -> ImageResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| ImageError::decode(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

/// Decodes `bytes` on the calling thread.
///
/// # Errors
/// Returns error if the bytes are not an image in a supported format.
pub fn decode_blocking(bytes: &[u8]) -> ImageResult<DecodedImage> {
    image::load_from_memory(bytes)
        .map(DecodedImage::new)
        .map_err(|e| ImageError::decode(e.to_string()))
}

/// Decodes `bytes` on the blocking pool.
///
/// # Errors
/// Returns error if the bytes are not an image or the decode task panicked.
pub async fn decode(bytes: Bytes) -> ImageResult<DecodedImage> {
    tokio::task::spawn_blocking(move || decode_blocking(&bytes))
        .await
        .map_err(|e| ImageError::task(format!("Decode task panicked: {e}")))?
}

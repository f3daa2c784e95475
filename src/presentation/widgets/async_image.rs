//! Renderer-agnostic async image view.
//!
//! [`AsyncImage`] binds a resource identifier and a placeholder to an
//! [`ImageLoader`]. The host UI calls [`AsyncImage::on_appear`] when the view
//! becomes visible and [`AsyncImage::view`] whenever it draws.

use crate::application::services::{ImageLoader, LoadStatus};
use crate::domain::entities::DecodedImage;

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How an image is scaled into the caller's bounds. Aspect ratio is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Whole image visible, letterboxed if needed.
    #[default]
    Fit,
    /// Bounds fully covered, overflow cropped by the renderer.
    Fill,
}

/// Size of `image` after scaling into `bounds` with `mode`.
///
/// Non-empty inputs never collapse to a zero dimension.
#[must_use]
pub fn scaled_size(image: Size, bounds: Size, mode: ContentMode) -> Size {
    if image.width == 0 || image.height == 0 || bounds.width == 0 || bounds.height == 0 {
        return Size::default();
    }

    let sx = f64::from(bounds.width) / f64::from(image.width);
    let sy = f64::from(bounds.height) / f64::from(image.height);
    let scale = match mode {
        ContentMode::Fit => sx.min(sy),
        ContentMode::Fill => sx.max(sy),
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scale_dim = |d: u32| ((f64::from(d) * scale).round() as u32).max(1);
    Size::new(scale_dim(image.width), scale_dim(image.height))
}

/// What the host should draw this frame.
#[derive(Debug)]
pub enum Rendered<'a, P> {
    Placeholder(&'a P),
    Image { image: DecodedImage, size: Size },
}

impl<P> Rendered<'_, P> {
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// A view showing `placeholder` until the image for `url` is available.
#[derive(Debug)]
pub struct AsyncImage<P> {
    url: Option<String>,
    placeholder: P,
    loader: ImageLoader,
}

impl<P> AsyncImage<P> {
    #[must_use]
    pub const fn new(url: Option<String>, placeholder: P, loader: ImageLoader) -> Self {
        Self {
            url,
            placeholder,
            loader,
        }
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub const fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    /// Loads the current identifier when the view becomes visible.
    ///
    /// Skipped while the image for this identifier is shown or still loading,
    /// so re-appearing after a failed load retries it.
    pub fn on_appear(&mut self) -> LoadStatus {
        if self.url.is_none() || self.is_current() {
            return LoadStatus::Skipped;
        }
        let requested = self.loader.requested_url() == self.url;
        if requested && self.loader.is_loading() {
            return LoadStatus::Skipped;
        }
        self.loader.load(self.url.as_deref())
    }

    /// Changes the identifier. No load starts until the owner calls
    /// [`Self::on_appear`] or [`Self::refresh`].
    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    /// Loads the current identifier again, even if it was loaded before.
    pub fn refresh(&mut self) -> LoadStatus {
        self.loader.load(self.url.as_deref())
    }

    fn is_current(&self) -> bool {
        self.url.is_some() && self.loader.published_url() == self.url
    }

    /// Resolves the frame: the image scaled into `bounds` once one has been
    /// published for this view's identifier, the placeholder otherwise.
    pub fn view(&self, bounds: Size, mode: ContentMode) -> Rendered<'_, P> {
        match self.loader.image() {
            Some(image) if self.is_current() => {
                let size = scaled_size(Size::new(image.width(), image.height()), bounds, mode);
                Rendered::Image { image, size }
            }
            _ => Rendered::Placeholder(&self.placeholder),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::domain::ports::mocks::MockImageFetcher;
    use crate::infrastructure::image::ImageCache;
    use crate::infrastructure::image::codec::test_images::{jpeg, solid};
    use tempfile::TempDir;
    use test_case::test_case;

    const URL: &str = "https://example.com/photos/8a/large.jpg";
    const OTHER: &str = "https://example.com/photos/8b/large.jpg";
    const BOUNDS: Size = Size::new(100, 100);

    #[test_case(Size::new(200, 100), ContentMode::Fit, Size::new(100, 50) ; "wide fit")]
    #[test_case(Size::new(200, 100), ContentMode::Fill, Size::new(200, 100) ; "wide fill")]
    #[test_case(Size::new(50, 25), ContentMode::Fit, Size::new(100, 50) ; "upscale fit")]
    #[test_case(Size::new(10, 1000), ContentMode::Fit, Size::new(1, 100) ; "thin fit keeps one pixel")]
    #[test_case(Size::new(0, 10), ContentMode::Fit, Size::new(0, 0) ; "empty image")]
    fn test_scaled_size(image: Size, mode: ContentMode, expected: Size) {
        assert_eq!(scaled_size(image, BOUNDS, mode), expected);
    }

    fn view(
        cache: &Arc<ImageCache>,
        fetcher: &Arc<MockImageFetcher>,
        url: &str,
    ) -> AsyncImage<&'static str> {
        let loader = ImageLoader::new(Arc::clone(cache), fetcher.clone());
        AsyncImage::new(Some(url.to_string()), "loading", loader)
    }

    #[tokio::test]
    async fn test_placeholder_until_loaded() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(ImageCache::under(temp.path()));
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.respond(URL, jpeg(8, 4, [20, 40, 60]));
        let mut view = view(&cache, &fetcher, URL);

        assert!(view.view(BOUNDS, ContentMode::Fit).is_placeholder());
        view.on_appear().settled().await;

        match view.view(BOUNDS, ContentMode::Fit) {
            Rendered::Image { image, size } => {
                assert_eq!(image.width(), 8);
                assert_eq!(size, Size::new(100, 50));
            }
            Rendered::Placeholder(_) => panic!("expected image"),
        }
    }

    #[tokio::test]
    async fn test_on_appear_skips_once_loaded() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(ImageCache::under(temp.path()));
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.respond(URL, jpeg(3, 3, [0, 0, 0]));
        let mut view = view(&cache, &fetcher, URL);

        view.on_appear().settled().await;
        assert!(matches!(view.on_appear(), LoadStatus::Skipped));
        assert_eq!(fetcher.calls(), 1);

        cache.clear().await;
        view.refresh().settled().await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_on_appear_skips_while_loading() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(ImageCache::under(temp.path()));
        let fetcher = Arc::new(MockImageFetcher::new().with_delay(Duration::from_millis(30)));
        fetcher.respond(URL, jpeg(3, 3, [0, 0, 0]));
        let mut view = view(&cache, &fetcher, URL);

        let first = view.on_appear();
        assert!(matches!(view.on_appear(), LoadStatus::Skipped));
        first.settled().await;

        assert!(!view.view(BOUNDS, ContentMode::Fit).is_placeholder());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_reappearing_after_failure_retries() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(ImageCache::under(temp.path()));
        let fetcher = Arc::new(MockImageFetcher::new());
        let mut view = view(&cache, &fetcher, URL);

        view.on_appear().settled().await;
        assert!(view.view(BOUNDS, ContentMode::Fit).is_placeholder());

        fetcher.respond(URL, jpeg(6, 6, [10, 10, 10]));
        let retry = view.on_appear();
        assert!(matches!(retry, LoadStatus::Pending(_)));
        retry.settled().await;

        assert!(!view.view(BOUNDS, ContentMode::Fit).is_placeholder());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_url_change_waits_for_owner() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(ImageCache::under(temp.path()));
        cache.set(DecodedImage::new(solid(4, 4, [0, 0, 0])), URL).await;
        cache.set(DecodedImage::new(solid(2, 2, [0, 0, 0])), OTHER).await;
        let fetcher = Arc::new(MockImageFetcher::new());
        let mut view = view(&cache, &fetcher, URL);

        assert!(view.on_appear().is_ready());
        view.set_url(Some(OTHER.to_string()));
        assert_eq!(view.loader().requested_url().as_deref(), Some(URL));
        assert!(view.view(BOUNDS, ContentMode::Fit).is_placeholder());

        assert!(view.on_appear().is_ready());
        match view.view(BOUNDS, ContentMode::Fill) {
            Rendered::Image { image, .. } => assert_eq!(image.width(), 2),
            Rendered::Placeholder(_) => panic!("expected image"),
        }
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_identifier_shows_placeholder() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(ImageCache::under(temp.path()));
        let fetcher = Arc::new(MockImageFetcher::new());
        let loader = ImageLoader::new(Arc::clone(&cache), fetcher.clone());
        let mut view = AsyncImage::new(None, 0u8, loader);

        assert!(matches!(view.on_appear(), LoadStatus::Skipped));
        assert!(matches!(view.refresh(), LoadStatus::Skipped));
        assert!(view.view(BOUNDS, ContentMode::Fit).is_placeholder());
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_placeholder() {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(ImageCache::under(temp.path()));
        let fetcher = Arc::new(MockImageFetcher::new());
        fetcher.respond(URL, &b"<html>not an image</html>"[..]);
        let mut view = view(&cache, &fetcher, URL);

        view.on_appear().settled().await;

        assert!(view.view(BOUNDS, ContentMode::Fit).is_placeholder());
    }

    #[tokio::test]
    async fn test_end_to_end_survives_restart() {
        let temp = TempDir::new().unwrap();

        {
            let cache = Arc::new(ImageCache::under(temp.path()));
            let fetcher = Arc::new(MockImageFetcher::new());
            fetcher.respond(URL, jpeg(30, 10, [200, 100, 50]));
            let mut view = view(&cache, &fetcher, URL);

            view.on_appear().settled().await;
            assert!(!view.view(BOUNDS, ContentMode::Fit).is_placeholder());
            assert_eq!(fetcher.calls(), 1);
        }

        let cache = Arc::new(ImageCache::under(temp.path()));
        let fetcher = Arc::new(MockImageFetcher::new());
        let mut view = view(&cache, &fetcher, URL);
        assert!(cache.get_from_memory(URL).is_none());

        view.on_appear().settled().await;

        match view.view(BOUNDS, ContentMode::Fit) {
            Rendered::Image { image, size } => {
                assert_eq!((image.width(), image.height()), (30, 10));
                assert_eq!(size, Size::new(100, 33));
            }
            Rendered::Placeholder(_) => panic!("expected image from disk"),
        }
        assert_eq!(fetcher.calls(), 0);
        assert!(cache.get_from_memory(URL).is_some());
    }
}

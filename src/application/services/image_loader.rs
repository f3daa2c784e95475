//! Per-consumer image loading.
//!
//! Each view owns one [`ImageLoader`]. The loader publishes a single
//! "current image" through a `watch` channel; the shared [`ImageCache`]
//! does the storage and network work.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::domain::entities::DecodedImage;
use crate::domain::errors::ImageResult;
use crate::domain::ports::ImageFetcherPort;
use crate::infrastructure::image::ImageCache;

/// What a call to [`ImageLoader::load`] did.
#[derive(Debug)]
pub enum LoadStatus {
    /// No identifier was given; nothing changed.
    Skipped,
    /// Served from memory and published before returning.
    Ready,
    /// Disk lookup or network fetch running in the background.
    Pending(JoinHandle<()>),
}

impl LoadStatus {
    /// Waits for background work, if any, to finish publishing.
    pub async fn settled(self) {
        if let Self::Pending(handle) = self {
            let _ = handle.await;
        }
    }

    /// Returns true if the image was published synchronously.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[derive(Debug, Default)]
struct Request {
    generation: u64,
    url: Option<String>,
    published_url: Option<String>,
    loading: bool,
}

struct LoaderState {
    image: watch::Sender<Option<DecodedImage>>,
    current: Mutex<Request>,
}

impl LoaderState {
    /// Publishes `image` only if `generation` is still the latest request.
    fn publish(&self, generation: u64, image: DecodedImage) -> bool {
        let mut guard = self.current.lock();
        let current = &mut *guard;
        if current.generation != generation {
            return false;
        }
        current.loading = false;
        current.published_url.clone_from(&current.url);
        self.image.send_replace(Some(image));
        true
    }

    /// Marks the request for `generation` as finished without an image.
    fn settle(&self, generation: u64) {
        let mut current = self.current.lock();
        if current.generation == generation {
            current.loading = false;
        }
    }
}

/// Bridges one resource identifier at a time to a published image.
pub struct ImageLoader {
    state: Arc<LoaderState>,
    cache: Arc<ImageCache>,
    fetcher: Arc<dyn ImageFetcherPort>,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("requested", &self.state.current.lock().url)
            .field("has_image", &self.state.image.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a loader backed by the shared `cache`.
    #[must_use]
    pub fn new(cache: Arc<ImageCache>, fetcher: Arc<dyn ImageFetcherPort>) -> Self {
        let (image, _) = watch::channel(None);
        Self {
            state: Arc::new(LoaderState {
                image,
                current: Mutex::new(Request::default()),
            }),
            cache,
            fetcher,
        }
    }

    /// The currently published image.
    #[must_use]
    pub fn image(&self) -> Option<DecodedImage> {
        self.state.image.borrow().clone()
    }

    /// Subscribes to changes of the published image.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<DecodedImage>> {
        self.state.image.subscribe()
    }

    /// Identifier of the most recent load request.
    #[must_use]
    pub fn requested_url(&self) -> Option<String> {
        self.state.current.lock().url.clone()
    }

    /// Identifier the published image was loaded for.
    #[must_use]
    pub fn published_url(&self) -> Option<String> {
        self.state.current.lock().published_url.clone()
    }

    /// Returns true while the most recent request has neither published nor
    /// failed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.current.lock().loading
    }

    /// Starts loading `url`.
    ///
    /// - `None` does nothing, including to work already in flight.
    /// - A memory hit is published before this returns; no task is spawned.
    /// - Otherwise a background task checks disk, then the network, and
    ///   publishes on success. Failures are logged and leave the published
    ///   image untouched.
    ///
    /// A newer request supersedes older ones: their results are dropped
    /// instead of overwriting the newer state. Results arriving after the
    /// loader is dropped are discarded too.
    ///
    /// Must be called within a Tokio runtime unless the image is in memory.
    pub fn load(&self, url: Option<&str>) -> LoadStatus {
        let Some(url) = url else {
            return LoadStatus::Skipped;
        };

        let generation = {
            let mut current = self.state.current.lock();
            current.generation += 1;
            current.url = Some(url.to_string());
            current.loading = true;
            current.generation
        };

        if let Some(image) = self.cache.get_from_memory(url) {
            self.state.publish(generation, image);
            return LoadStatus::Ready;
        }

        let state = Arc::downgrade(&self.state);
        let cache = Arc::clone(&self.cache);
        let fetcher = Arc::clone(&self.fetcher);
        let url = url.to_string();

        LoadStatus::Pending(tokio::spawn(async move {
            let result = cache.fetch_through(&url, fetcher).await;
            finish(&state, generation, result.map(|loaded| loaded.image), &url);
        }))
    }
}

fn finish(
    state: &Weak<LoaderState>,
    generation: u64,
    result: ImageResult<DecodedImage>,
    url: &str,
) {
    let image = match result {
        Ok(image) => image,
        Err(e) => {
            warn!(url = %url, error = %e, "Image load failed");
            if let Some(state) = state.upgrade() {
                state.settle(generation);
            }
            return;
        }
    };

    let Some(state) = state.upgrade() else {
        trace!(url = %url, "Loader dropped before image arrived");
        return;
    };
    if state.publish(generation, image) {
        debug!(url = %url, "Published image");
    } else {
        debug!(url = %url, "Discarded stale image result");
    }
}

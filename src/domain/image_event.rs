//! Structured events emitted by the image cache and loader.

use tokio::sync::mpsc;

use super::entities::CacheKey;
use super::errors::ImageError;

/// Something observable happened in the image pipeline.
///
/// Every event is also logged through `tracing`; the channel exists so
/// callers can inspect failures without depending on a log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEvent {
    /// Served from the memory tier.
    MemoryHit(CacheKey),
    /// Served from the disk tier and promoted into memory.
    DiskHit(CacheKey),
    /// Absent from both tiers (or unreadable on disk).
    Miss(CacheKey),
    /// Stored in memory and persisted to disk.
    Stored(CacheKey),
    /// Stored in memory, but the disk write failed.
    PersistFailed {
        /// Affected key.
        key: CacheKey,
        /// Underlying error message.
        message: String,
    },
    /// Bytes arrived from the network and decoded.
    Fetched(CacheKey),
    /// A request joined a fetch already in flight for the same key.
    FetchJoined(CacheKey),
    /// The network fetch failed.
    FetchFailed {
        /// Affected key.
        key: CacheKey,
        /// Failure reported by the fetcher.
        error: ImageError,
    },
    /// Fetched bytes were not a decodable image.
    DecodeFailed {
        /// Affected key.
        key: CacheKey,
        /// Failure reported by the decoder.
        error: ImageError,
    },
    /// Both tiers were cleared.
    Cleared,
}

/// Optional sender for [`ImageEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventSink(Option<mpsc::UnboundedSender<ImageEvent>>);

impl EventSink {
    /// A sink that drops every event.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// A sink forwarding to `tx`.
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<ImageEvent>) -> Self {
        Self(Some(tx))
    }

    /// Sends `event`; a closed receiver is ignored.
    pub fn emit(&self, event: ImageEvent) {
        if let Some(tx) = &self.0 {
            let _ = tx.send(event);
        }
    }
}

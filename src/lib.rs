//! Soundboard - animal soundboard backend
//!
//! Maps a small fixed catalog of animals to audio clips and enriches each
//! entry with a photo from a remote image search service. The interesting
//! part is [`ImageFetchCache`]: a bounded FIFO cache in front of a
//! rate-limited search provider that always has something to show, falling
//! back to bundled placeholder images when offline or on any error.
//!
//! # Image Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use soundboard::{
//!     CacheConfig, FetchOptions, ImageFetchCache, ManualConnectivity, PexelsClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> soundboard::Result<()> {
//!     let client = PexelsClient::new("your-api-key")?;
//!     let images = ImageFetchCache::new(
//!         Arc::new(client),
//!         Arc::new(ManualConnectivity::default()),
//!         CacheConfig::default(),
//!     );
//!
//!     let lion = images.fetch("Lion", &FetchOptions::default()).await;
//!     println!("{} (fallback: {})", lion.primary().url, lion.is_fallback());
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cache;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod config;
pub mod connectivity;
pub mod error;
pub mod providers;
pub mod soundboard;
pub mod storage;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use audio::{AudioClip, AudioPlayer, PlaybackEvent, SilentPlayer};
pub use cache::{CacheConfig, ImageFetchCache, OfflinePolicy};
pub use catalog::{Animal, AnimalCatalog};
pub use connectivity::{Connectivity, ManualConnectivity, StaticConnectivity};
pub use error::{Result, SoundboardError};
pub use providers::{ImageSearchProvider, PexelsClient, SearchRequest, SearchResponse};
pub use soundboard::Soundboard;
pub use storage::{
    AnalyticsEvent, AnalyticsLog, FavoritesStore, FileStore, KeyValueStore, MemoryStore,
    StatsSummary,
};

// Re-export all types
pub use types::{
    CacheMetrics, CacheStats, FetchOptions, ImageDescriptor, ImageResult, ImageVariants,
    MetricsSnapshot, Orientation, SizeVariant,
};

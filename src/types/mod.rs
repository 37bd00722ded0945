//! Public types for the soundboard API.

mod image;
mod metrics;

pub use image::{
    FetchOptions, GALLERY_SIZE, ImageDescriptor, ImageResult, ImageVariants, Orientation,
    SizeVariant,
};
pub use metrics::{CacheMetrics, CacheStats, MetricsSnapshot};

//! Remote image search providers.
//!
//! [`ImageSearchProvider`] is the seam; [`PexelsClient`] talks to the real
//! service over HTTP.

pub mod pexels;
pub mod traits;

pub use pexels::PexelsClient;
pub use traits::{ImageSearchProvider, Photo, PhotoSource, SearchRequest, SearchResponse};

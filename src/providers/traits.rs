//! Provider trait for remote image search.
//!
//! The image cache talks to the search service only through
//! [`ImageSearchProvider`], so tests and alternative backends can stand in
//! for the real HTTP client.
//!
//! # Error Semantics
//!
//! Providers report every failure (non-2xx status, unreadable body, network
//! error) as an `Err`. A well-formed response with zero photos is `Ok` with an
//! empty `photos` list; callers decide whether that is a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::{ImageDescriptor, ImageVariants, Orientation, SizeVariant};

/// One search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    pub per_page: u32,
    pub orientation: Orientation,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            per_page: 1,
            orientation: Orientation::All,
        }
    }

    pub fn per_page(mut self, n: u32) -> Self {
        self.per_page = n;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Search response body: `{ "photos": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// A photo as returned by the search service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub photographer: String,
    #[serde(default)]
    pub photographer_url: Option<String>,
    /// Photo page at the provider.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub avg_color: Option<String>,
    #[serde(default)]
    pub src: PhotoSource,
}

/// Size-variant URLs of a photo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoSource {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub landscape: Option<String>,
}

impl Photo {
    /// Project onto the display shape for `size`.
    ///
    /// Uses the URL for `size`, then `medium`, then any URL the provider
    /// reported. `label` names the subject in the title and alt text.
    pub fn to_descriptor(&self, size: SizeVariant, label: &str) -> ImageDescriptor {
        let variants = ImageVariants {
            original: self.src.original.clone(),
            large: self.src.large.clone(),
            medium: self.src.medium.clone(),
            small: self.src.small.clone(),
        };
        let url = variants
            .get(size)
            .or(variants.medium.as_deref())
            .or(variants.large.as_deref())
            .or(variants.original.as_deref())
            .or(variants.small.as_deref())
            .or(self.src.landscape.as_deref())
            .unwrap_or_default()
            .to_string();

        let alt_text = match self.alt.as_deref() {
            Some(alt) if !alt.trim().is_empty() => alt.to_string(),
            _ => format!("Stunning {label} photograph by {}", self.photographer),
        };

        ImageDescriptor {
            url,
            title: format!("Beautiful {}", crate::catalog::fallback::capitalize(label)),
            photographer: self.photographer.clone(),
            alt_text,
            source_url: self.url.clone(),
            is_fallback: false,
            width: self.width,
            height: self.height,
            provider_id: Some(self.id),
            photographer_url: self.photographer_url.clone(),
            average_color: self.avg_color.clone(),
            variants,
        }
    }

    /// Whether the photo carries at least one usable image URL.
    pub fn has_image(&self) -> bool {
        [
            &self.src.original,
            &self.src.large,
            &self.src.medium,
            &self.src.small,
            &self.src.landscape,
        ]
        .iter()
        .any(|u| u.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

/// Remote image search service.
#[async_trait]
pub trait ImageSearchProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Run one search. Exactly one network request per call.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

//! Image descriptor and lookup option types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SoundboardError;

/// Display-ready image, either a live photo or a bundled fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    /// Image source; may be a `data:` URI for fallbacks.
    pub url: String,
    pub title: String,
    pub photographer: String,
    pub alt_text: String,
    /// Page of the photo at the provider. Always `None` for fallbacks.
    pub source_url: Option<String>,
    pub is_fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_color: Option<String>,
    /// Passthrough size-variant URLs from the provider.
    #[serde(default, skip_serializing_if = "ImageVariants::is_empty")]
    pub variants: ImageVariants,
}

/// Size-variant URLs reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariants {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
}

impl ImageVariants {
    pub fn is_empty(&self) -> bool {
        self.original.is_none()
            && self.large.is_none()
            && self.medium.is_none()
            && self.small.is_none()
    }

    /// URL for `size`, if the provider reported one.
    pub fn get(&self, size: SizeVariant) -> Option<&str> {
        match size {
            SizeVariant::Small => self.small.as_deref(),
            SizeVariant::Medium => self.medium.as_deref(),
            SizeVariant::Large => self.large.as_deref(),
            SizeVariant::Original => self.original.as_deref(),
        }
    }
}

/// Named image resolution tier. Part of the cache key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeVariant {
    Small,
    #[default]
    Medium,
    Large,
    Original,
}

impl SizeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeVariant::Small => "small",
            SizeVariant::Medium => "medium",
            SizeVariant::Large => "large",
            SizeVariant::Original => "original",
        }
    }
}

impl fmt::Display for SizeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeVariant {
    type Err = SoundboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SizeVariant::Small),
            "medium" => Ok(SizeVariant::Medium),
            "large" => Ok(SizeVariant::Large),
            "original" => Ok(SizeVariant::Original),
            other => Err(SoundboardError::Configuration(format!(
                "unknown size variant '{other}'"
            ))),
        }
    }
}

/// Photo orientation filter sent to the search provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    All,
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::All => "all",
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }
}

impl FromStr for Orientation {
    type Err = SoundboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Orientation::All),
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            "square" => Ok(Orientation::Square),
            other => Err(SoundboardError::Configuration(format!(
                "unknown orientation '{other}'"
            ))),
        }
    }
}

/// Options for a single image lookup.
///
/// ```rust
/// # use soundboard::{FetchOptions, SizeVariant};
/// let options = FetchOptions::new().size(SizeVariant::Large).multiple(true);
/// assert_eq!(options.size, SizeVariant::Large);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub size: SizeVariant,
    /// Request a gallery of up to [`GALLERY_SIZE`] photos instead of one.
    pub multiple: bool,
    pub orientation: Orientation,
}

/// Maximum number of photos in a gallery lookup.
pub const GALLERY_SIZE: u32 = 5;

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: SizeVariant) -> Self {
        self.size = size;
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Number of photos to request from the provider.
    pub fn per_page(&self) -> u32 {
        if self.multiple { GALLERY_SIZE } else { 1 }
    }
}

/// Outcome of a lookup: one descriptor, or a gallery when
/// [`FetchOptions::multiple`] was set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageResult {
    Single(ImageDescriptor),
    /// Never empty.
    Gallery(Vec<ImageDescriptor>),
}

impl ImageResult {
    /// The first (or only) descriptor.
    pub fn primary(&self) -> &ImageDescriptor {
        match self {
            ImageResult::Single(d) => d,
            // galleries are built from at least one photo or one fallback
            ImageResult::Gallery(items) => &items[0],
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.primary().is_fallback
    }

    pub fn len(&self) -> usize {
        match self {
            ImageResult::Single(_) => 1,
            ImageResult::Gallery(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<ImageDescriptor> {
        match self {
            ImageResult::Single(d) => vec![d],
            ImageResult::Gallery(items) => items,
        }
    }
}

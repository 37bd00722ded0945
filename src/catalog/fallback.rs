//! Bundled placeholder images.
//!
//! Every known animal has a pre-baked SVG descriptor; anything else gets the
//! generic one. The table is built once and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::{ImageDescriptor, ImageVariants};

/// Photographer credited on every fallback.
pub const FALLBACK_PHOTOGRAPHER: &str = "Animal Sounds Team";

/// Generic placeholder (paw print on a neutral background).
const GENERIC_FALLBACK_URL: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iNDAwIiBoZWlnaHQ9IjQwMCIgdmlld0JveD0iMCAwIDQwMCA0MDAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+PHJlY3Qgd2lkdGg9IjQwMCIgaGVpZ2h0PSI0MDAiIGZpbGw9IiNFN0UwRUMiLz48dGV4dCB4PSIyMDAiIHk9IjIwMCIgdGV4dC1hbmNob3I9Im1pZGRsZSIgZG9taW5hbnQtYmFzZWxpbmU9Im1pZGRsZSIgZm9udC1mYW1pbHk9IkFyaWFsIiBmb250LXNpemU9IjY0IiBmaWxsPSIjOTM4Rjk5Ij7wn6aCPC90ZXh0Pjwvc3ZnPg==";

struct FallbackTile {
    id: &'static str,
    label: &'static str,
    /// Background colour, hex without `#`.
    color: &'static str,
    font_size: u32,
    title: &'static str,
    alt: &'static str,
}

const FALLBACK_TILES: &[FallbackTile] = &[
    FallbackTile {
        id: "lion",
        label: "LION",
        color: "FFB74D",
        font_size: 48,
        title: "Lion - King of the Jungle",
        alt: "Majestic lion illustration",
    },
    FallbackTile {
        id: "elephant",
        label: "ELEPHANT",
        color: "90A4AE",
        font_size: 36,
        title: "Elephant - Gentle Giant",
        alt: "Wise elephant illustration",
    },
    FallbackTile {
        id: "dog",
        label: "DOG",
        color: "BCAAA4",
        font_size: 48,
        title: "Dog - Loyal Companion",
        alt: "Friendly dog illustration",
    },
    FallbackTile {
        id: "cat",
        label: "CAT",
        color: "CE93D8",
        font_size: 48,
        title: "Cat - Independent Spirit",
        alt: "Graceful cat illustration",
    },
    FallbackTile {
        id: "bird",
        label: "BIRD",
        color: "81C784",
        font_size: 48,
        title: "Bird - Freedom in Flight",
        alt: "Beautiful bird illustration",
    },
    FallbackTile {
        id: "frog",
        label: "FROG",
        color: "AED581",
        font_size: 48,
        title: "Frog - Pond Dweller",
        alt: "Cheerful frog illustration",
    },
];

static FALLBACKS: LazyLock<HashMap<&'static str, ImageDescriptor>> = LazyLock::new(|| {
    FALLBACK_TILES
        .iter()
        .map(|tile| {
            let descriptor = fallback_descriptor(
                svg_data_uri(tile.label, tile.color, tile.font_size),
                tile.title.to_string(),
                tile.alt.to_string(),
            );
            (tile.id, descriptor)
        })
        .collect()
});

/// Inline SVG tile with a coloured background and a centred label.
fn svg_data_uri(label: &str, color: &str, font_size: u32) -> String {
    format!(
        "data:image/svg+xml;charset=utf-8,<svg width=\"400\" height=\"400\" viewBox=\"0 0 400 400\" \
         xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"400\" height=\"400\" fill=\"%23{color}\"/>\
         <text x=\"200\" y=\"220\" text-anchor=\"middle\" font-family=\"Arial\" \
         font-size=\"{font_size}\" fill=\"white\">{label}</text></svg>"
    )
}

fn fallback_descriptor(url: String, title: String, alt_text: String) -> ImageDescriptor {
    ImageDescriptor {
        url,
        title,
        photographer: FALLBACK_PHOTOGRAPHER.to_string(),
        alt_text,
        source_url: None,
        is_fallback: true,
        width: None,
        height: None,
        provider_id: None,
        photographer_url: None,
        average_color: None,
        variants: ImageVariants::default(),
    }
}

/// Upper-case the first character (`"lion"` → `"Lion"`).
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fallback descriptor for a normalised animal id.
///
/// Known ids get their bundled tile; unknown ids get the generic
/// placeholder titled after the id.
pub fn fallback_for(animal_id: &str) -> ImageDescriptor {
    if let Some(descriptor) = FALLBACKS.get(animal_id) {
        return descriptor.clone();
    }
    let name = capitalize(animal_id);
    fallback_descriptor(
        GENERIC_FALLBACK_URL.to_string(),
        format!("{name} - Wildlife Image"),
        format!("Generic {animal_id} illustration"),
    )
}

/// Whether `animal_id` has a dedicated fallback tile.
pub fn has_dedicated_fallback(animal_id: &str) -> bool {
    FALLBACKS.contains_key(animal_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_animals_have_dedicated_tiles() {
        for id in ["lion", "elephant", "dog", "cat", "bird", "frog"] {
            assert!(has_dedicated_fallback(id), "{id} should have a tile");
            let d = fallback_for(id);
            assert!(d.is_fallback);
            assert!(d.source_url.is_none());
            assert!(d.url.starts_with("data:image/svg+xml"));
        }
        assert_eq!(fallback_for("lion").title, "Lion - King of the Jungle");
        assert!(fallback_for("elephant").url.contains("ELEPHANT"));
    }

    #[test]
    fn unknown_animal_gets_generic() {
        let d = fallback_for("dragon");
        assert!(d.is_fallback);
        assert_eq!(d.url, GENERIC_FALLBACK_URL);
        assert_eq!(d.title, "Dragon - Wildlife Image");
        assert_eq!(d.alt_text, "Generic dragon illustration");
    }

    #[test]
    fn empty_id_gets_generic() {
        let d = fallback_for("");
        assert!(d.is_fallback);
        assert_eq!(d.title, " - Wildlife Image");
    }

    #[test]
    fn capitalize_handles_unicode() {
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(capitalize(""), "");
    }
}

//! Animal catalog: the fixed set of soundboard entries, their audio clips,
//! search phrases and bundled fallback images.

pub mod fallback;

pub use fallback::{fallback_for, has_dedicated_fallback};

use serde::{Deserialize, Serialize};

/// One soundboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    /// Normalised identifier, e.g. `"lion"`.
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub description: String,
    pub habitat: String,
    pub continent: String,
    /// Sound identifier handed to the audio player, e.g. `"LionRoar"`.
    pub sound_id: String,
    /// Path of the audio clip.
    pub audio: String,
    pub emoji: String,
}

/// Immutable catalog of animals.
///
/// ```rust
/// # use soundboard::AnimalCatalog;
/// let catalog = AnimalCatalog::default();
/// assert_eq!(catalog.get(" Lion").unwrap().sound_id, "LionRoar");
/// ```
#[derive(Debug, Clone)]
pub struct AnimalCatalog {
    animals: Vec<Animal>,
}

impl AnimalCatalog {
    pub fn new(animals: Vec<Animal>) -> Self {
        Self { animals }
    }

    /// Look up an animal by id; the id is normalised first.
    pub fn get(&self, animal_id: &str) -> Option<&Animal> {
        let id = normalize_id(animal_id);
        self.animals.iter().find(|a| a.id == id)
    }

    /// Look up an animal by its sound identifier.
    pub fn by_sound(&self, sound_id: &str) -> Option<&Animal> {
        self.animals.iter().find(|a| a.sound_id == sound_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animal> {
        self.animals.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.animals.iter().map(|a| a.id.clone()).collect()
    }

    /// Distinct continents, in catalog order, preceded by `"All"`.
    pub fn continents(&self) -> Vec<String> {
        let mut out = vec!["All".to_string()];
        for animal in &self.animals {
            if !out.contains(&animal.continent) {
                out.push(animal.continent.clone());
            }
        }
        out
    }

    /// Animals on `continent`; `"All"` returns everything.
    pub fn on_continent(&self, continent: &str) -> Vec<&Animal> {
        self.animals
            .iter()
            .filter(|a| continent == "All" || a.continent == continent)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }
}

impl Default for AnimalCatalog {
    fn default() -> Self {
        Self::new(builtin_animals())
    }
}

/// Normalise an animal identifier: trimmed, lowercase.
pub fn normalize_id(animal_id: &str) -> String {
    animal_id.trim().to_lowercase()
}

/// Search phrase for a normalised animal id.
///
/// Hand-tuned phrases for the catalog animals; everything else gets a
/// generic wildlife query.
pub fn search_query(animal_id: &str) -> String {
    let phrase = match animal_id {
        "lion" => "wild lion african safari wildlife",
        "elephant" => "wild elephant africa safari wildlife",
        "dog" => "cute dog pet domestic animal",
        "cat" => "beautiful cat pet domestic feline",
        "bird" => "colorful bird wildlife nature",
        "frog" => "green frog pond nature wildlife",
        other => return format!("wild {other} wildlife nature"),
    };
    phrase.to_string()
}

#[allow(clippy::too_many_arguments)]
fn animal(
    id: &str,
    name: &str,
    scientific_name: &str,
    description: &str,
    habitat: &str,
    continent: &str,
    sound_id: &str,
    emoji: &str,
) -> Animal {
    Animal {
        id: id.into(),
        name: name.into(),
        scientific_name: scientific_name.into(),
        description: description.into(),
        habitat: habitat.into(),
        continent: continent.into(),
        sound_id: sound_id.into(),
        audio: format!("/audio/{sound_id}.mp3"),
        emoji: emoji.into(),
    }
}

fn builtin_animals() -> Vec<Animal> {
    vec![
        animal(
            "lion",
            "Lion",
            "Panthera leo",
            "Lions are apex predators known for their powerful roar that can be heard up to 5 miles away.",
            "Savannas, grasslands, and woodlands",
            "Africa",
            "LionRoar",
            "🦁",
        ),
        animal(
            "elephant",
            "Elephant",
            "Loxodonta africana",
            "The African elephant is the largest land mammal and communicates with low-frequency rumbles.",
            "Savannas, forests, and deserts",
            "Africa",
            "ElephantTrumpet",
            "🐘",
        ),
        animal(
            "dog",
            "Dog",
            "Canis lupus familiaris",
            "Domestic dogs have evolved alongside humans for thousands of years, developing diverse vocalizations.",
            "Human settlements worldwide",
            "Global",
            "DogBark",
            "🐶",
        ),
        animal(
            "cat",
            "Cat",
            "Felis catus",
            "Cats communicate with a wide range of sounds including purring, meowing, chirping, and trilling.",
            "Human settlements worldwide",
            "Global",
            "CatMeow",
            "🐱",
        ),
        animal(
            "bird",
            "Songbird",
            "Passeriformes",
            "Songbirds produce complex melodies to mark territory, attract mates, and warn of danger.",
            "Forests, grasslands, wetlands",
            "Global",
            "BirdChirp",
            "🐦",
        ),
        animal(
            "frog",
            "Tree Frog",
            "Hyla cinerea",
            "Tree frogs use croaks, ribbits, and chirps to communicate during the night in humid environments.",
            "Wetlands, forests",
            "North America",
            "FrogCroak",
            "🐸",
        ),
    ]
}

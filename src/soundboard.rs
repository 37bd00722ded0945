//! Soundboard composition root.
//!
//! Wires the catalog, image cache, persisted state and audio player together
//! and records analytics for user actions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;
use tokio::sync::{Mutex as AsyncMutex, broadcast};
use tracing::{debug, info};

use crate::audio::{AudioClip, AudioPlayer, PlaybackEvent, clamp_volume};
use crate::cache::ImageFetchCache;
use crate::catalog::{Animal, AnimalCatalog, normalize_id};
use crate::storage::analytics::{FAVORITE_TOGGLED, FAVORITES_CLEARED, SESSION_START, SOUND_PLAYED};
use crate::storage::{AnalyticsLog, FavoritesStore, KeyValueStore, StatsSummary};
use crate::types::{ImageDescriptor, ImageResult};
use crate::{Result, SoundboardError};

/// Buffered playback notifications per subscriber.
const EVENT_BUFFER: usize = 32;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Application state behind the soundboard UI.
pub struct Soundboard {
    catalog: AnimalCatalog,
    images: Arc<ImageFetchCache>,
    favorites: FavoritesStore,
    analytics: AnalyticsLog,
    player: Arc<dyn AudioPlayer>,
    playing: Mutex<Option<AudioClip>>,
    // serialises play and stop so at most one clip is started at a time
    transport: AsyncMutex<()>,
    volume: Mutex<f32>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl Soundboard {
    pub fn new(
        catalog: AnimalCatalog,
        images: Arc<ImageFetchCache>,
        store: Arc<dyn KeyValueStore>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            catalog,
            images,
            favorites: FavoritesStore::load(Arc::clone(&store)),
            analytics: AnalyticsLog::new(store),
            player,
            playing: Mutex::new(None),
            transport: AsyncMutex::new(()),
            volume: Mutex::new(1.0),
            events,
        }
    }

    pub fn catalog(&self) -> &AnimalCatalog {
        &self.catalog
    }

    pub fn images(&self) -> &Arc<ImageFetchCache> {
        &self.images
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn analytics(&self) -> &AnalyticsLog {
        &self.analytics
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Record the start of a session.
    pub fn start_session(&self) {
        self.analytics.record(SESSION_START, json!({}));
        info!(animals = self.catalog.len(), "soundboard session started");
    }

    pub fn set_volume(&self, volume: f32) {
        *lock(&self.volume) = clamp_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        *lock(&self.volume)
    }

    /// Sound id currently playing, if any.
    pub fn now_playing(&self) -> Option<String> {
        lock(&self.playing).as_ref().map(|c| c.sound_id.clone())
    }

    /// Play the clip for `animal_id`, stopping whatever was playing.
    pub async fn play(&self, animal_id: &str) -> Result<Animal> {
        let animal = self
            .catalog
            .get(animal_id)
            .cloned()
            .ok_or_else(|| SoundboardError::UnknownAnimal(normalize_id(animal_id)))?;

        let _transport = self.transport.lock().await;
        self.stop_current().await?;

        let clip = AudioClip {
            sound_id: animal.sound_id.clone(),
            animal_id: animal.id.clone(),
            source: animal.audio.clone(),
            volume: self.volume(),
        };
        self.player.play(&clip).await?;
        *lock(&self.playing) = Some(clip.clone());
        // no subscribers is fine
        let _ = self.events.send(PlaybackEvent::Started {
            sound_id: clip.sound_id,
            animal_id: clip.animal_id,
        });

        self.analytics
            .record(SOUND_PLAYED, json!({ "animal": animal.name, "id": animal.id }));
        debug!(animal = %animal.id, "sound played");
        Ok(animal)
    }

    /// Stop the current clip. No-op when nothing is playing.
    pub async fn stop(&self) -> Result<()> {
        let _transport = self.transport.lock().await;
        self.stop_current().await
    }

    async fn stop_current(&self) -> Result<()> {
        let current = lock(&self.playing).take();
        if let Some(clip) = current {
            self.player.stop(&clip.sound_id).await?;
            let _ = self.events.send(PlaybackEvent::Stopped {
                sound_id: clip.sound_id,
                animal_id: clip.animal_id,
            });
        }
        Ok(())
    }

    /// Called by the platform when `sound_id` played to the end.
    pub fn playback_ended(&self, sound_id: &str) {
        let mut playing = lock(&self.playing);
        if playing.as_ref().is_some_and(|c| c.sound_id == sound_id) {
            if let Some(clip) = playing.take() {
                let _ = self.events.send(PlaybackEvent::Ended {
                    sound_id: clip.sound_id,
                    animal_id: clip.animal_id,
                });
            }
        }
    }

    /// Flip a favorite. Returns whether it is now a favorite.
    pub fn toggle_favorite(&self, animal_id: &str) -> bool {
        let id = normalize_id(animal_id);
        let is_favorite = self.favorites.toggle(&id);
        self.analytics
            .record(FAVORITE_TOGGLED, json!({ "animal": id, "isFavorite": is_favorite }));
        is_favorite
    }

    pub fn clear_favorites(&self) {
        self.favorites.clear();
        self.analytics.record(FAVORITES_CLEARED, json!({}));
    }

    /// Favorite animals in the order they were added; unknown ids are skipped.
    pub fn favorite_animals(&self) -> Vec<Animal> {
        self.favorites
            .list()
            .iter()
            .filter_map(|id| self.catalog.get(id).cloned())
            .collect()
    }

    /// Image for `animal_id`. Always resolves.
    pub async fn image(&self, animal_id: &str) -> ImageDescriptor {
        self.images.fetch_image(animal_id).await
    }

    /// Warm the image cache for every catalog animal.
    pub async fn preload_images(&self) -> Vec<ImageResult> {
        self.images.preload(self.catalog.ids()).await
    }

    pub fn stats(&self) -> StatsSummary {
        self.analytics.summary()
    }
}

//! Audio playback seam.
//!
//! Decoding and output belong to the platform; the soundboard only hands a
//! clip to an [`AudioPlayer`] and tracks what is playing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A clip to play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioClip {
    /// Sound identifier, e.g. `"LionRoar"`.
    pub sound_id: String,
    /// Animal the clip belongs to.
    pub animal_id: String,
    /// Path or URL of the audio resource.
    pub source: String,
    /// 0.0 ..= 1.0
    pub volume: f32,
}

/// Playback notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started { sound_id: String, animal_id: String },
    Stopped { sound_id: String, animal_id: String },
    /// The clip played to the end.
    Ended { sound_id: String, animal_id: String },
}

/// Platform audio backend.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Start playing `clip`. Returns once playback has begun.
    ///
    /// Backend failures should be reported as
    /// [`SoundboardError::Playback`](crate::SoundboardError::Playback).
    async fn play(&self, clip: &AudioClip) -> Result<()>;

    /// Stop `sound_id` if it is playing.
    async fn stop(&self, sound_id: &str) -> Result<()>;
}

/// Player that accepts every request and produces no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

#[async_trait]
impl AudioPlayer for SilentPlayer {
    async fn play(&self, _clip: &AudioClip) -> Result<()> {
        Ok(())
    }

    async fn stop(&self, _sound_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Clamp a volume to `0.0 ..= 1.0`; NaN becomes 0.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

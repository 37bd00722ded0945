//! Soundboard error types

use std::time::Duration;

/// Soundboard error types
#[derive(Debug, thiserror::Error)]
pub enum SoundboardError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("no images found for query '{query}'")]
    EmptyResponse { query: String },

    #[error("offline: remote lookups are unavailable")]
    Offline,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Persisted state errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("unknown animal: {0}")]
    UnknownAnimal(String),

    /// Raised by [`AudioPlayer`](crate::AudioPlayer) backends that cannot
    /// start or stop a clip. [`Soundboard::play`](crate::Soundboard::play)
    /// passes it through unchanged.
    #[error("audio playback failed: {0}")]
    Playback(String),
}

impl From<reqwest::Error> for SoundboardError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SoundboardError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => SoundboardError::Http(err.to_string()),
        }
    }
}

impl SoundboardError {
    /// Short label used for the `reason` telemetry tag on fallbacks.
    pub fn kind(&self) -> &'static str {
        match self {
            SoundboardError::Http(_) => "http",
            SoundboardError::Api { .. } => "api",
            SoundboardError::Timeout(_) => "timeout",
            SoundboardError::EmptyResponse { .. } => "empty",
            SoundboardError::Offline => "offline",
            SoundboardError::Json(_) => "json",
            SoundboardError::Configuration(_) => "configuration",
            SoundboardError::Storage(_) => "storage",
            SoundboardError::UnknownAnimal(_) => "unknown_animal",
            SoundboardError::Playback(_) => "playback",
        }
    }
}

/// Result type alias for soundboard operations
pub type Result<T> = std::result::Result<T, SoundboardError>;

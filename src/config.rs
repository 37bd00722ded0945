//! Configuration loading for the `soundboard` CLI.
//!
//! Configuration is loaded from a TOML file with the following resolution
//! order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.soundboard/config.toml` (user; optional)
//!
//! With neither present, defaults apply. The image search API key is read
//! from `PEXELS_API_KEY` first, then from `[images] api_key`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{CacheConfig, ImageFetchCache, OfflinePolicy};
use crate::connectivity::Connectivity;
use crate::providers::PexelsClient;
use crate::providers::pexels::DEFAULT_BASE_URL;
use crate::storage::default_state_path;
use crate::types::Orientation;
use crate::{Result, SoundboardError};

/// Environment variable holding the image search API key.
pub const API_KEY_ENV: &str = "PEXELS_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Image search and cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// Search API base URL (default: https://api.pexels.com/v1).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key; `PEXELS_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    /// Cached lookups (default: 50).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Spacing between remote requests in milliseconds (default: 1000).
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Replay offline lookups once back online (default: false).
    #[serde(default)]
    pub queue_offline: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            orientation: Orientation::default(),
            max_entries: default_max_entries(),
            min_interval_ms: default_min_interval_ms(),
            request_timeout_secs: default_timeout(),
            queue_offline: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_entries() -> usize {
    50
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_timeout() -> u64 {
    10
}

/// Persisted state settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// State file (default: `~/.cache/soundboard/state.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    SoundboardError::Configuration(format!(
                        "Failed to read config file {path:?}: {e}"
                    ))
                })?;
                Self::from_toml(&content).map_err(|e| {
                    SoundboardError::Configuration(format!(
                        "Failed to parse config file {path:?}: {e}"
                    ))
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SoundboardError::Configuration(e.to_string()))
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SoundboardError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".soundboard").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    /// API key from the environment, else from the config file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.images.api_key.clone())
    }

    pub fn cache_config(&self) -> CacheConfig {
        let policy = if self.images.queue_offline {
            OfflinePolicy::FallbackAndQueue
        } else {
            OfflinePolicy::Fallback
        };
        CacheConfig::new()
            .max_entries(self.images.max_entries)
            .min_interval(Duration::from_millis(self.images.min_interval_ms))
            .request_timeout(Duration::from_secs(self.images.request_timeout_secs))
            .offline_policy(policy)
    }

    pub fn state_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(default_state_path)
    }

    /// Build the image cache described by this configuration.
    pub fn build_cache(&self, connectivity: Arc<dyn Connectivity>) -> Result<ImageFetchCache> {
        let cache_config = self.cache_config();
        let client = PexelsClient::with_timeout(
            self.api_key(),
            &self.images.base_url,
            cache_config.request_timeout,
        )?;
        Ok(ImageFetchCache::new(Arc::new(client), connectivity, cache_config))
    }
}

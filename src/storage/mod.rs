//! Persisted local state.
//!
//! A flat key → JSON string store, namespaced by fixed keys. Favorites and
//! analytics serialise themselves into it; there is no schema versioning
//! beyond the key name.

pub mod analytics;
pub mod favorites;

pub use analytics::{AnalyticsEvent, AnalyticsLog, StatsSummary};
pub use favorites::FavoritesStore;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::{Result, SoundboardError};

/// Flat key-value store holding JSON-serialised values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object file.
///
/// The file is read once on open and rewritten on every change (atomic
/// write via tmp + rename). A missing file starts empty; a corrupt file is
/// logged and also starts empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

/// Default state path: `~/.cache/soundboard/state.json`.
pub fn default_state_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("soundboard")
        .join("state.json")
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path).unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        save_entries(&self.path, entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

fn load_entries(path: &Path) -> Option<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read state file");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt state file");
            None
        }
    }
}

fn save_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            SoundboardError::Storage(format!(
                "failed to create state dir {}: {e}",
                parent.display()
            ))
        })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(&tmp_path, &json).map_err(|e| {
        SoundboardError::Storage(format!(
            "failed to write state file {}: {e}",
            tmp_path.display()
        ))
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        SoundboardError::Storage(format!(
            "failed to rename state file {} → {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;
    Ok(())
}

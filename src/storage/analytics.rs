//! Local usage analytics.
//!
//! Events are appended to a JSON array under [`ANALYTICS_KEY`], keeping the
//! most recent [`MAX_EVENTS`]. [`summarize`] folds them into running totals.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::KeyValueStore;

/// Storage key for the event log.
pub const ANALYTICS_KEY: &str = "animal-sounds-analytics-v1";

/// Events kept in storage; older ones are dropped on save.
pub const MAX_EVENTS: usize = 750;

pub const SESSION_START: &str = "session_start";
pub const SOUND_PLAYED: &str = "sound_played";
pub const FAVORITE_TOGGLED: &str = "favorite_toggled";
pub const FAVORITES_CLEARED: &str = "favorites_cleared";

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    #[serde(default)]
    pub data: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Totals derived from the event log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_sessions: u64,
    pub total_interactions: u64,
    pub favorite_count: u64,
    pub last_played: Option<String>,
}

/// Event log backed by a [`KeyValueStore`].
///
/// Every operation re-reads the stored log, so several instances sharing a
/// store see each other's events. Load and save failures are logged and
/// swallowed.
pub struct AnalyticsLog {
    store: Arc<dyn KeyValueStore>,
    // held across load-append-save
    write: Mutex<()>,
}

impl AnalyticsLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    /// All stored events, oldest first.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        let raw = match self.store.get(ANALYTICS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load analytics events");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "corrupt analytics events");
            Vec::new()
        })
    }

    /// Append an event stamped with the current time and return the
    /// updated log.
    pub fn record(&self, name: &str, data: Value) -> Vec<AnalyticsEvent> {
        self.record_at(name, data, now_millis())
    }

    /// Append an event with an explicit timestamp.
    pub fn record_at(&self, name: &str, data: Value, timestamp: u64) -> Vec<AnalyticsEvent> {
        let _write = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = self.events();
        events.push(AnalyticsEvent {
            name: name.to_string(),
            data,
            timestamp,
        });
        if events.len() > MAX_EVENTS {
            events.drain(..events.len() - MAX_EVENTS);
        }
        self.save(&events);
        events
    }

    pub fn summary(&self) -> StatsSummary {
        summarize(&self.events())
    }

    pub fn clear(&self) {
        let _write = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.store.remove(ANALYTICS_KEY) {
            warn!(error = %e, "failed to clear analytics events");
        }
    }

    fn save(&self, events: &[AnalyticsEvent]) {
        let result = serde_json::to_string(events)
            .map_err(crate::SoundboardError::from)
            .and_then(|json| self.store.set(ANALYTICS_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to save analytics events");
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Fold events into totals.
///
/// - `session_start` counts a session.
/// - `sound_played` counts an interaction; `data.animal` becomes
///   `last_played` when present.
/// - `favorite_toggled` with `data.isFavorite` true/false moves the favorite
///   count up/down, never below zero.
pub fn summarize(events: &[AnalyticsEvent]) -> StatsSummary {
    events.iter().fold(StatsSummary::default(), |mut acc, event| {
        match event.name.as_str() {
            SESSION_START => acc.total_sessions += 1,
            SOUND_PLAYED => {
                acc.total_interactions += 1;
                if let Some(animal) = event.data.get("animal").and_then(Value::as_str) {
                    acc.last_played = Some(animal.to_string());
                }
            }
            FAVORITE_TOGGLED => match event.data.get("isFavorite").and_then(Value::as_bool) {
                Some(true) => acc.favorite_count += 1,
                Some(false) => acc.favorite_count = acc.favorite_count.saturating_sub(1),
                None => {}
            },
            _ => {}
        }
        acc
    })
}

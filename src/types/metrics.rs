//! Cache metrics and statistics

use serde::{Deserialize, Serialize};

/// Running counters kept by the image cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetrics {
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Successful remote calls.
    pub remote_calls: u64,
    /// Remote failures that were replaced by a fallback.
    pub errors: u64,
    /// Running mean over successful remote calls only.
    pub average_response_time_ms: f64,
}

impl CacheMetrics {
    /// Fold one successful call's latency into the running mean.
    pub(crate) fn record_success(&mut self, response_time_ms: f64) {
        self.remote_calls += 1;
        let n = self.remote_calls as f64;
        self.average_response_time_ms += (response_time_ms - self.average_response_time_ms) / n;
    }

    /// `hits / (hits + misses)`, or `None` before the first lookup.
    pub fn cache_hit_rate(&self) -> Option<f64> {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            None
        } else {
            Some(self.cache_hits as f64 / total as f64)
        }
    }
}

/// Read-only copy of the cache metrics plus derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[serde(flatten)]
    pub counters: CacheMetrics,
    pub cache_hit_rate: Option<f64>,
    pub is_online: bool,
    pub cache_size: usize,
    pub queued_requests: usize,
}

impl MetricsSnapshot {
    /// Total lookups observed (`hits + misses`).
    pub fn lookups(&self) -> u64 {
        self.counters.cache_hits + self.counters.cache_misses
    }
}

/// Cache contents summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    /// Keys in insertion order, oldest first.
    pub keys: Vec<String>,
}

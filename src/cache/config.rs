//! Image cache configuration.

use std::time::Duration;

/// What an offline lookup does besides returning the fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OfflinePolicy {
    /// Resolve to the fallback for that call and forget the request.
    #[default]
    Fallback,
    /// Resolve to the fallback, and also remember the request so it is
    /// replayed (FIFO, one at a time) once connectivity returns.
    FallbackAndQueue,
}

/// Configuration for [`ImageFetchCache`](crate::ImageFetchCache).
///
/// ```rust
/// # use soundboard::{CacheConfig, OfflinePolicy};
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(100)
///     .min_interval(Duration::from_millis(500))
///     .offline_policy(OfflinePolicy::FallbackAndQueue);
/// assert_eq!(config.max_entries, 100);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum cached lookups. Default: 50.
    pub max_entries: usize,
    /// Minimum spacing between remote request starts. Default: 1s.
    pub min_interval: Duration,
    /// Per-request timeout. Default: 10s.
    pub request_timeout: Duration,
    /// Default: [`OfflinePolicy::Fallback`].
    pub offline_policy: OfflinePolicy,
    /// Share one remote lookup between concurrent callers for the same key.
    /// Default: true.
    pub coalesce_in_flight: bool,
    /// Time-to-live for free-text search results. Default: 1 hour.
    pub search_ttl: Duration,
    /// Maximum cached free-text searches. Default: 200.
    pub search_max_entries: u64,
}

/// Default capacity of the lookup cache.
pub const MAX_ENTRIES: usize = 50;

/// Default spacing between remote requests.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Default remote request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_ENTRIES,
            min_interval: MIN_INTERVAL,
            request_timeout: REQUEST_TIMEOUT,
            offline_policy: OfflinePolicy::default(),
            coalesce_in_flight: true,
            search_ttl: Duration::from_secs(3600),
            search_max_entries: 200,
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn offline_policy(mut self, policy: OfflinePolicy) -> Self {
        self.offline_policy = policy;
        self
    }

    pub fn coalesce_in_flight(mut self, enabled: bool) -> Self {
        self.coalesce_in_flight = enabled;
        self
    }

    pub fn search_ttl(mut self, ttl: Duration) -> Self {
        self.search_ttl = ttl;
        self
    }

    pub fn search_max_entries(mut self, n: u64) -> Self {
        self.search_max_entries = n;
        self
    }
}

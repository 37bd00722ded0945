//! Image fetch cache.
//!
//! [`ImageFetchCache`] resolves an animal id to an [`ImageResult`], trying in
//! order:
//!
//! 1. the local lookup cache (bounded, strict FIFO eviction),
//! 2. a rate-limited remote search (one request, fixed timeout),
//! 3. the bundled fallback for the id.
//!
//! `fetch` never fails: offline, timeouts, HTTP errors and empty results all
//! end in a fallback descriptor marked `is_fallback`.
//!
//! # Concurrency
//!
//! The lookup map, counters and deferred queue sit behind short-lived
//! `std::sync::Mutex` sections that never span an `.await`. The rate limiter
//! holds its own async lock across the wait, so two callers can never both
//! pass the spacing check. With [`CacheConfig::coalesce_in_flight`] enabled,
//! concurrent misses on the same key share one remote lookup.
//!
//! # Free-text search
//!
//! [`ImageFetchCache::search`] runs arbitrary queries through the same
//! provider and rate limiter. Results live in a separate moka TTL cache
//! and, unlike `fetch`, errors are returned to the caller.

pub mod config;
pub mod fifo;
pub mod rate_limit;
mod search;

pub use config::{CacheConfig, OfflinePolicy};
pub use fifo::FifoCache;
pub use rate_limit::RateLimiter;

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use tokio::sync::{OnceCell, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::{fallback_for, normalize_id, search_query};
use crate::connectivity::Connectivity;
use crate::providers::{ImageSearchProvider, SearchRequest};
use crate::telemetry;
use crate::types::{
    CacheMetrics, CacheStats, FetchOptions, ImageDescriptor, ImageResult, MetricsSnapshot,
    Orientation,
};
use crate::{Result, SoundboardError};

use search::{SearchCache, search_key};

/// A lookup remembered while offline.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeferredLookup {
    animal_id: String,
    options: FetchOptions,
}

type InFlight = Arc<OnceCell<ImageResult>>;

/// Cache of resolved animal images with offline fallback and rate limiting.
///
/// Construct one per application and share it by reference (or `Arc`).
pub struct ImageFetchCache {
    provider: Arc<dyn ImageSearchProvider>,
    connectivity: Arc<dyn Connectivity>,
    config: CacheConfig,
    entries: Mutex<FifoCache<String, ImageResult>>,
    metrics: Mutex<CacheMetrics>,
    rate_limiter: RateLimiter,
    in_flight: Mutex<HashMap<String, InFlight>>,
    deferred: Mutex<VecDeque<DeferredLookup>>,
    draining: AtomicBool,
    searches: SearchCache,
}

/// Lock a std mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cache key for a normalised id: `{id}_{size}`, plus `_{orientation}`
/// when a filter other than `all` is set and `_gallery` for multi-photo
/// lookups.
pub fn cache_key(animal_id: &str, options: &FetchOptions) -> String {
    let mut key = format!("{animal_id}_{}", options.size);
    if options.orientation != Orientation::All {
        key.push('_');
        key.push_str(options.orientation.as_str());
    }
    if options.multiple {
        key.push_str("_gallery");
    }
    key
}

/// Clears the drain flag when a replay finishes or is cancelled.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ImageFetchCache {
    pub fn new(
        provider: Arc<dyn ImageSearchProvider>,
        connectivity: Arc<dyn Connectivity>,
        config: CacheConfig,
    ) -> Self {
        Self {
            entries: Mutex::new(FifoCache::new(config.max_entries)),
            metrics: Mutex::new(CacheMetrics::default()),
            rate_limiter: RateLimiter::new(config.min_interval),
            in_flight: Mutex::new(HashMap::new()),
            deferred: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            searches: SearchCache::new(config.search_max_entries, config.search_ttl),
            provider,
            connectivity,
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Resolve `animal_id` to an image. Never fails.
    ///
    /// The id is trimmed and lowercased before lookup. Each call counts as
    /// exactly one cache hit or one cache miss, and performs at most one
    /// remote request.
    pub async fn fetch(&self, animal_id: &str, options: &FetchOptions) -> ImageResult {
        let id = normalize_id(animal_id);
        let key = cache_key(&id, options);

        if let Some(hit) = self.lookup(&key) {
            return hit;
        }

        if !self.connectivity.is_online() {
            if self.config.offline_policy == OfflinePolicy::FallbackAndQueue {
                self.defer(&id, options);
            }
            debug!(animal = %id, "offline, serving fallback");
            return self.fallback(&id, options, "offline");
        }

        self.remote(&id, &key, options).await
    }

    /// Shorthand for a single medium-size image.
    pub async fn fetch_image(&self, animal_id: &str) -> ImageDescriptor {
        match self.fetch(animal_id, &FetchOptions::default()).await {
            ImageResult::Single(d) => d,
            gallery => gallery.primary().clone(),
        }
    }

    /// Up to five photos of `animal_id`, or a single fallback.
    pub async fn gallery(&self, animal_id: &str, options: &FetchOptions) -> Vec<ImageDescriptor> {
        self.fetch(animal_id, &options.multiple(true)).await.into_vec()
    }

    /// Fetch every id concurrently and wait for all of them.
    ///
    /// Results are returned in input order. Each id independently succeeds
    /// or falls back.
    pub async fn preload<I, S>(&self, animal_ids: I) -> Vec<ImageResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<S> = animal_ids.into_iter().collect();
        let options = FetchOptions::default();
        let results = join_all(ids.iter().map(|id| self.fetch(id.as_ref(), &options))).await;
        let fallbacks = results.iter().filter(|r| r.is_fallback()).count();
        info!(count = results.len(), fallbacks, "image preload completed");
        results
    }

    /// Free-text gallery search. Unlike [`fetch`](Self::fetch), failures are
    /// returned to the caller, including an empty result set.
    pub async fn search(&self, query: &str, options: &FetchOptions) -> Result<Vec<ImageDescriptor>> {
        let options = options.multiple(true);
        let key = search_key(query, &options);
        let query = query.trim().to_string();
        self.searches
            .get_or_search(key, async move {
                if !self.connectivity.is_online() {
                    return Err(SoundboardError::Offline);
                }
                self.rate_limiter.acquire().await;
                let started = Instant::now();
                let request = SearchRequest::new(query.clone())
                    .per_page(options.per_page())
                    .orientation(options.orientation);
                let outcome = self.request(&request, &query, &options).await;
                self.record_outcome(&outcome, started, &query);
                outcome.map(ImageResult::into_vec)
            })
            .await
    }

    /// Empty the lookup cache. Counters and rate-limit state are kept.
    pub fn clear(&self) {
        lock(&self.entries).clear();
        self.searches.invalidate_all();
        info!("image cache cleared");
    }

    /// Clear the cache and drop any deferred lookups.
    pub fn shutdown(&self) {
        self.clear();
        lock(&self.deferred).clear();
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        let counters = *lock(&self.metrics);
        MetricsSnapshot {
            cache_hit_rate: counters.cache_hit_rate(),
            counters,
            is_online: self.connectivity.is_online(),
            cache_size: lock(&self.entries).len(),
            queued_requests: lock(&self.deferred).len(),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        let entries = lock(&self.entries);
        CacheStats {
            size: entries.len(),
            keys: entries.keys().cloned().collect(),
        }
    }

    /// Number of lookups waiting for connectivity.
    pub fn queued(&self) -> usize {
        lock(&self.deferred).len()
    }

    /// Connectivity-change hook.
    ///
    /// On a transition to online, replays deferred lookups strictly in the
    /// order they were submitted, one at a time, each through the normal
    /// rate-limited path. Returns how many were replayed. A second call while
    /// a drain is running returns 0 immediately.
    ///
    /// Replays are not caller lookups and leave the hit/miss counters alone.
    /// A lookup leaves the queue only once its replay completed, so a
    /// cancelled drain resumes with it on the next reconnect.
    pub async fn connectivity_changed(&self, online: bool) -> usize {
        if !online {
            info!("network connection lost");
            return 0;
        }
        info!("network connection restored");

        if self.draining.swap(true, Ordering::AcqRel) {
            return 0;
        }
        let _guard = DrainGuard(&self.draining);

        let mut replayed = 0;
        while self.connectivity.is_online() {
            let next = lock(&self.deferred).front().cloned();
            let Some(lookup) = next else { break };

            let key = cache_key(&lookup.animal_id, &lookup.options);
            self.remote(&lookup.animal_id, &key, &lookup.options).await;

            let mut deferred = lock(&self.deferred);
            if deferred.front() == Some(&lookup) {
                deferred.pop_front();
            }
            drop(deferred);

            metrics::counter!(telemetry::QUEUE_REPLAYS_TOTAL).increment(1);
            replayed += 1;
        }

        if replayed > 0 {
            info!(replayed, "deferred image requests processed");
        }
        replayed
    }

    /// Forward connectivity updates from a watch channel to
    /// [`connectivity_changed`](Self::connectivity_changed).
    ///
    /// The task ends when the sender is dropped.
    pub fn watch_connectivity(self: &Arc<Self>, mut rx: watch::Receiver<bool>) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                cache.connectivity_changed(online).await;
            }
        })
    }

    // ------------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------------

    /// Cache lookup that counts one hit or one miss.
    fn lookup(&self, key: &str) -> Option<ImageResult> {
        let hit = lock(&self.entries).get(&key.to_string()).cloned();
        let mut metrics = lock(&self.metrics);
        if hit.is_some() {
            metrics.cache_hits += 1;
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(key, "image cache hit");
        } else {
            metrics.cache_misses += 1;
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        }
        hit
    }

    /// Remote resolution for a miss, shared with concurrent callers of the
    /// same key when coalescing is on.
    async fn remote(&self, id: &str, key: &str, options: &FetchOptions) -> ImageResult {
        if !self.config.coalesce_in_flight {
            return self.resolve_remote(id, key, options).await;
        }

        let cell = self.join_in_flight(key);
        let result = cell
            .get_or_init(|| self.resolve_remote(id, key, options))
            .await
            .clone();
        self.leave_in_flight(key, &cell);
        result
    }

    /// Cache lookup without touching counters.
    fn peek(&self, key: &str) -> Option<ImageResult> {
        lock(&self.entries).get(&key.to_string()).cloned()
    }

    fn insert(&self, key: &str, value: ImageResult) {
        if let Some((evicted, _)) = lock(&self.entries).insert(key.to_string(), value) {
            debug!(evicted = %evicted, "evicted oldest image cache entry");
        }
    }

    fn defer(&self, animal_id: &str, options: &FetchOptions) {
        let lookup = DeferredLookup {
            animal_id: animal_id.to_string(),
            options: *options,
        };
        let mut deferred = lock(&self.deferred);
        if !deferred.contains(&lookup) {
            debug!(animal = %animal_id, "queued image request for reconnect");
            deferred.push_back(lookup);
        }
    }

    fn join_in_flight(&self, key: &str) -> InFlight {
        let mut in_flight = lock(&self.in_flight);
        Arc::clone(in_flight.entry(key.to_string()).or_default())
    }

    fn leave_in_flight(&self, key: &str, cell: &InFlight) {
        let mut in_flight = lock(&self.in_flight);
        if in_flight.get(key).is_some_and(|c| Arc::ptr_eq(c, cell)) {
            in_flight.remove(key);
        }
    }

    fn fallback(&self, animal_id: &str, options: &FetchOptions, reason: &'static str) -> ImageResult {
        metrics::counter!(telemetry::FALLBACKS_TOTAL, "reason" => reason).increment(1);
        let descriptor = fallback_for(animal_id);
        if options.multiple {
            ImageResult::Gallery(vec![descriptor])
        } else {
            ImageResult::Single(descriptor)
        }
    }

    /// Rate-limited remote lookup with fallback. Inserts successes.
    async fn resolve_remote(&self, id: &str, key: &str, options: &FetchOptions) -> ImageResult {
        // a previous in-flight owner may have finished between our miss and now
        if let Some(existing) = self.peek(key) {
            return existing;
        }

        self.rate_limiter.acquire().await;
        let started = Instant::now();
        let request = SearchRequest::new(search_query(id))
            .per_page(options.per_page())
            .orientation(options.orientation);

        let outcome = self.request(&request, id, options).await;
        self.record_outcome(&outcome, started, id);

        match outcome {
            Ok(result) => {
                self.insert(key, result.clone());
                result
            }
            Err(e) => self.fallback(id, options, e.kind()),
        }
    }

    /// One provider call bounded by the request timeout.
    async fn request(
        &self,
        request: &SearchRequest,
        label: &str,
        options: &FetchOptions,
    ) -> Result<ImageResult> {
        let timeout = self.config.request_timeout;
        let response = tokio::time::timeout(timeout, self.provider.search(request))
            .await
            .map_err(|_| SoundboardError::Timeout(timeout))??;

        let mut photos: Vec<ImageDescriptor> = response
            .photos
            .iter()
            .filter(|p| p.has_image())
            .take(options.per_page() as usize)
            .map(|p| p.to_descriptor(options.size, label))
            .collect();

        if photos.is_empty() {
            return Err(SoundboardError::EmptyResponse {
                query: request.query.clone(),
            });
        }

        Ok(if options.multiple {
            ImageResult::Gallery(photos)
        } else {
            ImageResult::Single(photos.swap_remove(0))
        })
    }

    fn record_outcome(&self, outcome: &Result<ImageResult>, started: Instant, label: &str) {
        match outcome {
            Ok(_) => {
                let elapsed = started.elapsed();
                lock(&self.metrics).record_success(elapsed.as_secs_f64() * 1000.0);
                metrics::counter!(telemetry::REMOTE_REQUESTS_TOTAL, "status" => "ok").increment(1);
                metrics::histogram!(telemetry::REMOTE_REQUEST_DURATION_SECONDS)
                    .record(elapsed.as_secs_f64());
                debug!(
                    subject = %label,
                    provider = self.provider.name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "fetched image"
                );
            }
            Err(e) => {
                lock(&self.metrics).errors += 1;
                metrics::counter!(telemetry::REMOTE_REQUESTS_TOTAL, "status" => "error")
                    .increment(1);
                warn!(subject = %label, provider = self.provider.name(), error = %e, "image lookup failed");
            }
        }
    }
}

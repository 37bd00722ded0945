//! Telemetry metric name constants.
//!
//! Centralised metric names for soundboard operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! These are emitted alongside the in-process counters exposed by
//! [`ImageFetchCache::metrics_snapshot()`](crate::ImageFetchCache::metrics_snapshot),
//! which stay available without any recorder.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `soundboard_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status`: outcome, "ok" or "error"
//! - `reason`: why a fallback was served (see [`SoundboardError::kind`](crate::SoundboardError::kind))

/// Total image cache hits.
pub const CACHE_HITS_TOTAL: &str = "soundboard_image_cache_hits_total";

/// Total image cache misses.
pub const CACHE_MISSES_TOTAL: &str = "soundboard_image_cache_misses_total";

/// Total remote search requests dispatched.
///
/// Labels: `status` ("ok" | "error").
pub const REMOTE_REQUESTS_TOTAL: &str = "soundboard_remote_requests_total";

/// Remote search request duration in seconds (successful requests only).
pub const REMOTE_REQUEST_DURATION_SECONDS: &str = "soundboard_remote_request_duration_seconds";

/// Total fallback descriptors served.
///
/// Labels: `reason`.
pub const FALLBACKS_TOTAL: &str = "soundboard_fallbacks_total";

/// Total times a caller was delayed by the rate limiter.
pub const RATE_LIMIT_WAITS_TOTAL: &str = "soundboard_rate_limit_waits_total";

/// Total deferred lookups replayed after connectivity returned.
pub const QUEUE_REPLAYS_TOTAL: &str = "soundboard_queue_replays_total";

//! Minimum-interval rate limiter for remote requests.
//!
//! One timestamp shared by every caller: a request may not start sooner than
//! `min_interval` after the previous one started. The lock is held across the
//! wait, so concurrent callers queue up and are released one interval apart.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for the next slot and claim it.
    ///
    /// Returns how long the caller was delayed.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_start.lock().await;
        let mut waited = Duration::ZERO;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                waited = ready_at - now;
                debug!(wait_ms = waited.as_millis() as u64, "rate limiting remote request");
                metrics::counter!(telemetry::RATE_LIMIT_WAITS_TOTAL).increment(1);
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
        waited
    }

    /// When the last request started, if any.
    pub async fn last_start(&self) -> Option<Instant> {
        *self.last_start.lock().await
    }
}

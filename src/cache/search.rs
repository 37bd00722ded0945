//! TTL cache for free-text searches.
//!
//! Backed by moka's async cache. Concurrent identical searches are coalesced:
//! `try_get_with` runs one initialiser and every waiter receives its result.
//! Failed searches are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::types::{FetchOptions, ImageDescriptor};
use crate::{Result, SoundboardError};

pub(crate) struct SearchCache {
    cache: Cache<String, Arc<Vec<ImageDescriptor>>>,
}

impl SearchCache {
    pub(crate) fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Return the cached result for `key`, or run `init` once and cache it.
    pub(crate) async fn get_or_search<F>(&self, key: String, init: F) -> Result<Vec<ImageDescriptor>>
    where
        F: Future<Output = Result<Vec<ImageDescriptor>>>,
    {
        let found = self
            .cache
            .try_get_with(key, async move { init.await.map(Arc::new) })
            .await
            .map_err(unshare)?;
        Ok(found.as_ref().clone())
    }

    #[cfg(test)]
    pub(crate) async fn contains(&self, key: &str) -> bool {
        self.cache.get(key).await.is_some()
    }

    pub(crate) fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

/// Cache key for a free-text search.
pub(crate) fn search_key(query: &str, options: &FetchOptions) -> String {
    format!(
        "{}|{}|{}|{}",
        query.trim().to_lowercase(),
        options.size,
        options.per_page(),
        options.orientation.as_str()
    )
}

/// Recover an owned error from moka's shared error.
fn unshare(err: Arc<SoundboardError>) -> SoundboardError {
    match Arc::try_unwrap(err) {
        Ok(owned) => owned,
        Err(shared) => match shared.as_ref() {
            SoundboardError::Api { status, message } => SoundboardError::Api {
                status: *status,
                message: message.clone(),
            },
            SoundboardError::Timeout(after) => SoundboardError::Timeout(*after),
            SoundboardError::EmptyResponse { query } => SoundboardError::EmptyResponse {
                query: query.clone(),
            },
            SoundboardError::Offline => SoundboardError::Offline,
            other => SoundboardError::Http(other.to_string()),
        },
    }
}

//! Pexels-style photo search client.
//!
//! `GET {base_url}/search?query=..&per_page=..&orientation=..` with the API
//! key in the `Authorization` header.
//! See: <https://www.pexels.com/api/documentation/#photos-search>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::{ImageSearchProvider, SearchRequest, SearchResponse};
use crate::{Result, SoundboardError};

/// Default base URL for the Pexels API
pub const DEFAULT_BASE_URL: &str = "https://api.pexels.com/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Pexels photo search endpoint.
#[derive(Clone)]
pub struct PexelsClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl PexelsClient {
    /// Create a client against the public API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(Some(api_key.into()), DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    ///
    /// Without an API key every search fails with a configuration error
    /// and no request is sent.
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SoundboardError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ImageSearchProvider for PexelsClient {
    fn name(&self) -> &str {
        "pexels"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SoundboardError::Configuration("image search API key is not configured".into())
        })?;

        let url = format!("{}/search", self.base_url);
        let per_page = request.per_page.to_string();
        debug!(query = %request.query, per_page = request.per_page, "searching images");

        let response = self
            .http
            .get(&url)
            .header("Authorization", api_key)
            .header("Accept", "application/json")
            .query(&[
                ("query", request.query.as_str()),
                ("per_page", per_page.as_str()),
                ("orientation", request.orientation.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SoundboardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

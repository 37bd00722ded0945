//! Wiremock integration tests for the photo search client.
//!
//! Covers the HTTP contract of `PexelsClient` and the full
//! `ImageFetchCache::fetch()` path through it: request shape, parsing,
//! error statuses, malformed bodies and timeouts.

use std::sync::Arc;
use std::time::Duration;

use soundboard::{
    CacheConfig, FetchOptions, ImageFetchCache, ImageResult, ImageSearchProvider, Orientation,
    PexelsClient, SearchRequest, SizeVariant, SoundboardError, StaticConnectivity,
};

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sample search response with two photos.
fn sample_search_json() -> serde_json::Value {
    serde_json::json!({
        "total_results": 2,
        "page": 1,
        "per_page": 2,
        "photos": [
            {
                "id": 2295744,
                "width": 4000,
                "height": 6000,
                "url": "https://www.pexels.com/photo/lion-2295744/",
                "photographer": "Francesco Ungaro",
                "photographer_url": "https://www.pexels.com/@francesco-ungaro",
                "avg_color": "#8A7558",
                "alt": "Lion resting on the grass",
                "src": {
                    "original": "https://images.test/2295744/original.jpeg",
                    "large": "https://images.test/2295744/large.jpeg",
                    "medium": "https://images.test/2295744/medium.jpeg",
                    "small": "https://images.test/2295744/small.jpeg",
                    "landscape": "https://images.test/2295744/landscape.jpeg"
                }
            },
            {
                "id": 3,
                "photographer": "Second",
                "src": { "medium": "https://images.test/3/medium.jpeg" }
            }
        ]
    })
}

fn client_for(server: &MockServer) -> PexelsClient {
    PexelsClient::with_base_url(Some("test-key".into()), format!("{}/v1", server.uri()))
        .expect("client should build")
}

/// Cache over a wiremock-backed client, without rate-limit spacing.
fn cache_for(server: &MockServer, config: CacheConfig) -> ImageFetchCache {
    let client = PexelsClient::with_timeout(
        Some("test-key".into()),
        format!("{}/v1", server.uri()),
        config.request_timeout,
    )
    .expect("client should build");
    ImageFetchCache::new(
        Arc::new(client),
        Arc::new(StaticConnectivity(true)),
        config,
    )
}

fn fast_config() -> CacheConfig {
    CacheConfig::new().min_interval(Duration::ZERO)
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn search_sends_query_and_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("query", "wild lion african safari wildlife"))
        .and(query_param("per_page", "5"))
        .and(query_param("orientation", "landscape"))
        .and(header("Authorization", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_search_json()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .search(
            &SearchRequest::new("wild lion african safari wildlife")
                .per_page(5)
                .orientation(Orientation::Landscape),
        )
        .await
        .expect("search should succeed");

    assert_eq!(response.photos.len(), 2);
    let first = &response.photos[0];
    assert_eq!(first.id, 2295744);
    assert_eq!(first.photographer, "Francesco Ungaro");
    assert_eq!(first.avg_color.as_deref(), Some("#8A7558"));
    assert_eq!(first.width, Some(4000));
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&SearchRequest::new("lion"))
        .await
        .unwrap_err();

    match err {
        SoundboardError::Api { status, message } => {
            assert_eq!(status, 429);
            assert!(message.contains("Rate limit"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&SearchRequest::new("lion"))
        .await
        .unwrap_err();
    assert!(matches!(err, SoundboardError::Json(_)));
}

#[tokio::test]
async fn missing_key_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_search_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = PexelsClient::with_base_url(None, format!("{}/v1", server.uri())).unwrap();
    let err = client.search(&SearchRequest::new("lion")).await.unwrap_err();
    assert!(matches!(err, SoundboardError::Configuration(_)));
}

// ============================================================================
// Through the cache
// ============================================================================

#[tokio::test]
async fn cache_resolves_live_photo_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_search_json()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server, fast_config());
    let options = FetchOptions::new().size(SizeVariant::Large);

    let first = cache.fetch("lion", &options).await;
    let second = cache.fetch("lion", &options).await;

    let ImageResult::Single(image) = first.clone() else {
        panic!("expected single image, got {first:?}");
    };
    assert!(!image.is_fallback);
    assert_eq!(image.url, "https://images.test/2295744/large.jpeg");
    assert_eq!(image.title, "Beautiful Lion");
    assert_eq!(image.alt_text, "Lion resting on the grass");
    assert_eq!(
        image.source_url.as_deref(),
        Some("https://www.pexels.com/photo/lion-2295744/")
    );
    assert_eq!(first, second);

    let m = cache.metrics_snapshot();
    assert_eq!(m.counters.remote_calls, 1);
    assert_eq!(m.counters.cache_hits, 1);
    assert!(m.counters.average_response_time_ms >= 0.0);
}

#[tokio::test]
async fn cache_gallery_takes_every_usable_photo() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_search_json()))
        .mount(&server)
        .await;

    let cache = cache_for(&server, fast_config());
    let gallery = cache.gallery("lion", &FetchOptions::default()).await;

    assert_eq!(gallery.len(), 2);
    assert_eq!(gallery[1].url, "https://images.test/3/medium.jpeg");
    assert_eq!(gallery[1].alt_text, "Stunning lion photograph by Second");
}

#[tokio::test]
async fn cache_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cache = cache_for(&server, fast_config());
    let result = cache.fetch("elephant", &FetchOptions::default()).await;

    assert!(result.is_fallback());
    assert_eq!(result.primary().title, "Elephant - Gentle Giant");
    assert_eq!(cache.metrics_snapshot().counters.errors, 1);
    assert_eq!(cache.cache_stats().size, 0);
}

#[tokio::test]
async fn cache_falls_back_on_empty_photos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "photos": [] })))
        .mount(&server)
        .await;

    let cache = cache_for(&server, fast_config());
    assert!(cache.fetch("frog", &FetchOptions::default()).await.is_fallback());
}

#[tokio::test]
async fn cache_falls_back_on_malformed_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"photos\": ["))
        .mount(&server)
        .await;

    let cache = cache_for(&server, fast_config());
    assert!(cache.fetch("dog", &FetchOptions::default()).await.is_fallback());
}

#[tokio::test]
async fn cache_falls_back_on_slow_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_search_json())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = fast_config().request_timeout(Duration::from_millis(200));
    let cache = cache_for(&server, config);

    let started = std::time::Instant::now();
    let result = cache.fetch("cat", &FetchOptions::default()).await;

    assert!(result.is_fallback());
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(cache.metrics_snapshot().counters.errors, 1);
}

#[tokio::test]
async fn free_text_search_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("query", "sleepy lions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_search_json()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server, fast_config());
    let first = cache
        .search("sleepy lions", &FetchOptions::default())
        .await
        .unwrap();
    let second = cache
        .search("Sleepy Lions ", &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

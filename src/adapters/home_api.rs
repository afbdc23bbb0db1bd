use crate::adapters::payload::{parse_pricing, parse_static};
use crate::domain::model::{VenuePricing, VenueStatic};
use crate::domain::ports::{ConfigProvider, LocationSource, PricingSource};
use crate::utils::error::{DopcError, FetchError, Result, VenueFeed};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://consumer-api.development.dev.woltapi.com";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(8);

/// Upper bound on how much of an error body ends up in a `FetchError`.
const ERROR_BODY_LIMIT: usize = 1024;

/// Client for the venue home-assignment API. Serves both lookup ports.
#[derive(Debug, Clone)]
pub struct HomeApiClient {
    base_url: Url,
    client: Client,
}

impl HomeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| DopcError::ConfigValidationError {
            field: "api_base_url".to_string(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DopcError::ConfigValidationError {
                field: "api_base_url".to_string(),
                message: format!("{} cannot be used as a base URL", base_url),
            });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &dyn ConfigProvider) -> Result<Self> {
        Self::new(config.api_base_url(), config.upstream_timeout())
    }

    /// `{base}/home-assignment-api/v1/venues/{slug}/{feed}` with the slug escaped.
    pub fn venue_url(
        &self,
        venue_slug: &str,
        feed: VenueFeed,
    ) -> std::result::Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["home-assignment-api", "v1", "venues", venue_slug, &feed.to_string()]);
        Ok(url)
    }

    async fn get_json(
        &self,
        venue_slug: &str,
        feed: VenueFeed,
    ) -> std::result::Result<serde_json::Value, FetchError> {
        let url = self.venue_url(venue_slug, feed)?;
        tracing::debug!("Making {} request to: {}", feed, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http { feed, source })?;

        let status = response.status();
        tracing::debug!("{} response status: {}", feed, status);

        if !status.is_success() {
            let body = read_error_body(response, feed).await;
            return Err(FetchError::Status {
                feed,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|source| FetchError::Http { feed, source })
    }

    async fn get_json_or_cancel(
        &self,
        venue_slug: &str,
        feed: VenueFeed,
        cancel: &CancellationToken,
    ) -> std::result::Result<serde_json::Value, FetchError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled { feed }),
            payload = self.get_json(venue_slug, feed) => payload,
        }
    }
}

/// Reads at most `ERROR_BODY_LIMIT` bytes of an error body; the rest is never pulled.
async fn read_error_body(mut response: Response, feed: VenueFeed) -> String {
    let mut bytes = Vec::with_capacity(ERROR_BODY_LIMIT);
    while bytes.len() < ERROR_BODY_LIMIT {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(ERROR_BODY_LIMIT - bytes.len());
                bytes.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(%feed, error = %e, "failed to read upstream error body");
                break;
            }
        }
    }

    let mut body = String::from_utf8_lossy(&bytes).into_owned();
    if body.len() > ERROR_BODY_LIMIT {
        let mut cut = ERROR_BODY_LIMIT;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl LocationSource for HomeApiClient {
    async fn fetch_static(
        &self,
        venue_slug: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<VenueStatic, FetchError> {
        let payload = self
            .get_json_or_cancel(venue_slug, VenueFeed::Static, cancel)
            .await?;
        parse_static(&payload)
    }
}

#[async_trait]
impl PricingSource for HomeApiClient {
    async fn fetch_pricing(
        &self,
        venue_slug: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<VenuePricing, FetchError> {
        let payload = self
            .get_json_or_cancel(venue_slug, VenueFeed::Dynamic, cancel)
            .await?;
        parse_pricing(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base_url: &str) -> HomeApiClient {
        HomeApiClient::new(base_url, DEFAULT_UPSTREAM_TIMEOUT).unwrap()
    }

    #[test]
    fn test_venue_url_escapes_slug() {
        let api = client("https://api.example.com");
        let url = api.venue_url("venue one/two", VenueFeed::Static).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/home-assignment-api/v1/venues/venue%20one%2Ftwo/static"
        );

        let with_prefix = client("https://api.example.com/proxy/");
        let url = with_prefix.venue_url("v", VenueFeed::Dynamic).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/proxy/home-assignment-api/v1/venues/v/dynamic"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(HomeApiClient::new("not a url", DEFAULT_UPSTREAM_TIMEOUT).is_err());
    }

    #[tokio::test]
    async fn test_fetch_static_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/home-assignment-venue-helsinki/static");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "venue_raw": {
                        "location": {"coordinates": [24.92813512, 60.17012143]},
                        "delivery_specs": {"order_minimum_no_surcharge": 1000}
                    }
                }));
        });

        let api = client(&server.base_url());
        let venue = api
            .fetch_static("home-assignment-venue-helsinki", &CancellationToken::new())
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(venue.order_minimum_no_surcharge, 1000);
        assert_eq!(venue.location.lat(), 60.17012143);
    }

    #[tokio::test]
    async fn test_fetch_pricing_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/venue/dynamic");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "venue_raw": {
                        "delivery_specs": {
                            "delivery_pricing": {
                                "base_price": 190,
                                "distance_ranges": [
                                    {"min": 0, "max": 500, "a": 0, "b": 0},
                                    {"min": 500, "max": 0, "a": 0, "b": 0}
                                ]
                            }
                        }
                    }
                }));
        });

        let api = client(&server.base_url());
        let pricing = api
            .fetch_pricing("venue", &CancellationToken::new())
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(pricing.base_price, 190);
        assert_eq!(pricing.distance_ranges.len(), 2);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/missing/static");
            then.status(404).body("venue not found");
        });

        let api = client(&server.base_url());
        let err = api
            .fetch_static("missing", &CancellationToken::new())
            .await
            .unwrap_err();

        api_mock.assert();
        match err {
            FetchError::Status { feed, status, body } => {
                assert_eq!(feed, VenueFeed::Static);
                assert_eq!(status, 404);
                assert_eq!(body, "venue not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_body_is_truncated() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/venue/dynamic");
            then.status(500).body("x".repeat(4096));
        });

        let api = client(&server.base_url());
        let err = api
            .fetch_pricing("venue", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            FetchError::Status { body, .. } => assert_eq!(body.len(), ERROR_BODY_LIMIT),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_huge_error_body_is_not_buffered() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/venue/static");
            then.status(500).body("y".repeat(8 * 1024 * 1024));
        });

        let api = client(&server.base_url());
        let err = api
            .fetch_static("venue", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "y".repeat(ERROR_BODY_LIMIT));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_body_cut_on_char_boundary() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/venue/static");
            then.status(503).body("€".repeat(1000));
        });

        let api = client(&server.base_url());
        let err = api
            .fetch_static("venue", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            // 341 three-byte characters fit in the limit.
            FetchError::Status { body, .. } => assert_eq!(body, "€".repeat(341)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/venue/static");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("{not json");
        });

        let api = client(&server.base_url());
        let err = api
            .fetch_static("venue", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Http { feed: VenueFeed::Static, .. }));
    }

    #[tokio::test]
    async fn test_cancelled_request_returns_promptly() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/venue/static");
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({}));
        });

        let api = client(&server.base_url());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = api.fetch_static("venue", &cancel).await.unwrap_err();

        assert!(matches!(err, FetchError::Cancelled { feed: VenueFeed::Static }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_per_call_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/home-assignment-api/v1/venues/venue/dynamic");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({}));
        });

        let api = HomeApiClient::new(&server.base_url(), Duration::from_millis(100)).unwrap();
        let err = api
            .fetch_pricing("venue", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            FetchError::Http { source, .. } => assert!(source.is_timeout()),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

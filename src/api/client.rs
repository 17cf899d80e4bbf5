//! HTTP API Client
//!
//! Timeout-bounded, validating GET requests against the LOS backend.

use futures_util::future::{self, Either};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{DatasetInfo, FilterOptions, Validate};
use super::endpoint::Endpoint;
use super::transport::{RawResponse, Timer, Transport, TransportError};
use crate::error::FetchError;

/// Deadline applied to every request, independent of the transport's own
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Client for the dashboard API
pub struct ApiClient<T, C> {
    transport: T,
    timer: C,
    base_url: String,
    timeout: Duration,
}

impl<T: Transport, C: Timer> ApiClient<T, C> {
    /// Create a client with the default 30 second deadline
    pub fn new(transport: T, timer: C, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            timer,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue one deadline-bounded GET and check its status
    async fn send(&self, endpoint: Endpoint, query: &str) -> Result<RawResponse, FetchError> {
        let url = endpoint.url(&self.base_url, query);
        tracing::debug!("GET {}", url);

        let request = self.transport.get(&url);
        let deadline = self.timer.sleep(self.timeout);

        let response = match future::select(request, deadline).await {
            Either::Left((result, _)) => result.map_err(|e| match e {
                TransportError::Timeout => FetchError::RequestTimeout {
                    endpoint,
                    timeout_ms: self.timeout.as_millis() as u64,
                },
                other => FetchError::Network {
                    endpoint,
                    message: other.to_string(),
                },
            })?,
            Either::Right(_) => {
                tracing::warn!("{} timed out after {:?}", endpoint, self.timeout);
                return Err(FetchError::RequestTimeout {
                    endpoint,
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
        };

        if !response.is_success() {
            return Err(FetchError::ApiStatus {
                endpoint,
                status: response.status,
            });
        }

        Ok(response)
    }

    /// Fetch, status-check, decode and validate one endpoint
    pub async fn fetch<R>(&self, endpoint: Endpoint, query: &str) -> Result<R, FetchError>
    where
        R: DeserializeOwned + Validate,
    {
        let response = self.send(endpoint, query).await?;

        let payload: R =
            serde_json::from_str(&response.body).map_err(|e| FetchError::InvalidData {
                endpoint,
                reason: e.to_string(),
            })?;

        payload
            .validate()
            .map_err(|reason| FetchError::InvalidData { endpoint, reason })?;

        Ok(payload)
    }

    /// Reachability check: only the status is inspected, the body is ignored
    pub async fn check(&self, endpoint: Endpoint) -> Result<(), FetchError> {
        self.send(endpoint, "").await.map(|_| ())
    }

    /// Dataset metadata, used by the startup probe
    pub async fn dataset_info(&self) -> Result<DatasetInfo, FetchError> {
        self.fetch(Endpoint::DatasetInfo, "").await
    }

    /// Allowed filter values and LOS bounds
    pub async fn filter_options(&self) -> Result<FilterOptions, FetchError> {
        self.fetch(Endpoint::FilterOptions, "").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::Overview;
    use crate::test_support::{fixtures, MockTransport, PendingTransport, TestTimer};

    fn client(transport: MockTransport) -> ApiClient<MockTransport, TestTimer> {
        ApiClient::new(transport, TestTimer, "http://test/api")
    }

    #[tokio::test]
    async fn test_fetch_decodes_payload() {
        let transport = MockTransport::new().respond(Endpoint::Overview, 200, fixtures::OVERVIEW);
        let api = client(transport);

        let overview: Overview = api.fetch(Endpoint::Overview, "severity=3").await.unwrap();
        assert_eq!(overview.total_patients, 1200);
        assert_eq!(
            api.transport.requests(),
            vec!["http://test/api/data/overview?severity=3".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_maps_status() {
        let transport = MockTransport::new().respond(Endpoint::Overview, 503, "unavailable");
        let api = client(transport);

        let err = api.fetch::<Overview>(Endpoint::Overview, "").await.unwrap_err();
        assert_eq!(
            err,
            FetchError::ApiStatus {
                endpoint: Endpoint::Overview,
                status: 503
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_rejects_wrong_shape() {
        let transport =
            MockTransport::new().respond(Endpoint::Overview, 200, r#"{"total_patients": 5}"#);
        let api = client(transport);

        let err = api.fetch::<Overview>(Endpoint::Overview, "").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::InvalidData {
                endpoint: Endpoint::Overview,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_semantically_invalid() {
        let body = fixtures::OVERVIEW.replace("1200", "0");
        let transport = MockTransport::new().respond(Endpoint::Overview, 200, &body);
        let api = client(transport);

        let err = api.fetch::<Overview>(Endpoint::Overview, "").await.unwrap_err();
        match err {
            FetchError::InvalidData { reason, .. } => assert!(reason.contains("no patients")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_maps_transport_failure() {
        let api = client(MockTransport::new());

        let err = api.dataset_info().await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Network {
                endpoint: Endpoint::DatasetInfo,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_times_out_when_transport_never_resolves() {
        let api = ApiClient::new(PendingTransport, TestTimer, "http://test/api");
        let started = tokio::time::Instant::now();

        let err = api.fetch::<Overview>(Endpoint::Overview, "").await.unwrap_err();

        assert_eq!(
            err,
            FetchError::RequestTimeout {
                endpoint: Endpoint::Overview,
                timeout_ms: 30_000
            }
        );
        assert!(started.elapsed() >= Duration::from_millis(30_000));
    }

    #[tokio::test]
    async fn test_check_ignores_body() {
        let transport = MockTransport::new().respond(Endpoint::FilterOptions, 200, "{not json");
        let api = client(transport);
        assert!(api.check(Endpoint::FilterOptions).await.is_ok());

        let api = client(MockTransport::new().respond(Endpoint::FilterOptions, 404, ""));
        assert!(matches!(
            api.check(Endpoint::FilterOptions).await,
            Err(FetchError::ApiStatus { status: 404, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_completes_before_deadline() {
        let transport = MockTransport::new()
            .respond(Endpoint::Overview, 200, fixtures::OVERVIEW)
            .with_delay(Duration::from_millis(29_000));
        let api = client(transport);

        let overview: Overview = api.fetch(Endpoint::Overview, "").await.unwrap();
        assert_eq!(overview.median_los, 4.0);
    }
}

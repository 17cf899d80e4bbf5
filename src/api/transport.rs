//! Transport and Timer Seams
//!
//! The orchestrator only needs "GET this URL" and "wake me after a delay".
//! Native builds implement both with reqwest and tokio; the browser build
//! implements them with gloo-net and gloo-timers.

use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::time::Duration;
use thiserror::Error;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Server unavailable: {0}")]
    Unavailable(String),

    #[error("Transport timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),
}

/// Issues GET requests.
///
/// Futures are `!Send`: the dashboard runs on a single cooperative event loop.
#[async_trait(?Send)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}

/// Produces sleep futures used to bound request latency
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

#[cfg(feature = "native")]
pub use native::{ReqwestTransport, TokioTimer};

#[cfg(feature = "native")]
mod native {
    use super::*;
    use futures_util::FutureExt;
    use reqwest::Client;

    /// reqwest-backed transport
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        /// Create a transport whose own timeout backs up the orchestrator's
        pub fn new(timeout: Duration) -> Result<Self, TransportError> {
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| TransportError::Request(e.to_string()))?;
            Ok(Self { client })
        }

        pub fn with_client(client: Client) -> Self {
            Self { client }
        }
    }

    fn map_reqwest_error(e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Unavailable(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }

    #[async_trait(?Send)]
    impl Transport for ReqwestTransport {
        async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
            let response = self
                .client
                .get(url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(map_reqwest_error)?;

            Ok(RawResponse { status, body })
        }
    }

    /// tokio-backed timer
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TokioTimer;

    impl Timer for TokioTimer {
        fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
            tokio::time::sleep(duration).boxed_local()
        }
    }
}

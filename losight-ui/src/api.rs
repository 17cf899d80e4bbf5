//! Browser Transport
//!
//! gloo-net and gloo-timers implementations of the core's transport and
//! timer seams, plus API base URL discovery.

use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use gloo_net::http::Request;
use std::time::Duration;

use losight::api::{ApiClient, RawResponse, Timer, Transport, TransportError};

/// localStorage key holding an API base override
pub const API_URL_KEY: &str = "losight_api_url";

/// Fallback when the page origin is unavailable
pub const DEFAULT_API_BASE: &str = "http://localhost:5002/api";

pub type BrowserClient = ApiClient<GlooTransport, GlooTimer>;

/// Get the API base URL from local storage or the page origin
pub fn get_api_base() -> String {
    let Some(window) = web_sys::window() else {
        return DEFAULT_API_BASE.to_string();
    };

    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty());

    let url = match stored {
        Some(url) => url,
        None => match window.location().origin() {
            Ok(origin) => format!("{}/api", origin),
            Err(_) => DEFAULT_API_BASE.to_string(),
        },
    };
    url.trim_end_matches('/').to_string()
}

/// Client against the discovered API base with the default deadline
pub fn browser_client() -> BrowserClient {
    ApiClient::new(GlooTransport, GlooTimer, get_api_base())
}

// ============ Seams ============

/// fetch()-backed transport
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = Request::get(url).send().await.map_err(|e| match e {
            // fetch() rejects with a TypeError when the server is unreachable
            gloo_net::Error::JsError(js) => TransportError::Unavailable(js.message),
            other => TransportError::Request(other.to_string()),
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(RawResponse::new(status, body))
    }
}

/// setTimeout()-backed timer
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(duration).boxed_local()
    }
}

//! Dashboard error types
//!
//! Per-request failures ([`FetchError`]) and the dashboard-level taxonomy
//! ([`DashboardError`]) surfaced to the status surface.

use thiserror::Error;

use crate::api::Endpoint;

/// Errors from a single timeout-bounded API request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request did not settle within the orchestrator's deadline
    #[error("Request timeout: {endpoint} did not respond within {timeout_ms} ms")]
    RequestTimeout { endpoint: Endpoint, timeout_ms: u64 },

    /// The server answered with a non-success status
    #[error("API error: {endpoint} returned status {status}")]
    ApiStatus { endpoint: Endpoint, status: u16 },

    /// The body was not the JSON shape the endpoint promises
    #[error("Invalid data from {endpoint}: {reason}")]
    InvalidData { endpoint: Endpoint, reason: String },

    /// The transport failed before any response arrived
    #[error("Network error on {endpoint}: {message}")]
    Network { endpoint: Endpoint, message: String },
}

impl FetchError {
    /// Endpoint the failed request was addressed to
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::RequestTimeout { endpoint, .. }
            | FetchError::ApiStatus { endpoint, .. }
            | FetchError::InvalidData { endpoint, .. }
            | FetchError::Network { endpoint, .. } => *endpoint,
        }
    }
}

/// Errors surfaced by the dashboard controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// Startup probe against the API failed
    #[error("Cannot connect to server: {0}")]
    Connectivity(FetchError),

    /// Filter metadata could not be loaded
    #[error("Failed to load filter options: {0}")]
    OptionsLoad(FetchError),

    /// A tab's data could not be loaded
    #[error("{0}")]
    Fetch(#[from] FetchError),
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

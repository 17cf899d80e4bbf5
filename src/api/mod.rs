//! LOS Backend API
//!
//! Client side of the dashboard's JSON HTTP API (base path `/api`).
//!
//! # Endpoints
//!
//! ## Metadata
//! - `GET /dataset-info` - Dataset name and shape (startup probe)
//! - `GET /filters/options` - Allowed filter values and LOS bounds
//!
//! ## Aggregates (all accept the filter query parameters)
//! - `GET /data/overview`, `GET /data/los-distribution`
//! - `GET /data/severity`, `GET /data/severity-senior`
//! - `GET /data/demographics`
//! - `GET /data/payment`, `GET /data/admission`, `GET /data/disposition`
//! - `GET /data/top-drgs`
//! - `GET /data/outliers`

pub mod client;
pub mod dto;
pub mod endpoint;
pub mod transport;

pub use client::{ApiClient, DEFAULT_REQUEST_TIMEOUT};
pub use dto::*;
pub use endpoint::Endpoint;
pub use transport::{RawResponse, Timer, Transport, TransportError};

#[cfg(feature = "native")]
pub use transport::{ReqwestTransport, TokioTimer};

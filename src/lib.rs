//! # LOSight
//!
//! Hospital length-of-stay dashboard: the client-side orchestration that
//! turns filter selections into API requests, validates what comes back and
//! routes it to charts, plus the hand-drawn outlier scatter plot.
//!
//! ## Modules
//!
//! - [`api`]: endpoint catalogue, response types and the timed HTTP client
//! - [`filters`]: filter state, query strings and the select-box store
//! - [`dashboard`]: tabs, loading/error surfaces and the load orchestration
//! - [`render`]: chart series, the outlier scatter and drawing surfaces
//! - [`config`] / [`terminal`]: the native command-line host
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use losight::api::{ApiClient, ReqwestTransport, TokioTimer};
//! use losight::dashboard::{Dashboard, Tab};
//! use losight::terminal::{render_table, ReportSink, TerminalStatus};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new(Duration::from_secs(60))?;
//!     let client = ApiClient::new(transport, TokioTimer, "http://localhost:5002/api");
//!     let dashboard = Dashboard::new(client, TerminalStatus::default());
//!
//!     dashboard.connect().await?;
//!     dashboard.filters_mut().inputs_mut().severity = "4".to_string();
//!     dashboard.filters_mut().apply_from_inputs();
//!
//!     let sink = ReportSink::new();
//!     dashboard.activate_tab(Tab::Outliers, &sink).await?;
//!     for data in sink.take() {
//!         println!("{}", render_table(&data));
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod render;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod terminal;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, Endpoint, Timer, Transport};
pub use dashboard::{Dashboard, LoadOutcome, RenderSink, StatusSurface, Tab, TabData};
pub use error::{DashboardError, DashboardResult, FetchError};
pub use filters::{FilterController, FilterState, Selector};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

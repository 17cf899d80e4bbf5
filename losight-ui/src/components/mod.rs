//! UI Components
//!
//! Leptos components for the dashboard page.

pub mod filters;
pub mod status;
pub mod tabs;

pub use filters::FilterPanel;
pub use status::{ErrorPanel, LoadingOverlay};
pub use tabs::{TabBar, TabPanels};

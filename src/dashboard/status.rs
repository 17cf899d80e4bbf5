//! Status Surface
//!
//! Loading indicator and error reporting. Hosts implement [`StatusSurface`]
//! (DOM overlay + alert in the browser, stderr in the CLI); the dashboard
//! decides what to say and how loudly.

use serde::Serialize;

use super::tabs::Tab;
use crate::error::DashboardError;

/// Steps shown with detailed error panels
pub const REMEDIATION_STEPS: [&str; 3] = [
    "Make sure the server is running",
    "Check the console or logs for details",
    "Try refreshing the page",
];

/// How an error is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Modal alert; the user must acknowledge it
    Blocking,
    /// Dismissible panel above the existing content
    Inline,
}

/// A user-facing error message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub severity: ErrorSeverity,
    pub title: String,
    pub message: String,
    pub remediation: Vec<String>,
}

impl ErrorReport {
    /// Alert without remediation steps
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Blocking,
            title: "Error".to_string(),
            message: message.into(),
            remediation: Vec::new(),
        }
    }

    /// Panel with the standard remediation steps
    pub fn inline(message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Inline,
            title: "Error Loading Data".to_string(),
            message: message.into(),
            remediation: REMEDIATION_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Startup probe failed
    pub fn connectivity(error: &DashboardError) -> Self {
        let mut report =
            Self::inline("Cannot connect to server. Please check your connection and try again.");
        report.title = format!("Error Loading Data ({})", error);
        report
    }

    /// Filter metadata failed to load
    pub fn options_load() -> Self {
        Self::blocking("Failed to load filter options. Please refresh the page.")
    }

    /// A single tab's load failed; severity follows the tab's policy
    pub fn for_tab(tab: Tab, error: &DashboardError) -> Self {
        match tab.error_severity() {
            ErrorSeverity::Inline => {
                Self::inline(format!("Failed to load {} data: {}", tab.name(), error))
            }
            ErrorSeverity::Blocking => Self::blocking(format!("Failed to load {} data.", tab.name())),
        }
    }

    /// A multi-tab load (apply/reset) failed
    pub fn for_bulk_load(action: &str, error: &DashboardError) -> Self {
        Self::inline(format!("Failed to {}: {}. Please try again.", action, error))
    }
}

/// Where loading and error state is displayed
pub trait StatusSurface {
    /// Show the loading indicator, leaving existing content in place
    fn show_loading(&self, message: &str);

    /// Hide the loading indicator
    fn hide_loading(&self);

    /// Present an error
    fn report(&self, report: &ErrorReport);

    /// Hide the inline error panel if one is showing
    fn dismiss_error(&self);
}

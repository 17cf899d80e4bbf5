//! Tab Controller
//!
//! Which dashboard section is visible. Selecting a tab always re-fetches;
//! nothing is cached between activations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::status::ErrorSeverity;

/// Dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Severity,
    Demographics,
    Payment,
    Trends,
    Outliers,
}

impl Tab {
    /// Every tab in display (and error-precedence) order
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Severity,
        Tab::Demographics,
        Tab::Payment,
        Tab::Trends,
        Tab::Outliers,
    ];

    /// DOM id of the tab pane
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Severity => "severity",
            Tab::Demographics => "demographics",
            Tab::Payment => "payment",
            Tab::Trends => "trends",
            Tab::Outliers => "outliers",
        }
    }

    /// Tab button caption
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Severity => "Severity Analysis",
            Tab::Demographics => "Demographics",
            Tab::Payment => "Payment & Admission",
            Tab::Trends => "DRG Trends",
            Tab::Outliers => "Outliers",
        }
    }

    /// The overview is the primary view and gets the detailed error panel;
    /// the rest fail with a plain alert.
    pub fn error_severity(&self) -> ErrorSeverity {
        match self {
            Tab::Overview => ErrorSeverity::Inline,
            _ => ErrorSeverity::Blocking,
        }
    }

    pub(crate) fn slot(&self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Severity => 1,
            Tab::Demographics => 2,
            Tab::Payment => 3,
            Tab::Trends => 4,
            Tab::Outliers => 5,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown tab name
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown tab: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

/// Result of selecting a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: Tab,
    pub current: Tab,
}

/// Tracks the active tab
#[derive(Debug, Clone, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    /// Starts on the overview
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Deactivate the current tab and activate `tab`
    pub fn activate(&mut self, tab: Tab) -> Transition {
        let previous = std::mem::replace(&mut self.active, tab);
        Transition {
            previous,
            current: tab,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_overview() {
        let tabs = TabController::new();
        assert_eq!(tabs.active(), Tab::Overview);
    }

    #[test]
    fn test_activate_reports_transition() {
        let mut tabs = TabController::new();
        let transition = tabs.activate(Tab::Outliers);
        assert_eq!(transition.previous, Tab::Overview);
        assert_eq!(transition.current, Tab::Outliers);
        assert!(tabs.is_active(Tab::Outliers));
        assert!(!tabs.is_active(Tab::Overview));

        // Re-selecting the same tab is a valid transition
        let transition = tabs.activate(Tab::Outliers);
        assert_eq!(transition.previous, Tab::Outliers);
    }

    #[test]
    fn test_tab_names_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(tab.name().parse::<Tab>().unwrap(), tab);
        }
        assert_eq!("Trends".parse::<Tab>().unwrap(), Tab::Trends);
        assert!("billing".parse::<Tab>().is_err());
    }

    #[test]
    fn test_error_policy() {
        assert_eq!(Tab::Overview.error_severity(), ErrorSeverity::Inline);
        assert_eq!(Tab::Outliers.error_severity(), ErrorSeverity::Blocking);
        assert_eq!(Tab::Demographics.error_severity(), ErrorSeverity::Blocking);
    }
}

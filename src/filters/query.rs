//! Filter State and Query Builder
//!
//! The active filter selections and their canonical query-string form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel value meaning "no constraint"
pub const ALL: &str = "all";

/// One categorical selector (severity, payment, admission, drg)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Value(String),
}

impl Selector {
    /// Parse a UI value; empty text and `"all"` both mean no constraint
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            Selector::All
        } else {
            Selector::Value(value.to_string())
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Selector::All => None,
            Selector::Value(v) => Some(v),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Selector::parse(value)
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Selector::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str(ALL),
            Selector::Value(v) => f.write_str(v),
        }
    }
}

/// Active filter selections sent with every aggregate request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub severity: Selector,
    pub payment: Selector,
    pub admission: Selector,
    pub drg: Selector,
    pub los_min: Option<f64>,
    pub los_max: Option<f64>,
}

impl FilterState {
    /// `(key, value)` pairs that survive the truthiness rule, in wire order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let selectors = [
            ("severity", &self.severity),
            ("payment", &self.payment),
            ("admission", &self.admission),
            ("drg", &self.drg),
        ];
        let bounds = [("los_min", self.los_min), ("los_max", self.los_max)];

        let mut params: Vec<(&'static str, String)> = selectors
            .into_iter()
            .filter_map(|(key, selector)| selector.value().map(|v| (key, v.to_string())))
            .collect();

        // 0 and NaN are falsy, same as an unset bound
        params.extend(bounds.into_iter().filter_map(|(key, bound)| {
            bound
                .filter(|v| v.is_finite() && *v != 0.0)
                .map(|v| (key, format_bound(v)))
        }));

        params
    }

    /// Canonical query string, without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.params()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// True when no parameter would be sent
    pub fn is_unfiltered(&self) -> bool {
        self.params().is_empty()
    }
}

/// Print a LOS bound the way a number input shows it (`1`, `4.5`)
pub fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty_query() {
        let state = FilterState::default();
        assert_eq!(state.to_query_string(), "");
        assert!(state.is_unfiltered());
    }

    #[test]
    fn test_explicit_all_is_omitted() {
        let state = FilterState {
            severity: Selector::from("all"),
            payment: Selector::from("all"),
            admission: Selector::from(""),
            drg: Selector::All,
            los_min: None,
            los_max: None,
        };
        assert_eq!(state.to_query_string(), "");
    }

    #[test]
    fn test_single_selector() {
        let state = FilterState {
            severity: Selector::from("3"),
            payment: Selector::from("all"),
            ..Default::default()
        };
        assert_eq!(state.to_query_string(), "severity=3");
    }

    #[test]
    fn test_fixed_field_order() {
        let state = FilterState {
            los_max: Some(45.0),
            drg: Selector::from("194"),
            admission: Selector::from("Emergency"),
            los_min: Some(1.0),
            payment: Selector::from("Medicare"),
            severity: Selector::from("2"),
        };
        assert_eq!(
            state.to_query_string(),
            "severity=2&payment=Medicare&admission=Emergency&drg=194&los_min=1&los_max=45"
        );
    }

    #[test]
    fn test_values_are_encoded() {
        let state = FilterState {
            payment: Selector::from("Blue Cross/Blue Shield"),
            ..Default::default()
        };
        assert_eq!(
            state.to_query_string(),
            "payment=Blue%20Cross%2FBlue%20Shield"
        );
    }

    #[test]
    fn test_zero_and_nan_bounds_are_falsy() {
        let state = FilterState {
            los_min: Some(0.0),
            los_max: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(state.to_query_string(), "");

        let state = FilterState {
            los_min: Some(2.5),
            ..Default::default()
        };
        assert_eq!(state.to_query_string(), "los_min=2.5");
    }

    #[test]
    fn test_selector_serde_uses_sentinel() {
        let json = serde_json::to_string(&Selector::All).unwrap();
        assert_eq!(json, "\"all\"");
        let parsed: Selector = serde_json::from_str("\"Elective\"").unwrap();
        assert_eq!(parsed.value(), Some("Elective"));
    }
}

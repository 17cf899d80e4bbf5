//! Text Metrics
//!
//! Headline numbers shown next to the charts.

use serde::Serialize;

use crate::dashboard::TabData;

/// Integer with thousands separators, e.g. `2,841`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One decimal plus unit, e.g. `4.0 days`
pub fn format_days(value: f64) -> String {
    format!("{:.1} days", value)
}

/// A text value bound to a DOM element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub element: &'static str,
    pub label: &'static str,
    pub value: String,
}

impl Metric {
    fn new(element: &'static str, label: &'static str, value: String) -> Self {
        Self {
            element,
            label,
            value,
        }
    }
}

/// Text metrics a tab displays
pub fn metrics_for(data: &TabData) -> Vec<Metric> {
    match data {
        TabData::Overview { overview, .. } => vec![
            Metric::new(
                "overview-median",
                "Median LOS",
                format_days(overview.median_los),
            ),
            Metric::new("overview-mean", "Mean LOS", format_days(overview.mean_los)),
        ],
        TabData::Outliers(summary) => vec![
            Metric::new(
                "outlier-mild",
                "Mild outliers",
                format_count(summary.mild_outliers),
            ),
            Metric::new(
                "outlier-extreme",
                "Extreme outliers",
                format_count(summary.extreme_outliers),
            ),
            Metric::new(
                "outlier-upper",
                "Mild threshold",
                format_days(summary.upper_bound),
            ),
            Metric::new(
                "outlier-extreme-upper",
                "Extreme threshold",
                format_days(summary.extreme_upper),
            ),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(2841), "2,841");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(4.0), "4.0 days");
        assert_eq!(format_days(5.649), "5.6 days");
    }

    #[test]
    fn test_outlier_metrics() {
        let summary: crate::api::OutlierSummary =
            serde_json::from_str(crate::test_support::fixtures::OUTLIERS).unwrap();
        let metrics = metrics_for(&TabData::Outliers(summary));

        let values: Vec<&str> = metrics.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["1", "1", "10.0 days", "20.0 days"]);
        assert_eq!(metrics[3].element, "outlier-extreme-upper");
    }
}

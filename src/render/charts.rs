//! Chart Specifications
//!
//! Turns validated payloads into labeled series for the bar charts. Drawing
//! is delegated to Chart.js in the browser; [`ChartSpec::to_chartjs_config`]
//! produces the configuration object it expects. The CLI prints or exports
//! the same series.

use serde::Serialize;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::fmt;

use crate::api::{
    AdmissionBreakdown, Demographics, Disposition, Label, Overview, PaymentBreakdown,
    SeverityBreakdown, SeveritySeniorBreakdown, TopDrgs,
};
use crate::dashboard::{Tab, TabData};

/// Longest stay shown by the overview charts
pub const LOS_DISPLAY_CAP: f64 = 50.0;

/// Target number of histogram bins
const HISTOGRAM_BINS: f64 = 40.0;

const DAYS_AXIS: &str = "Length of Stay (days)";
const MEDIAN_SERIES: &str = "Median LOS (days)";

// ============ Canvases ============

/// Every chart canvas on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanvasId {
    LosHistogram,
    LosBoxplot,
    SeverityMedianChart,
    SeverityMeanChart,
    SeveritySeniorChart,
    AgeChart,
    GenderChart,
    PaymentChart,
    AdmissionChart,
    SnfChart,
    DrgChart,
    OutlierScatter,
}

impl CanvasId {
    /// DOM id of the `<canvas>` element
    pub fn dom_id(&self) -> &'static str {
        match self {
            CanvasId::LosHistogram => "los-histogram",
            CanvasId::LosBoxplot => "los-boxplot",
            CanvasId::SeverityMedianChart => "severity-median-chart",
            CanvasId::SeverityMeanChart => "severity-mean-chart",
            CanvasId::SeveritySeniorChart => "severity-senior-chart",
            CanvasId::AgeChart => "age-chart",
            CanvasId::GenderChart => "gender-chart",
            CanvasId::PaymentChart => "payment-chart",
            CanvasId::AdmissionChart => "admission-chart",
            CanvasId::SnfChart => "snf-chart",
            CanvasId::DrgChart => "drg-chart",
            CanvasId::OutlierScatter => "outlier-scatter",
        }
    }

    /// Canvases shown on `tab`'s panel, in page order
    pub fn for_tab(tab: Tab) -> &'static [CanvasId] {
        match tab {
            Tab::Overview => &[CanvasId::LosHistogram, CanvasId::LosBoxplot],
            Tab::Severity => &[
                CanvasId::SeverityMedianChart,
                CanvasId::SeverityMeanChart,
                CanvasId::SeveritySeniorChart,
            ],
            Tab::Demographics => &[CanvasId::AgeChart, CanvasId::GenderChart],
            Tab::Payment => &[
                CanvasId::PaymentChart,
                CanvasId::AdmissionChart,
                CanvasId::SnfChart,
            ],
            Tab::Trends => &[CanvasId::DrgChart],
            Tab::Outliers => &[CanvasId::OutlierScatter],
        }
    }
}

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

// ============ Specs ============

/// Bar direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One color for the whole series, or one per bar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Colors {
    Single(&'static str),
    PerBar(Vec<&'static str>),
}

/// One bar series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub background: Colors,
    pub border: Option<Colors>,
    pub border_width: u32,
}

impl Dataset {
    fn new(label: impl Into<String>, values: Vec<f64>, fill: &'static str, line: &'static str) -> Self {
        Self {
            label: label.into(),
            values,
            background: Colors::Single(fill),
            border: Some(Colors::Single(line)),
            border_width: 2,
        }
    }
}

/// Library-independent description of a bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub canvas: CanvasId,
    pub title: &'static str,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub orientation: Orientation,
    pub value_axis: &'static str,
    pub category_axis: Option<&'static str>,
    pub legend: bool,
}

impl ChartSpec {
    /// Chart.js `new Chart(ctx, config)` configuration
    pub fn to_chartjs_config(&self) -> Value {
        let datasets: Vec<Value> = self
            .datasets
            .iter()
            .map(|d| {
                let mut dataset = json!({
                    "label": d.label,
                    "data": d.values,
                    "backgroundColor": d.background,
                });
                if let Some(border) = &d.border {
                    dataset["borderColor"] = json!(border);
                    dataset["borderWidth"] = json!(d.border_width);
                }
                dataset
            })
            .collect();

        let (value_key, category_key) = match self.orientation {
            Orientation::Vertical => ("y", "x"),
            Orientation::Horizontal => ("x", "y"),
        };

        let mut scales = serde_json::Map::new();
        scales.insert(
            value_key.to_string(),
            json!({
                "beginAtZero": true,
                "title": { "display": true, "text": self.value_axis }
            }),
        );
        if let Some(title) = self.category_axis {
            scales.insert(
                category_key.to_string(),
                json!({ "title": { "display": true, "text": title } }),
            );
        }

        let mut options = json!({
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": { "legend": { "display": self.legend } },
            "scales": scales,
        });
        if self.orientation == Orientation::Horizontal {
            options["indexAxis"] = json!("y");
        }

        json!({
            "type": "bar",
            "data": { "labels": self.labels, "datasets": datasets },
            "options": options,
        })
    }
}

fn single_series(
    canvas: CanvasId,
    title: &'static str,
    labels: Vec<String>,
    dataset: Dataset,
    orientation: Orientation,
    value_axis: &'static str,
) -> ChartSpec {
    ChartSpec {
        canvas,
        title,
        labels,
        datasets: vec![dataset],
        orientation,
        value_axis,
        category_axis: None,
        legend: false,
    }
}

// ============ Overview ============

/// Patient counts per LOS bin, stays above the display cap dropped
pub fn los_histogram(los: &[f64]) -> ChartSpec {
    let max_los = los
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
        .min(LOS_DISPLAY_CAP);
    let bin_size = (max_los / HISTOGRAM_BINS).ceil().max(1.0);
    let bin_count = (max_los / bin_size).floor() as usize + 1;

    let labels = (0..bin_count)
        .map(|i| {
            let lo = i as f64 * bin_size;
            format!("{}-{}", lo, lo + bin_size)
        })
        .collect();

    let mut counts = vec![0.0; bin_count];
    for &value in los {
        if !(0.0..=max_los).contains(&value) {
            continue;
        }
        let bin = (value / bin_size).floor() as usize;
        if let Some(count) = counts.get_mut(bin) {
            *count += 1.0;
        }
    }

    let mut dataset = Dataset::new(
        "Number of Patients",
        counts,
        "rgba(102, 126, 234, 0.6)",
        "rgba(102, 126, 234, 1)",
    );
    dataset.border_width = 1;

    ChartSpec {
        canvas: CanvasId::LosHistogram,
        title: "LOS Distribution",
        labels,
        datasets: vec![dataset],
        orientation: Orientation::Vertical,
        value_axis: "Number of Patients",
        category_axis: Some(DAYS_AXIS),
        legend: false,
    }
}

/// Five-number summary as side-by-side bars
pub fn los_boxplot(overview: &Overview) -> ChartSpec {
    let bar = |label: &str, value: f64, fill: &'static str| Dataset {
        label: label.to_string(),
        values: vec![value],
        background: Colors::Single(fill),
        border: None,
        border_width: 0,
    };

    ChartSpec {
        canvas: CanvasId::LosBoxplot,
        title: "LOS Summary",
        labels: vec!["Length of Stay".to_string()],
        datasets: vec![
            bar("Min", overview.min_los, "rgba(200, 200, 200, 0.6)"),
            bar("Q1 (25th)", overview.q25, "rgba(102, 126, 234, 0.6)"),
            bar("Median", overview.median_los, "rgba(102, 126, 234, 0.9)"),
            bar("Q3 (75th)", overview.q75, "rgba(102, 126, 234, 0.6)"),
            bar(
                "Max",
                overview.max_los.min(LOS_DISPLAY_CAP),
                "rgba(200, 200, 200, 0.6)",
            ),
        ],
        orientation: Orientation::Vertical,
        value_axis: DAYS_AXIS,
        category_axis: None,
        legend: true,
    }
}

// ============ Severity ============

/// Which severity statistic to plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityStatistic {
    Median,
    Mean,
}

pub fn severity_chart(breakdown: &SeverityBreakdown, statistic: SeverityStatistic) -> ChartSpec {
    let labels = breakdown
        .data
        .iter()
        .map(|s| format!("Severity {}", s.severity))
        .collect();
    let values = breakdown
        .data
        .iter()
        .map(|s| match statistic {
            SeverityStatistic::Median => s.median_los,
            SeverityStatistic::Mean => s.mean_los,
        })
        .collect();
    let (canvas, title, series) = match statistic {
        SeverityStatistic::Median => (
            CanvasId::SeverityMedianChart,
            "Median LOS by Severity",
            "Median LOS (days)",
        ),
        SeverityStatistic::Mean => (
            CanvasId::SeverityMeanChart,
            "Mean LOS by Severity",
            "Mean LOS (days)",
        ),
    };

    single_series(
        canvas,
        title,
        labels,
        Dataset::new(series, values, "rgba(255, 99, 132, 0.6)", "rgba(255, 99, 132, 1)"),
        Orientation::Vertical,
        DAYS_AXIS,
    )
}

fn compare_labels(a: &Label, b: &Label) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_string().cmp(&b.to_string()),
    }
}

/// Median LOS per severity, senior vs non-senior side by side.
///
/// Severities sort numerically; a missing cell plots as 0.
pub fn severity_senior_chart(breakdown: &SeveritySeniorBreakdown) -> ChartSpec {
    struct Group<'a> {
        severity: &'a Label,
        senior: Option<f64>,
        non_senior: Option<f64>,
    }

    let mut groups: Vec<Group<'_>> = Vec::new();
    for stat in &breakdown.data {
        let index = match groups.iter().position(|g| *g.severity == stat.severity) {
            Some(index) => index,
            None => {
                groups.push(Group {
                    severity: &stat.severity,
                    senior: None,
                    non_senior: None,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        if stat.is_senior {
            group.senior = Some(stat.median_los);
        } else {
            group.non_senior = Some(stat.median_los);
        }
    }
    groups.sort_by(|a, b| compare_labels(a.severity, b.severity));

    let labels = groups
        .iter()
        .map(|g| format!("Severity {}", g.severity))
        .collect();
    let non_senior = groups.iter().map(|g| g.non_senior.unwrap_or(0.0)).collect();
    let senior = groups.iter().map(|g| g.senior.unwrap_or(0.0)).collect();

    ChartSpec {
        canvas: CanvasId::SeveritySeniorChart,
        title: "Severity × Senior Status",
        labels,
        datasets: vec![
            Dataset::new(
                "Non-Senior (<70)",
                non_senior,
                "rgba(54, 162, 235, 0.6)",
                "rgba(54, 162, 235, 1)",
            ),
            Dataset::new(
                "Senior (70+)",
                senior,
                "rgba(255, 99, 132, 0.6)",
                "rgba(255, 99, 132, 1)",
            ),
        ],
        orientation: Orientation::Vertical,
        value_axis: "Median LOS (days)",
        category_axis: None,
        legend: true,
    }
}

// ============ Demographics ============

pub fn age_chart(demographics: &Demographics) -> ChartSpec {
    single_series(
        CanvasId::AgeChart,
        "Median LOS by Age Group",
        demographics.age.iter().map(|a| a.age_group.to_string()).collect(),
        Dataset::new(
            MEDIAN_SERIES,
            demographics.age.iter().map(|a| a.median_los).collect(),
            "rgba(54, 162, 235, 0.6)",
            "rgba(54, 162, 235, 1)",
        ),
        Orientation::Vertical,
        DAYS_AXIS,
    )
}

pub fn gender_chart(demographics: &Demographics) -> ChartSpec {
    single_series(
        CanvasId::GenderChart,
        "Median LOS by Gender",
        demographics.gender.iter().map(|g| g.gender.to_string()).collect(),
        Dataset::new(
            MEDIAN_SERIES,
            demographics.gender.iter().map(|g| g.median_los).collect(),
            "rgba(153, 102, 255, 0.6)",
            "rgba(153, 102, 255, 1)",
        ),
        Orientation::Vertical,
        DAYS_AXIS,
    )
}

// ============ Payment & Admission ============

pub fn payment_chart(payment: &PaymentBreakdown) -> ChartSpec {
    single_series(
        CanvasId::PaymentChart,
        "Median LOS by Payment Type",
        payment.data.iter().map(|p| p.payment_type.to_string()).collect(),
        Dataset::new(
            MEDIAN_SERIES,
            payment.data.iter().map(|p| p.median_los).collect(),
            "rgba(255, 206, 86, 0.6)",
            "rgba(255, 206, 86, 1)",
        ),
        Orientation::Horizontal,
        DAYS_AXIS,
    )
}

pub fn admission_chart(admission: &AdmissionBreakdown) -> ChartSpec {
    single_series(
        CanvasId::AdmissionChart,
        "Median LOS by Admission Type",
        admission
            .data
            .iter()
            .map(|a| a.admission_type.to_string())
            .collect(),
        Dataset::new(
            MEDIAN_SERIES,
            admission.data.iter().map(|a| a.median_los).collect(),
            "rgba(75, 192, 192, 0.6)",
            "rgba(75, 192, 192, 1)",
        ),
        Orientation::Horizontal,
        DAYS_AXIS,
    )
}

pub fn snf_chart(disposition: &Disposition) -> ChartSpec {
    let labels = disposition
        .snf
        .iter()
        .map(|s| if s.needs_snf { "Needs SNF" } else { "No SNF" }.to_string())
        .collect();
    let dataset = Dataset {
        label: MEDIAN_SERIES.to_string(),
        values: disposition.snf.iter().map(|s| s.median_los).collect(),
        background: Colors::PerBar(vec!["rgba(255, 99, 132, 0.6)", "rgba(54, 162, 235, 0.6)"]),
        border: Some(Colors::PerBar(vec!["rgba(255, 99, 132, 1)", "rgba(54, 162, 235, 1)"])),
        border_width: 2,
    };

    single_series(
        CanvasId::SnfChart,
        "Median LOS by SNF Need",
        labels,
        dataset,
        Orientation::Vertical,
        DAYS_AXIS,
    )
}

// ============ Trends ============

pub fn drg_chart(drgs: &TopDrgs) -> ChartSpec {
    single_series(
        CanvasId::DrgChart,
        "Top DRGs by Case Count",
        drgs.data.iter().map(|d| format!("DRG {}", d.drg_code)).collect(),
        Dataset::new(
            "Number of Cases",
            drgs.data.iter().map(|d| d.count as f64).collect(),
            "rgba(153, 102, 255, 0.6)",
            "rgba(153, 102, 255, 1)",
        ),
        Orientation::Horizontal,
        "Number of Cases",
    )
}

/// Bar charts a tab shows, in page order. The outlier scatter is drawn
/// separately.
pub fn charts_for(data: &TabData) -> Vec<ChartSpec> {
    match data {
        TabData::Overview {
            overview,
            distribution,
        } => vec![los_histogram(&distribution.los), los_boxplot(overview)],
        TabData::Severity { severity, senior } => vec![
            severity_chart(severity, SeverityStatistic::Median),
            severity_chart(severity, SeverityStatistic::Mean),
            severity_senior_chart(senior),
        ],
        TabData::Demographics(demographics) => {
            vec![age_chart(demographics), gender_chart(demographics)]
        }
        TabData::Payment {
            payment,
            admission,
            disposition,
        } => vec![
            payment_chart(payment),
            admission_chart(admission),
            snf_chart(disposition),
        ],
        TabData::Trends(drgs) => vec![drg_chart(drgs)],
        TabData::Outliers(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    fn parse<T: serde::de::DeserializeOwned>(body: &str) -> T {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_every_chart_lands_on_its_tab_panel() {
        let tabs = [
            TabData::Overview {
                overview: parse(fixtures::OVERVIEW),
                distribution: parse(fixtures::LOS_DISTRIBUTION),
            },
            TabData::Severity {
                severity: parse(fixtures::SEVERITY),
                senior: parse(fixtures::SEVERITY_SENIOR),
            },
            TabData::Demographics(parse(fixtures::DEMOGRAPHICS)),
            TabData::Payment {
                payment: parse(fixtures::PAYMENT),
                admission: parse(fixtures::ADMISSION),
                disposition: parse(fixtures::DISPOSITION),
            },
            TabData::Trends(parse(fixtures::TOP_DRGS)),
        ];

        for data in &tabs {
            let canvases: Vec<CanvasId> = charts_for(data).iter().map(|c| c.canvas).collect();
            assert_eq!(canvases, CanvasId::for_tab(data.tab()), "{}", data.tab());
        }
        assert_eq!(CanvasId::for_tab(Tab::Outliers), &[CanvasId::OutlierScatter]);
    }

    #[test]
    fn test_histogram_binning() {
        let spec = los_histogram(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 5.0, 8.0, 12.0, 30.0, 75.0]);

        // Capped at 50 days, bins of ceil(50 / 40) = 2
        assert_eq!(spec.labels.len(), 26);
        assert_eq!(spec.labels[0], "0-2");
        assert_eq!(spec.labels[25], "50-52");

        let counts = &spec.datasets[0].values;
        assert_eq!(counts[0], 1.0);
        assert_eq!(counts[1], 5.0);
        assert_eq!(counts[2], 2.0);
        assert_eq!(counts[4], 1.0);
        assert_eq!(counts[15], 1.0);
        // 75 lies beyond the cap
        assert_eq!(counts.iter().sum::<f64>(), 11.0);
    }

    #[test]
    fn test_histogram_short_stays_use_unit_bins() {
        let spec = los_histogram(&[1.0, 2.0, 3.5]);
        assert_eq!(spec.labels, vec!["0-1", "1-2", "2-3", "3-4"]);
        assert_eq!(spec.datasets[0].values, vec![0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_histogram_empty_input() {
        let spec = los_histogram(&[]);
        assert_eq!(spec.labels, vec!["0-1"]);
        assert_eq!(spec.datasets[0].values, vec![0.0]);
    }

    #[test]
    fn test_boxplot_caps_max() {
        let overview: Overview = parse(fixtures::OVERVIEW);
        let spec = los_boxplot(&overview);
        let values: Vec<f64> = spec.datasets.iter().map(|d| d.values[0]).collect();
        assert_eq!(values, vec![1.0, 2.0, 4.0, 7.0, 50.0]);
        assert!(spec.legend);
    }

    #[test]
    fn test_severity_senior_grouping() {
        let breakdown: SeveritySeniorBreakdown = parse(fixtures::SEVERITY_SENIOR);
        let spec = severity_senior_chart(&breakdown);

        assert_eq!(spec.labels, vec!["Severity 1", "Severity 2", "Severity 10"]);
        assert_eq!(spec.datasets[0].label, "Non-Senior (<70)");
        assert_eq!(spec.datasets[0].values, vec![2.0, 3.0, 11.0]);
        assert_eq!(spec.datasets[1].label, "Senior (70+)");
        assert_eq!(spec.datasets[1].values, vec![3.0, 4.0, 0.0]);
    }

    #[test]
    fn test_severity_statistic_selects_series() {
        let breakdown: SeverityBreakdown = parse(fixtures::SEVERITY);
        let mean = severity_chart(&breakdown, SeverityStatistic::Mean);
        assert_eq!(mean.canvas, CanvasId::SeverityMeanChart);
        assert_eq!(mean.labels[3], "Severity 4");
        assert_eq!(mean.datasets[0].values[3], 12.1);
    }

    #[test]
    fn test_snf_and_drg_labels() {
        let disposition: Disposition = parse(fixtures::DISPOSITION);
        assert_eq!(snf_chart(&disposition).labels, vec!["No SNF", "Needs SNF"]);

        let drgs: TopDrgs = parse(fixtures::TOP_DRGS);
        let spec = drg_chart(&drgs);
        assert_eq!(spec.labels, vec!["DRG 720", "DRG 194", "DRG 775"]);
        assert_eq!(spec.orientation, Orientation::Horizontal);
    }

    #[test]
    fn test_chartjs_config_for_horizontal_chart() {
        let drgs: TopDrgs = parse(fixtures::TOP_DRGS);
        let config = drg_chart(&drgs).to_chartjs_config();

        assert_eq!(config["type"], "bar");
        assert_eq!(config["options"]["indexAxis"], "y");
        assert_eq!(config["options"]["scales"]["x"]["title"]["text"], "Number of Cases");
        assert_eq!(config["options"]["plugins"]["legend"]["display"], false);
        assert_eq!(config["data"]["datasets"][0]["data"][0], 2841.0);
        assert_eq!(config["data"]["datasets"][0]["borderWidth"], 2);
    }

    #[test]
    fn test_chartjs_config_for_histogram_titles_both_axes() {
        let config = los_histogram(&[1.0, 2.0]).to_chartjs_config();
        assert!(config["options"].get("indexAxis").is_none());
        assert_eq!(config["options"]["scales"]["y"]["title"]["text"], "Number of Patients");
        assert_eq!(config["options"]["scales"]["x"]["title"]["text"], DAYS_AXIS);
    }

    #[test]
    fn test_charts_for_each_tab() {
        let overview = TabData::Overview {
            overview: parse(fixtures::OVERVIEW),
            distribution: parse(fixtures::LOS_DISTRIBUTION),
        };
        let canvases: Vec<CanvasId> = charts_for(&overview).iter().map(|c| c.canvas).collect();
        assert_eq!(canvases, vec![CanvasId::LosHistogram, CanvasId::LosBoxplot]);

        let outliers = TabData::Outliers(parse(fixtures::OUTLIERS));
        assert!(charts_for(&outliers).is_empty());
    }
}

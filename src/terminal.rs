//! Terminal Host
//!
//! Status surface, render sink and output writers used by the `losight`
//! binary: tables or JSON on stdout, progress and errors on stderr, the
//! outlier scatter as SVG and chart series as CSV files.

use serde::Serialize;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::OutlierSummary;
use crate::dashboard::{ErrorReport, ErrorSeverity, RenderSink, StatusSurface, Tab, TabData};
use crate::render::{
    charts_for, format_days, metrics_for, scatter_scene, to_svg, CanvasId, ChartSpec, Metric,
};

/// Output file errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path:?}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to write CSV {path:?}: {error}")]
    Csv { path: PathBuf, error: csv::Error },
}

/// stdout rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

// ============ Status ============

/// Writes loading and error state to stderr
#[derive(Debug, Default)]
pub struct TerminalStatus {
    quiet: bool,
}

impl TerminalStatus {
    /// Suppress loading messages (errors are always shown)
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl StatusSurface for TerminalStatus {
    fn show_loading(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    fn hide_loading(&self) {}

    fn report(&self, report: &ErrorReport) {
        eprint!("{}", format_report(report));
    }

    fn dismiss_error(&self) {}
}

/// Error block as printed to the terminal
pub fn format_report(report: &ErrorReport) -> String {
    let mut out = String::new();
    match report.severity {
        ErrorSeverity::Blocking => {
            let _ = writeln!(out, "{}: {}", report.title, report.message);
        }
        ErrorSeverity::Inline => {
            let _ = writeln!(out, "{}", report.title);
            let _ = writeln!(out, "  {}", report.message);
            if !report.remediation.is_empty() {
                let _ = writeln!(out);
                for step in &report.remediation {
                    let _ = writeln!(out, "  - {}", step);
                }
            }
        }
    }
    out
}

// ============ Sink ============

/// Collects rendered tabs for printing once loads settle
#[derive(Debug, Default)]
pub struct ReportSink {
    rendered: RefCell<Vec<TabData>>,
}

impl ReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered tabs in display order
    pub fn take(&self) -> Vec<TabData> {
        let mut tabs = std::mem::take(&mut *self.rendered.borrow_mut());
        tabs.sort_by_key(|data| data.tab().slot());
        tabs
    }
}

impl RenderSink for ReportSink {
    fn render(&self, data: TabData) {
        tracing::debug!("Rendered {} tab", data.tab());
        self.rendered.borrow_mut().push(data);
    }
}

// ============ stdout ============

#[derive(Serialize)]
struct TabReport<'a> {
    tab: Tab,
    title: &'static str,
    metrics: Vec<Metric>,
    charts: Vec<ChartSpec>,
    data: &'a TabData,
}

/// JSON document for a set of rendered tabs
pub fn render_json(tabs: &[TabData]) -> serde_json::Result<String> {
    let reports: Vec<TabReport<'_>> = tabs
        .iter()
        .map(|data| TabReport {
            tab: data.tab(),
            title: data.tab().title(),
            metrics: metrics_for(data),
            charts: charts_for(data),
            data,
        })
        .collect();
    serde_json::to_string_pretty(&reports)
}

/// Plain-text rendering of one tab
pub fn render_table(data: &TabData) -> String {
    let mut out = String::new();
    let title = data.tab().title();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));

    let metrics = metrics_for(data);
    if !metrics.is_empty() {
        let _ = writeln!(out);
        for metric in &metrics {
            let _ = writeln!(out, "{:<20} {}", metric.label, metric.value);
        }
    }

    for chart in charts_for(data) {
        let _ = writeln!(out);
        out.push_str(&chart_table(&chart));
    }

    if let TabData::Outliers(summary) = data {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} normal, {} mild, {} extreme points plotted",
            summary.normal_points.len(),
            summary.mild_outlier_points.len(),
            summary.extreme_outlier_points.len()
        );
    }

    out
}

fn chart_table(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", chart.title, chart.canvas);

    let width = chart
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);

    let _ = write!(out, "{:<width$}", "", width = width);
    for dataset in &chart.datasets {
        let _ = write!(out, " | {:>18}", dataset.label);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(width + chart.datasets.len() * 21));

    for (row, label) in chart.labels.iter().enumerate() {
        let _ = write!(out, "{:<width$}", label, width = width);
        for dataset in &chart.datasets {
            let value = dataset
                .values
                .get(row)
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(out, " | {:>18}", value);
        }
        let _ = writeln!(out);
    }
    out
}

/// Human-readable header for a report
pub fn report_header(dataset: &str, query: &str) -> String {
    let filters = if query.is_empty() { "none" } else { query };
    format!(
        "LOSight report for {} (filters: {}) generated {}",
        dataset,
        filters,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

// ============ Files ============

fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    std::fs::create_dir_all(dir).map_err(|error| OutputError::Io {
        path: dir.to_path_buf(),
        error,
    })
}

/// Write the outlier scatter as `outlier-scatter.svg` under `dir`
pub fn write_scatter_svg(
    summary: &OutlierSummary,
    dir: &Path,
    width: f64,
    height: f64,
) -> Result<PathBuf, OutputError> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{}.svg", CanvasId::OutlierScatter.dom_id()));
    let svg = to_svg(&scatter_scene(summary, width, height));
    std::fs::write(&path, svg).map_err(|error| OutputError::Io {
        path: path.clone(),
        error,
    })?;
    tracing::info!(
        "Wrote outlier scatter ({} to {} days) to {:?}",
        format_days(summary.upper_bound),
        format_days(summary.extreme_upper),
        path
    );
    Ok(path)
}

/// Write each chart's series as `<canvas>.csv` under `dir`
pub fn export_csv(charts: &[ChartSpec], dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    ensure_dir(dir)?;
    let mut written = Vec::with_capacity(charts.len());

    for chart in charts {
        let path = dir.join(format!("{}.csv", chart.canvas.dom_id()));
        let csv_error = |error| OutputError::Csv {
            path: path.clone(),
            error,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(csv_error)?;

        let mut header = vec!["label".to_string()];
        header.extend(chart.datasets.iter().map(|d| d.label.clone()));
        writer.write_record(&header).map_err(csv_error)?;

        for (row, label) in chart.labels.iter().enumerate() {
            let mut record = vec![label.clone()];
            record.extend(chart.datasets.iter().map(|d| {
                d.values
                    .get(row)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            writer.write_record(&record).map_err(csv_error)?;
        }

        writer.flush().map_err(|error| OutputError::Io {
            path: path.clone(),
            error,
        })?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Overview, TopDrgs};
    use crate::render::charts::drg_chart;
    use crate::test_support::fixtures;

    fn parse<T: serde::de::DeserializeOwned>(body: &str) -> T {
        serde_json::from_str(body).unwrap()
    }

    fn overview_tab() -> TabData {
        TabData::Overview {
            overview: parse::<Overview>(fixtures::OVERVIEW),
            distribution: parse(fixtures::LOS_DISTRIBUTION),
        }
    }

    #[test]
    fn test_table_shows_metrics_and_charts() {
        let table = render_table(&overview_tab());
        assert!(table.starts_with("Overview\n========\n"));
        assert!(table.contains("Median LOS           4.0 days"));
        assert!(table.contains("LOS Distribution [los-histogram]"));
        assert!(table.contains("LOS Summary [los-boxplot]"));
    }

    #[test]
    fn test_report_sink_orders_by_tab() {
        let sink = ReportSink::new();
        sink.render(TabData::Trends(parse(fixtures::TOP_DRGS)));
        sink.render(overview_tab());

        let tabs: Vec<Tab> = sink.take().iter().map(TabData::tab).collect();
        assert_eq!(tabs, vec![Tab::Overview, Tab::Trends]);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_json_includes_chart_specs() {
        let json = render_json(&[TabData::Trends(parse(fixtures::TOP_DRGS))]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["tab"], "trends");
        assert_eq!(value[0]["charts"][0]["canvas"], "drg-chart");
        assert_eq!(value[0]["charts"][0]["labels"][0], "DRG 720");
    }

    #[test]
    fn test_inline_report_lists_remediation() {
        let text = format_report(&ErrorReport::inline("Failed to load overview data"));
        assert!(text.starts_with("Error Loading Data\n  Failed to load overview data\n"));
        assert!(text.contains("  - Make sure the server is running\n"));

        let text = format_report(&ErrorReport::blocking("Failed to load payment data."));
        assert_eq!(text, "Error: Failed to load payment data.\n");
    }

    #[test]
    fn test_export_csv_writes_one_file_per_chart() {
        let dir = tempfile::tempdir().unwrap();
        let drgs: TopDrgs = parse(fixtures::TOP_DRGS);

        let paths = export_csv(&[drg_chart(&drgs)], dir.path()).unwrap();

        assert_eq!(paths, vec![dir.path().join("drg-chart.csv")]);
        let content = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(
            content,
            "label,Number of Cases\nDRG 720,2841\nDRG 194,1502\nDRG 775,977\n"
        );
    }

    #[test]
    fn test_write_scatter_svg() {
        let dir = tempfile::tempdir().unwrap();
        let summary: OutlierSummary = parse(fixtures::OUTLIERS);

        let path = write_scatter_svg(&summary, &dir.path().join("out"), 960.0, 400.0).unwrap();

        assert!(path.ends_with("outlier-scatter.svg"));
        let svg = std::fs::read_to_string(&path).unwrap();
        assert_eq!(svg.matches("<circle").count(), 3);
    }
}

//! API Data Transfer Objects
//!
//! Response bodies for every endpoint the dashboard reads. Required fields
//! are plain struct fields so a missing one fails deserialization; optional
//! extras the server also sends are `#[serde(default)]`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Semantic checks applied after a body deserialized successfully
pub trait Validate {
    /// Return a human-readable reason when the payload is unusable
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ============ Shared Types ============

/// A category value as the backend emits it.
///
/// Severity and DRG codes arrive as JSON numbers, payment types and age
/// groups as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Label {
    /// Numeric value used for ordering severity groups
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Label::Int(n) => Some(*n as f64),
            Label::Float(v) => Some(*v),
            Label::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(n) => write!(f, "{}", n),
            Label::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{}", *v as i64),
            Label::Float(v) => write!(f, "{}", v),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

/// Accepts `0`/`1` (pandas integer flags) as well as JSON booleans
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Num(f64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Num(n) => n != 0.0,
    })
}

fn check_finite(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{} is not a finite number", name))
    }
}

// ============ Metadata ============

/// Response of `/dataset-info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub dataset_name: String,
    pub rows: u64,
    pub columns: u64,
    #[serde(default)]
    pub columns_list: Vec<String>,
    #[serde(default)]
    pub sample_size: Option<String>,
}

impl Validate for DatasetInfo {}

/// Closed numeric range advertised by the options endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Response of `/filters/options`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub severity: Vec<Label>,
    pub payment: Vec<Label>,
    pub admission: Vec<Label>,
    pub drg: Vec<Label>,
    pub los: Bounds,
    #[serde(default)]
    pub age: Option<Bounds>,
}

impl Validate for FilterOptions {
    fn validate(&self) -> Result<(), String> {
        check_finite("los.min", self.los.min)?;
        check_finite("los.max", self.los.max)?;
        if self.los.min > self.los.max {
            return Err(format!(
                "los.min ({}) exceeds los.max ({})",
                self.los.min, self.los.max
            ));
        }
        Ok(())
    }
}

// ============ Overview ============

/// Response of `/data/overview`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_patients: u64,
    pub median_los: f64,
    pub mean_los: f64,
    pub min_los: f64,
    pub max_los: f64,
    pub q25: f64,
    pub q75: f64,
    #[serde(default)]
    pub std_los: Option<f64>,
    #[serde(default)]
    pub q95: Option<f64>,
    #[serde(default)]
    pub q99: Option<f64>,
    #[serde(default)]
    pub skewness: Option<f64>,
}

impl Validate for Overview {
    fn validate(&self) -> Result<(), String> {
        if self.total_patients == 0 {
            return Err("overview reports no patients for the current filters".to_string());
        }
        check_finite("median_los", self.median_los)?;
        check_finite("mean_los", self.mean_los)
    }
}

/// Response of `/data/los-distribution`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosDistribution {
    pub los: Vec<f64>,
}

impl Validate for LosDistribution {}

// ============ Severity ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityStat {
    pub severity: Label,
    pub median_los: f64,
    pub mean_los: f64,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Response of `/data/severity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub data: Vec<SeverityStat>,
}

impl Validate for SeverityBreakdown {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeveritySeniorStat {
    pub severity: Label,
    #[serde(deserialize_with = "de_flag")]
    pub is_senior: bool,
    pub median_los: f64,
}

/// Response of `/data/severity-senior`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeveritySeniorBreakdown {
    pub data: Vec<SeveritySeniorStat>,
}

impl Validate for SeveritySeniorBreakdown {}

// ============ Demographics ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeStat {
    pub age_group: Label,
    pub median_los: f64,
    #[serde(default)]
    pub mean_los: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderStat {
    pub gender: Label,
    pub median_los: f64,
    #[serde(default)]
    pub mean_los: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Response of `/data/demographics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: Vec<AgeStat>,
    pub gender: Vec<GenderStat>,
}

impl Validate for Demographics {}

// ============ Payment / Admission / Disposition ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStat {
    pub payment_type: Label,
    pub median_los: f64,
    #[serde(default)]
    pub mean_los: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Response of `/data/payment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub data: Vec<PaymentStat>,
}

impl Validate for PaymentBreakdown {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionStat {
    pub admission_type: Label,
    pub median_los: f64,
    #[serde(default)]
    pub mean_los: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Response of `/data/admission`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionBreakdown {
    pub data: Vec<AdmissionStat>,
}

impl Validate for AdmissionBreakdown {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnfStat {
    #[serde(deserialize_with = "de_flag")]
    pub needs_snf: bool,
    pub median_los: f64,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Response of `/data/disposition`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disposition {
    pub snf: Vec<SnfStat>,
}

impl Validate for Disposition {}

// ============ Trends ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrgCount {
    pub drg_code: Label,
    pub count: u64,
    #[serde(default)]
    pub median_los: Option<f64>,
    #[serde(default)]
    pub mean_los: Option<f64>,
}

/// Response of `/data/top-drgs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDrgs {
    pub data: Vec<DrgCount>,
}

impl Validate for TopDrgs {}

// ============ Outliers ============

/// One sampled patient in the outlier scatter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierPoint {
    /// Stable ordinal used for x placement
    pub index: u64,
    #[serde(rename = "Length of Stay")]
    pub los: f64,
}

/// Response of `/data/outliers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub mild_outliers: u64,
    pub extreme_outliers: u64,
    pub upper_bound: f64,
    pub extreme_upper: f64,
    pub normal_points: Vec<OutlierPoint>,
    pub mild_outlier_points: Vec<OutlierPoint>,
    pub extreme_outlier_points: Vec<OutlierPoint>,
    #[serde(default)]
    pub q1: Option<f64>,
    #[serde(default)]
    pub q3: Option<f64>,
    #[serde(default)]
    pub iqr: Option<f64>,
}

impl OutlierSummary {
    /// Iterate every plotted point regardless of classification
    pub fn all_points(&self) -> impl Iterator<Item = &OutlierPoint> {
        self.normal_points
            .iter()
            .chain(self.mild_outlier_points.iter())
            .chain(self.extreme_outlier_points.iter())
    }
}

impl Validate for OutlierSummary {
    fn validate(&self) -> Result<(), String> {
        check_finite("upper_bound", self.upper_bound)?;
        check_finite("extreme_upper", self.extreme_upper)?;
        if self.extreme_upper < self.upper_bound {
            return Err(format!(
                "extreme_upper ({}) is below upper_bound ({})",
                self.extreme_upper, self.upper_bound
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Int(3).to_string(), "3");
        assert_eq!(Label::Float(4.0).to_string(), "4");
        assert_eq!(Label::Float(4.5).to_string(), "4.5");
        assert_eq!(Label::from("Medicare").to_string(), "Medicare");
        assert_eq!(Label::from(" 2 ").as_f64(), Some(2.0));
    }

    #[test]
    fn test_filter_options_mixed_labels() {
        let json = r#"{
            "severity": [1, 2, 3, 4],
            "payment": ["Medicaid", "Medicare"],
            "admission": ["Elective", "Emergency"],
            "drg": [194, 720],
            "los": {"min": 1, "max": 45},
            "age": {"min": 18, "max": 70}
        }"#;
        let options: FilterOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.severity.len(), 4);
        assert_eq!(options.drg[0].to_string(), "194");
        assert_eq!(options.los, Bounds { min: 1.0, max: 45.0 });
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_overview_requires_patients() {
        let json = r#"{
            "total_patients": 0, "median_los": 0, "mean_los": 0,
            "min_los": 0, "max_los": 0, "q25": 0, "q75": 0
        }"#;
        let overview: Overview = serde_json::from_str(json).unwrap();
        assert!(overview.validate().is_err());
    }

    #[test]
    fn test_overview_missing_field_fails() {
        let json = r#"{"total_patients": 10, "median_los": 3.0}"#;
        assert!(serde_json::from_str::<Overview>(json).is_err());
    }

    #[test]
    fn test_outlier_point_field_name() {
        let json = r#"{"index": 7, "Length of Stay": 12.5}"#;
        let point: OutlierPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.index, 7);
        assert_eq!(point.los, 12.5);
    }

    #[test]
    fn test_flags_accept_integers() {
        let json = r#"{"data": [
            {"severity": 1, "is_senior": 0, "median_los": 3.0},
            {"severity": 1, "is_senior": 1, "median_los": 4.0}
        ]}"#;
        let breakdown: SeveritySeniorBreakdown = serde_json::from_str(json).unwrap();
        assert!(!breakdown.data[0].is_senior);
        assert!(breakdown.data[1].is_senior);
    }

    #[test]
    fn test_error_body_is_invalid_breakdown() {
        let json = r#"{"error": "Severity data not available"}"#;
        assert!(serde_json::from_str::<SeverityBreakdown>(json).is_err());
    }

    #[test]
    fn test_outlier_thresholds_ordered() {
        let summary = OutlierSummary {
            mild_outliers: 0,
            extreme_outliers: 0,
            upper_bound: 20.0,
            extreme_upper: 10.0,
            normal_points: vec![],
            mild_outlier_points: vec![],
            extreme_outlier_points: vec![],
            q1: None,
            q3: None,
            iqr: None,
        };
        assert!(summary.validate().is_err());
    }
}

//! Test doubles shared by the unit tests

use async_trait::async_trait;
use futures_util::future::{self, FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::api::{Endpoint, RawResponse, Timer, Transport, TransportError};
use crate::dashboard::{ErrorReport, RenderSink, StatusSurface, Tab, TabData};

// ============ Transport ============

/// Canned responses keyed by endpoint, with optional latency
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(Endpoint, RawResponse)>,
    delay: Option<Duration>,
    delay_sequence: RefCell<VecDeque<Duration>>,
    requests: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` for `endpoint`, replacing any earlier route
    pub fn respond(mut self, endpoint: Endpoint, status: u16, body: &str) -> Self {
        self.routes.retain(|(e, _)| *e != endpoint);
        self.routes.push((endpoint, RawResponse::new(status, body)));
        self
    }

    /// Delay every response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay the first requests by these amounts, in dispatch order
    pub fn with_delay_sequence(self, delays: Vec<Duration>) -> Self {
        *self.delay_sequence.borrow_mut() = delays.into();
        self
    }

    /// URLs requested so far, in dispatch order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn route(&self, url: &str) -> Option<RawResponse> {
        let path = url.split('?').next().unwrap_or(url);
        self.routes
            .iter()
            .find(|(endpoint, _)| path.ends_with(&format!("/{}", endpoint.path())))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.requests.borrow_mut().push(url.to_string());
        let delay = self.delay_sequence.borrow_mut().pop_front().or(self.delay);
        let response = self.route(url);

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        response.ok_or_else(|| TransportError::Unavailable(format!("no route for {}", url)))
    }
}

/// Never answers
pub struct PendingTransport;

#[async_trait(?Send)]
impl Transport for PendingTransport {
    async fn get(&self, _url: &str) -> Result<RawResponse, TransportError> {
        future::pending().await
    }
}

/// tokio-backed timer; pairs with paused test time
#[derive(Clone, Copy)]
pub struct TestTimer;

impl Timer for TestTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed_local()
    }
}

// ============ Surfaces ============

#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Loading(String),
    Hidden,
    Reported(ErrorReport),
    Dismissed,
}

/// Records every status call
#[derive(Default)]
pub struct RecordingStatus {
    events: RefCell<Vec<StatusEvent>>,
}

impl RecordingStatus {
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.borrow().clone()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                StatusEvent::Reported(report) => Some(report.clone()),
                _ => None,
            })
            .collect()
    }
}

impl StatusSurface for RecordingStatus {
    fn show_loading(&self, message: &str) {
        self.events
            .borrow_mut()
            .push(StatusEvent::Loading(message.to_string()));
    }

    fn hide_loading(&self) {
        self.events.borrow_mut().push(StatusEvent::Hidden);
    }

    fn report(&self, report: &ErrorReport) {
        self.events
            .borrow_mut()
            .push(StatusEvent::Reported(report.clone()));
    }

    fn dismiss_error(&self) {
        self.events.borrow_mut().push(StatusEvent::Dismissed);
    }
}

/// Records rendered tab data
#[derive(Default)]
pub struct RecordingSink {
    rendered: RefCell<Vec<TabData>>,
}

impl RecordingSink {
    pub fn tabs(&self) -> Vec<Tab> {
        self.rendered.borrow().iter().map(TabData::tab).collect()
    }

    pub fn rendered(&self) -> Vec<TabData> {
        self.rendered.borrow().clone()
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, data: TabData) {
        self.rendered.borrow_mut().push(data);
    }
}

// ============ Fixtures ============

pub mod fixtures {
    use super::MockTransport;
    use crate::api::Endpoint;

    pub const DATASET_INFO: &str = r#"{
        "dataset_name": "Hospital Inpatient Discharges",
        "rows": 2500,
        "columns": 34,
        "columns_list": ["Length of Stay", "APR Severity of Illness Code"]
    }"#;

    pub const FILTER_OPTIONS: &str = r#"{
        "severity": ["1", "2", "3", "4"],
        "payment": ["Medicaid", "Medicare", "Private Health Insurance"],
        "admission": ["Elective", "Emergency", "Urgent"],
        "drg": [194, 720, 775],
        "los": {"min": 1, "max": 45},
        "age": {"min": 18, "max": 90}
    }"#;

    pub const OVERVIEW: &str = r#"{
        "total_patients": 1200,
        "median_los": 4.0,
        "mean_los": 5.6,
        "min_los": 1,
        "max_los": 120,
        "q25": 2.0,
        "q75": 7.0,
        "std_los": 6.3
    }"#;

    pub const LOS_DISTRIBUTION: &str = r#"{"los": [1, 2, 2, 3, 3, 3, 4, 5, 8, 12, 30, 75]}"#;

    pub const SEVERITY: &str = r#"{"data": [
        {"severity": 1, "median_los": 2.0, "mean_los": 2.6},
        {"severity": 2, "median_los": 3.0, "mean_los": 3.9},
        {"severity": 3, "median_los": 5.0, "mean_los": 6.4},
        {"severity": 4, "median_los": 9.0, "mean_los": 12.1}
    ]}"#;

    pub const SEVERITY_SENIOR: &str = r#"{"data": [
        {"severity": 2, "is_senior": 1, "median_los": 4.0},
        {"severity": 1, "is_senior": 0, "median_los": 2.0},
        {"severity": 1, "is_senior": 1, "median_los": 3.0},
        {"severity": 2, "is_senior": 0, "median_los": 3.0},
        {"severity": 10, "is_senior": 0, "median_los": 11.0}
    ]}"#;

    pub const DEMOGRAPHICS: &str = r#"{
        "age": [
            {"age_group": "18 to 29", "median_los": 3.0},
            {"age_group": "70 or Older", "median_los": 5.0}
        ],
        "gender": [
            {"gender": "F", "median_los": 4.0},
            {"gender": "M", "median_los": 4.5}
        ]
    }"#;

    pub const PAYMENT: &str = r#"{"data": [
        {"payment_type": "Medicare", "median_los": 5.0},
        {"payment_type": "Medicaid", "median_los": 4.0}
    ]}"#;

    pub const ADMISSION: &str = r#"{"data": [
        {"admission_type": "Emergency", "median_los": 5.0},
        {"admission_type": "Elective", "median_los": 3.0}
    ]}"#;

    pub const DISPOSITION: &str = r#"{"snf": [
        {"needs_snf": 0, "median_los": 3.0},
        {"needs_snf": 1, "median_los": 8.0}
    ]}"#;

    pub const TOP_DRGS: &str = r#"{"data": [
        {"drg_code": 720, "count": 2841},
        {"drg_code": 194, "count": 1502},
        {"drg_code": 775, "count": 977}
    ]}"#;

    pub const OUTLIERS: &str = r#"{
        "mild_outliers": 1,
        "extreme_outliers": 1,
        "upper_bound": 10.0,
        "extreme_upper": 20.0,
        "normal_points": [{"index": 0, "Length of Stay": 3}],
        "mild_outlier_points": [{"index": 1, "Length of Stay": 14}],
        "extreme_outlier_points": [{"index": 2, "Length of Stay": 25}]
    }"#;

    /// Every endpoint answering 200 with its fixture
    pub fn full_api() -> MockTransport {
        MockTransport::new()
            .respond(Endpoint::DatasetInfo, 200, DATASET_INFO)
            .respond(Endpoint::FilterOptions, 200, FILTER_OPTIONS)
            .respond(Endpoint::Overview, 200, OVERVIEW)
            .respond(Endpoint::LosDistribution, 200, LOS_DISTRIBUTION)
            .respond(Endpoint::Severity, 200, SEVERITY)
            .respond(Endpoint::SeveritySenior, 200, SEVERITY_SENIOR)
            .respond(Endpoint::Demographics, 200, DEMOGRAPHICS)
            .respond(Endpoint::Payment, 200, PAYMENT)
            .respond(Endpoint::Admission, 200, ADMISSION)
            .respond(Endpoint::Disposition, 200, DISPOSITION)
            .respond(Endpoint::TopDrgs, 200, TOP_DRGS)
            .respond(Endpoint::Outliers, 200, OUTLIERS)
    }
}

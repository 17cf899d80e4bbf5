//! Dashboard State
//!
//! Reactive signals the components read, and the signal-backed status
//! surface and render sink the core controller writes to.

use leptos::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use losight::api::{DatasetInfo, OutlierSummary};
use losight::dashboard::{
    Dashboard, ErrorReport, ErrorSeverity, RenderSink, StatusSurface, Tab, TabData,
};
use losight::filters::{FilterInputs, SelectChoices};
use losight::render::{charts_for, ChartRegistry};

use crate::api::{GlooTimer, GlooTransport};
use crate::charts::{draw_scatter, mount_chart, JsChart};

pub type UiDashboard = Dashboard<GlooTransport, GlooTimer, SignalStatus>;

/// Shared reactive state
#[derive(Clone, Copy)]
pub struct UiState {
    /// Loading overlay message, `None` when hidden
    pub loading: RwSignal<Option<String>>,
    /// Inline error panel
    pub error: RwSignal<Option<ErrorReport>>,
    pub active_tab: RwSignal<Tab>,
    /// Latest rendered data per tab
    pub tab_data: RwSignal<HashMap<Tab, TabData>>,
    pub dataset: RwSignal<Option<DatasetInfo>>,
    pub choices: RwSignal<SelectChoices>,
    /// Raw control values, copied into the controller on apply
    pub inputs: RwSignal<FilterInputs>,
}

impl UiState {
    fn new() -> Self {
        Self {
            loading: create_rw_signal(None),
            error: create_rw_signal(None),
            active_tab: create_rw_signal(Tab::default()),
            tab_data: create_rw_signal(HashMap::new()),
            dataset: create_rw_signal(None),
            choices: create_rw_signal(SelectChoices::default()),
            inputs: create_rw_signal(FilterInputs::default()),
        }
    }

    /// Rendered outlier summary, if the outliers tab has loaded
    pub fn outliers(&self) -> Option<OutlierSummary> {
        self.tab_data.with(|tabs| match tabs.get(&Tab::Outliers) {
            Some(TabData::Outliers(summary)) => Some(summary.clone()),
            _ => None,
        })
    }
}

/// Provide state, controller and sink to the component tree
pub fn provide_ui_state(dashboard: UiDashboard) -> (UiState, Rc<UiDashboard>, Rc<ViewSink>) {
    let state = dashboard.status().state;
    let dashboard = Rc::new(dashboard);
    let sink = Rc::new(ViewSink::new(state));

    provide_context(state);
    provide_context(dashboard.clone());
    provide_context(sink.clone());

    (state, dashboard, sink)
}

pub fn use_ui() -> (UiState, Rc<UiDashboard>, Rc<ViewSink>) {
    (
        expect_context::<UiState>(),
        expect_context::<Rc<UiDashboard>>(),
        expect_context::<Rc<ViewSink>>(),
    )
}

/// Copy the controller's options and inputs into the signals
pub fn sync_filters(dashboard: &UiDashboard, state: UiState) {
    let filters = dashboard.filters();
    state.choices.set(filters.choices().clone());
    state.inputs.set(filters.inputs().clone());
}

/// Copy the signals' control values into the controller
pub fn push_inputs(dashboard: &UiDashboard, state: UiState) {
    *dashboard.filters_mut().inputs_mut() = state.inputs.get_untracked();
}

// ============ Status ============

/// Drives the loading overlay and error panel
pub struct SignalStatus {
    state: UiState,
}

impl SignalStatus {
    /// Creates the shared signals; call inside the root component
    pub fn new() -> Self {
        Self {
            state: UiState::new(),
        }
    }
}

impl Default for SignalStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSurface for SignalStatus {
    fn show_loading(&self, message: &str) {
        self.state.loading.set(Some(message.to_string()));
    }

    fn hide_loading(&self) {
        self.state.loading.set(None);
    }

    fn report(&self, report: &ErrorReport) {
        web_sys::console::error_1(&format!("{}: {}", report.title, report.message).into());

        match report.severity {
            ErrorSeverity::Blocking => {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&report.message);
                }
            }
            ErrorSeverity::Inline => self.state.error.set(Some(report.clone())),
        }
    }

    fn dismiss_error(&self) {
        self.state.error.set(None);
    }
}

// ============ Sink ============

/// Stores tab data for the panels and draws its charts
pub struct ViewSink {
    state: UiState,
    charts: RefCell<ChartRegistry<JsChart>>,
}

impl ViewSink {
    fn new(state: UiState) -> Self {
        Self {
            state,
            charts: RefCell::new(ChartRegistry::new()),
        }
    }

    /// Redraw the outlier scatter at the current container width
    pub fn redraw_scatter(&self) {
        if let Some(summary) = self.state.outliers() {
            draw_scatter(&summary);
        }
    }
}

impl RenderSink for ViewSink {
    fn render(&self, data: TabData) {
        let mut charts = self.charts.borrow_mut();
        for spec in charts_for(&data) {
            if let Err(e) = mount_chart(&mut charts, &spec) {
                web_sys::console::error_1(&format!("Chart {} failed: {:?}", spec.canvas, e).into());
            }
        }
        drop(charts);

        if let TabData::Outliers(summary) = &data {
            draw_scatter(summary);
        }

        let tab = data.tab();
        self.state.tab_data.update(|tabs| {
            tabs.insert(tab, data);
        });
    }
}

//! Dashboard Controller
//!
//! Ties the filter store, the tab controller and the API client together:
//! startup probe, per-tab loads, "load everything" after filters change, and
//! routing of validated data to a [`RenderSink`].
//!
//! All state lives behind `Cell`/`RefCell` so one controller can be shared by
//! event handlers on a single-threaded event loop. No borrow is held across
//! an await point.

mod fetch;
mod generation;
mod status;
mod tabs;

pub use fetch::{endpoints_for, fetch_tab, TabData};
pub use generation::{LoadGenerations, LoadToken};
pub use status::{ErrorReport, ErrorSeverity, StatusSurface, REMEDIATION_STEPS};
pub use tabs::{Tab, TabController, Transition, UnknownTab};

use futures_util::future::join_all;
use std::cell::{Cell, Ref, RefCell, RefMut};

use crate::api::{ApiClient, DatasetInfo, Endpoint, Timer, Transport};
use crate::error::{DashboardError, DashboardResult, FetchError};
use crate::filters::{FilterController, FilterState};

/// Receives validated tab data for display
pub trait RenderSink {
    fn render(&self, data: TabData);
}

/// How a load settled when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Data was handed to the sink
    Rendered,
    /// A newer load superseded this one; nothing was rendered
    Stale,
    /// Another apply/reset was still running; the request was ignored
    Busy,
}

// ============ Guards ============

/// Reference-counted loading indicator
struct LoadingGuard<'a, S: StatusSurface> {
    in_flight: &'a Cell<usize>,
    status: &'a S,
}

impl<'a, S: StatusSurface> LoadingGuard<'a, S> {
    fn new(in_flight: &'a Cell<usize>, status: &'a S, message: &str) -> Self {
        let count = in_flight.get();
        if count == 0 {
            status.show_loading(message);
        }
        in_flight.set(count + 1);
        Self { in_flight, status }
    }
}

impl<S: StatusSurface> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        let count = self.in_flight.get().saturating_sub(1);
        self.in_flight.set(count);
        if count == 0 {
            self.status.hide_loading();
        }
    }
}

/// Held while an apply or reset runs
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// ============ Controller ============

/// Dashboard session
pub struct Dashboard<T, C, S> {
    client: ApiClient<T, C>,
    filters: RefCell<FilterController>,
    tabs: RefCell<TabController>,
    generations: LoadGenerations,
    busy: Cell<bool>,
    in_flight: Cell<usize>,
    status: S,
}

impl<T: Transport, C: Timer, S: StatusSurface> Dashboard<T, C, S> {
    pub fn new(client: ApiClient<T, C>, status: S) -> Self {
        Self {
            client,
            filters: RefCell::new(FilterController::new()),
            tabs: RefCell::new(TabController::new()),
            generations: LoadGenerations::new(),
            busy: Cell::new(false),
            in_flight: Cell::new(0),
            status,
        }
    }

    pub fn client(&self) -> &ApiClient<T, C> {
        &self.client
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn active_tab(&self) -> Tab {
        self.tabs.borrow().active()
    }

    pub fn filters(&self) -> Ref<'_, FilterController> {
        self.filters.borrow()
    }

    /// Form bindings edit the inputs through this; drop before awaiting
    pub fn filters_mut(&self) -> RefMut<'_, FilterController> {
        self.filters.borrow_mut()
    }

    /// Whether an apply or reset is in progress
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Whether the loading indicator is showing
    pub fn is_loading(&self) -> bool {
        self.in_flight.get() > 0
    }

    fn loading(&self, message: &str) -> LoadingGuard<'_, S> {
        LoadingGuard::new(&self.in_flight, &self.status, message)
    }

    /// Probe the API, load filter options, then show the overview.
    ///
    /// A failed probe is fatal. Failed filter options are reported and the
    /// dashboard continues unfiltered.
    pub async fn start<R: RenderSink>(&self, sink: &R) -> DashboardResult<LoadOutcome> {
        let _loading = self.loading("Loading dashboard...");
        self.connect().await?;
        self.activate_tab(Tab::Overview, sink).await
    }

    /// Startup sequence without the initial tab load
    pub async fn connect(&self) -> DashboardResult<DatasetInfo> {
        let _loading = self.loading("Connecting...");

        let info = match self.probe().await {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!("Connectivity check failed: {}", err);
                self.status.report(&ErrorReport::connectivity(&err));
                return Err(err);
            }
        };

        if let Err(err) = self.initialize_filters().await {
            tracing::warn!("Continuing without filter options: {}", err);
        }

        Ok(info)
    }

    async fn probe(&self) -> DashboardResult<DatasetInfo> {
        let info = self
            .client
            .dataset_info()
            .await
            .map_err(DashboardError::Connectivity)?;
        tracing::info!(
            "Connected to dataset {} ({} rows, {} columns)",
            info.dataset_name,
            info.rows,
            info.columns
        );
        self.client
            .check(Endpoint::FilterOptions)
            .await
            .map_err(DashboardError::Connectivity)?;
        Ok(info)
    }

    async fn initialize_filters(&self) -> DashboardResult<()> {
        match self.client.filter_options().await {
            Ok(options) => {
                self.filters.borrow_mut().seed(options);
                Ok(())
            }
            Err(e) => {
                self.status.report(&ErrorReport::options_load());
                Err(DashboardError::OptionsLoad(e))
            }
        }
    }

    /// Switch to `tab` and load it. Re-selecting the active tab re-fetches.
    pub async fn activate_tab<R: RenderSink>(
        &self,
        tab: Tab,
        sink: &R,
    ) -> DashboardResult<LoadOutcome> {
        let transition = self.tabs.borrow_mut().activate(tab);
        tracing::debug!("Tab {} -> {}", transition.previous, transition.current);
        self.load_tab(tab, sink).await
    }

    /// Fetch one tab with the current filters and render it if still current.
    ///
    /// Failures are reported with the tab's error severity.
    pub async fn load_tab<R: RenderSink>(&self, tab: Tab, sink: &R) -> DashboardResult<LoadOutcome> {
        let token = self.generations.issue(tab);
        let query = self.filters.borrow().query_string();
        let _loading = self.loading("Loading data...");

        let result = fetch_tab(&self.client, tab, &query).await;

        if !self.generations.is_current(&token) {
            tracing::debug!(
                "Discarding stale {} load (generation {})",
                tab,
                token.generation
            );
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(data) => {
                sink.render(data);
                tracing::info!("Loaded {} tab", tab);
                if tab.error_severity() == ErrorSeverity::Inline {
                    self.status.dismiss_error();
                }
                Ok(LoadOutcome::Rendered)
            }
            Err(e) => {
                tracing::warn!("Failed to load {} tab: {}", tab, e);
                let err = DashboardError::Fetch(e);
                self.status.report(&ErrorReport::for_tab(tab, &err));
                Err(err)
            }
        }
    }

    /// Reload every tab with the current snapshot
    pub async fn load_all<R: RenderSink>(&self, sink: &R) -> DashboardResult<LoadOutcome> {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            return Ok(LoadOutcome::Busy);
        };
        self.load_all_tabs("load data", sink).await
    }

    /// Read the form into the snapshot and reload every tab.
    ///
    /// Ignored while a previous apply or reset is still loading.
    pub async fn apply_filters<R: RenderSink>(&self, sink: &R) -> DashboardResult<LoadOutcome> {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("Apply ignored: a load is already running");
            return Ok(LoadOutcome::Busy);
        };

        let state = self.filters.borrow_mut().apply_from_inputs().clone();
        log_applied(&state);

        self.load_all_tabs("apply filters", sink).await
    }

    /// Restore defaults, re-read the server's LOS bounds and reload every tab
    pub async fn reset_filters<R: RenderSink>(&self, sink: &R) -> DashboardResult<LoadOutcome> {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            return Ok(LoadOutcome::Busy);
        };
        let _loading = self.loading("Resetting filters...");

        let previous = self.filters.borrow_mut().begin_reset();
        if let Err(e) = self.initialize_filters().await {
            self.filters.borrow_mut().restore_inputs(previous);
            return Err(e);
        }
        let state = self.filters.borrow_mut().apply_from_inputs().clone();
        log_applied(&state);

        self.load_all_tabs("reset filters", sink).await
    }

    async fn load_all_tabs<R: RenderSink>(
        &self,
        action: &str,
        sink: &R,
    ) -> DashboardResult<LoadOutcome> {
        let tokens = self.generations.issue_all();
        let query = self.filters.borrow().query_string();
        let _loading = self.loading("Loading data...");

        let query = query.as_str();
        let settled = join_all(tokens.iter().map(|token| async move {
            let result = fetch_tab(&self.client, token.tab, query).await;
            if !self.generations.is_current(token) {
                tracing::debug!("Discarding stale {} load", token.tab);
                return Settled::Stale;
            }
            match result {
                Ok(data) => {
                    sink.render(data);
                    Settled::Rendered
                }
                Err(e) => {
                    tracing::warn!("Failed to load {} tab: {}", token.tab, e);
                    Settled::Failed(e)
                }
            }
        }))
        .await;

        let rendered = settled
            .iter()
            .filter(|s| matches!(s, Settled::Rendered))
            .count();
        // Slots follow Tab::ALL, so the reported error does not depend on timing
        let first_error = settled.into_iter().find_map(|s| match s {
            Settled::Failed(e) => Some(e),
            _ => None,
        });

        if let Some(e) = first_error {
            let err = DashboardError::Fetch(e);
            self.status
                .report(&ErrorReport::for_bulk_load(action, &err));
            return Err(err);
        }

        if rendered == 0 {
            return Ok(LoadOutcome::Stale);
        }

        tracing::info!("Loaded {} tabs", rendered);
        self.status.dismiss_error();
        Ok(LoadOutcome::Rendered)
    }
}

/// How one tab of a bulk load ended
enum Settled {
    Rendered,
    Stale,
    Failed(FetchError),
}

fn log_applied(state: &FilterState) {
    if state.is_unfiltered() {
        tracing::info!("Filters cleared");
    } else {
        tracing::info!("Filters applied: {}", state.to_query_string());
    }
}

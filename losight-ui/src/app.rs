//! App Root Component
//!
//! Builds the controller, provides it to the tree and runs the startup
//! sequence: probe the API, load filter options, show the overview.

use leptos::*;

use losight::dashboard::{Dashboard, Tab};
use losight::render::format_count;

use crate::api::browser_client;
use crate::components::{ErrorPanel, FilterPanel, LoadingOverlay, TabBar, TabPanels};
use crate::state::{provide_ui_state, sync_filters, use_ui, SignalStatus};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let (state, dashboard, sink) =
        provide_ui_state(Dashboard::new(browser_client(), SignalStatus::new()));

    spawn_local(async move {
        match dashboard.connect().await {
            Ok(info) => {
                state.dataset.set(Some(info));
                sync_filters(&dashboard, state);
                let _ = dashboard.activate_tab(Tab::Overview, &*sink).await;
            }
            Err(e) => {
                web_sys::console::error_1(&format!("Dashboard start failed: {}", e).into());
            }
        }
    });

    // Scatter width follows its container
    let (_, _, resize_sink) = use_ui();
    window_event_listener(ev::resize, move |_| resize_sink.redraw_scatter());

    view! {
        <div class="min-h-screen flex flex-col">
            <Header />

            <main class="flex-1 container mx-auto px-4 py-8">
                <ErrorPanel />

                <div class="grid grid-cols-1 lg:grid-cols-4 gap-6">
                    <div class="lg:col-span-1">
                        <FilterPanel />
                    </div>
                    <div class="lg:col-span-3">
                        <TabBar />
                        <TabPanels />
                    </div>
                </div>
            </main>

            <LoadingOverlay />
        </div>
    }
}

/// Title bar with dataset information
#[component]
fn Header() -> impl IntoView {
    let (state, _, _) = use_ui();

    view! {
        <header class="bg-white border-b border-gray-200">
            <div class="container mx-auto px-4 h-16 flex items-center justify-between">
                <div class="flex items-center space-x-3">
                    <span class="text-2xl">"🏥"</span>
                    <span class="text-xl font-bold text-gray-800">"LOSight"</span>
                    <span class="text-gray-500">"Length of Stay Dashboard"</span>
                </div>
                <div id="dataset-info" class="text-sm text-gray-500">
                    {move || {
                        state.dataset.get()
                            .map(|info| format!("{}: {} records", info.dataset_name, format_count(info.rows)))
                            .unwrap_or_else(|| "Connecting...".to_string())
                    }}
                </div>
            </div>
        </header>
    }
}

//! Tab Bar and Panels
//!
//! One button per analysis tab. Every panel's canvases stay mounted so
//! charts from a "load all" land even on hidden tabs.

use leptos::*;

use losight::dashboard::Tab;
use losight::render::{metrics_for, CanvasId};

use crate::state::use_ui;

/// Tab selector
#[component]
pub fn TabBar() -> impl IntoView {
    view! {
        <nav class="flex flex-wrap gap-2 border-b border-gray-200 pb-2 mb-6">
            {Tab::ALL.into_iter().map(|tab| view! { <TabButton tab=tab /> }).collect_view()}
        </nav>
    }
}

#[component]
fn TabButton(tab: Tab) -> impl IntoView {
    let (state, dashboard, sink) = use_ui();

    let on_click = move |_| {
        state.active_tab.set(tab);
        let dashboard = dashboard.clone();
        let sink = sink.clone();
        spawn_local(async move {
            let _ = dashboard.activate_tab(tab, &*sink).await;
        });
    };

    view! {
        <button
            on:click=on_click
            class=move || {
                let base = "px-4 py-2 rounded-lg text-sm font-medium transition-colors";
                if state.active_tab.get() == tab {
                    format!("{} bg-blue-600 text-white", base)
                } else {
                    format!("{} bg-white text-gray-700 hover:bg-gray-100", base)
                }
            }
        >
            {tab.title()}
        </button>
    }
}

/// All tab panels; only the active one is visible
#[component]
pub fn TabPanels() -> impl IntoView {
    view! {
        <div>
            {Tab::ALL.into_iter().map(|tab| view! { <TabPanel tab=tab /> }).collect_view()}
        </div>
    }
}

#[component]
fn TabPanel(tab: Tab) -> impl IntoView {
    let (state, _, _) = use_ui();

    view! {
        <section
            id=format!("{}-tab", tab.name())
            class="space-y-6"
            class:hidden=move || state.active_tab.get() != tab
        >
            <h2 class="text-2xl font-bold text-gray-800">{tab.title()}</h2>

            // Headline metrics
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {move || {
                    state.tab_data.with(|tabs| {
                        tabs.get(&tab).map(metrics_for).unwrap_or_default()
                    })
                    .into_iter()
                    .map(|metric| view! {
                        <div class="bg-white rounded-lg shadow p-4">
                            <div class="text-sm text-gray-500">{metric.label}</div>
                            <div id=metric.element class="text-2xl font-bold text-gray-800">
                                {metric.value}
                            </div>
                        </div>
                    })
                    .collect_view()
                }}
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                {CanvasId::for_tab(tab).iter().map(|canvas| {
                    let wide = *canvas == CanvasId::OutlierScatter;
                    view! {
                        <div class=if wide { "bg-white rounded-xl shadow p-5 lg:col-span-2" } else { "bg-white rounded-xl shadow p-5" }>
                            <canvas id=canvas.dom_id() />
                        </div>
                    }
                }).collect_view()}
            </div>
        </section>
    }
}

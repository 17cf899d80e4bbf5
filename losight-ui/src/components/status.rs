//! Status Components
//!
//! Loading overlay and the dismissible inline error panel.

use leptos::*;

use losight::dashboard::StatusSurface;

use crate::state::use_ui;

/// Full-page overlay shown while any load is in flight
#[component]
pub fn LoadingOverlay() -> impl IntoView {
    let (state, _, _) = use_ui();

    view! {
        {move || {
            state.loading.get().map(|message| view! {
                <div class="fixed inset-0 z-40 bg-gray-900/40 flex items-center justify-center">
                    <div class="bg-white rounded-lg shadow-lg px-6 py-4 flex items-center space-x-3">
                        <div class="loading-spinner w-6 h-6" />
                        <span class="text-gray-700 font-medium">{message}</span>
                    </div>
                </div>
            })
        }}
    }
}

/// Inline error with remediation steps
#[component]
pub fn ErrorPanel() -> impl IntoView {
    let (state, dashboard, _) = use_ui();

    view! {
        {move || {
            let dashboard = dashboard.clone();
            state.error.get().map(|report| view! {
                <div class="bg-red-50 border border-red-300 text-red-800 rounded-lg p-4 mb-6">
                    <div class="flex items-start justify-between">
                        <h3 class="font-semibold">{report.title.clone()}</h3>
                        <button
                            class="text-red-600 hover:text-red-800"
                            on:click=move |_| dashboard.status().dismiss_error()
                        >
                            "✕"
                        </button>
                    </div>
                    <p class="mt-1 text-sm">{report.message.clone()}</p>
                    <ul class="mt-3 list-disc list-inside text-sm">
                        {report.remediation.iter().map(|step| view! {
                            <li>{step.clone()}</li>
                        }).collect_view()}
                    </ul>
                </div>
            })
        }}
    }
}

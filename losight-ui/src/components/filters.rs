//! Filter Sidebar
//!
//! Four selectors, the LOS range inputs and the apply/reset buttons.

use leptos::*;

use losight::dashboard::LoadOutcome;
use losight::filters::{FilterInputs, SelectChoices, SelectOption};

use crate::state::{push_inputs, sync_filters, use_ui};

#[derive(Clone, Copy)]
enum Field {
    Severity,
    Payment,
    Admission,
    Drg,
    LosMin,
    LosMax,
}

impl Field {
    fn get(self, inputs: &FilterInputs) -> String {
        match self {
            Field::Severity => inputs.severity.clone(),
            Field::Payment => inputs.payment.clone(),
            Field::Admission => inputs.admission.clone(),
            Field::Drg => inputs.drg.clone(),
            Field::LosMin => inputs.los_min.clone(),
            Field::LosMax => inputs.los_max.clone(),
        }
    }

    fn set(self, inputs: &mut FilterInputs, value: String) {
        match self {
            Field::Severity => inputs.severity = value,
            Field::Payment => inputs.payment = value,
            Field::Admission => inputs.admission = value,
            Field::Drg => inputs.drg = value,
            Field::LosMin => inputs.los_min = value,
            Field::LosMax => inputs.los_max = value,
        }
    }

    fn choices(self, choices: &SelectChoices) -> Vec<SelectOption> {
        match self {
            Field::Severity => choices.severity.clone(),
            Field::Payment => choices.payment.clone(),
            Field::Admission => choices.admission.clone(),
            Field::Drg => choices.drg.clone(),
            Field::LosMin | Field::LosMax => Vec::new(),
        }
    }
}

/// Filter controls
#[component]
pub fn FilterPanel() -> impl IntoView {
    let (state, dashboard, sink) = use_ui();

    let apply_dashboard = dashboard.clone();
    let apply_sink = sink.clone();
    let on_apply = move |_| {
        let dashboard = apply_dashboard.clone();
        let sink = apply_sink.clone();
        push_inputs(&dashboard, state);
        spawn_local(async move {
            if let Ok(LoadOutcome::Busy) = dashboard.apply_filters(&*sink).await {
                web_sys::console::log_1(&"Apply ignored; a load is already running".into());
            }
        });
    };

    let on_reset = move |_| {
        let dashboard = dashboard.clone();
        let sink = sink.clone();
        spawn_local(async move {
            let _ = dashboard.reset_filters(&*sink).await;
            sync_filters(&dashboard, state);
        });
    };

    view! {
        <aside class="bg-white rounded-xl shadow p-6 space-y-4">
            <h2 class="text-lg font-semibold text-gray-800">"Filters"</h2>

            <FilterSelect label="Severity" id="severity-filter" field=Field::Severity />
            <FilterSelect label="Payment Type" id="payment-filter" field=Field::Payment />
            <FilterSelect label="Admission Type" id="admission-filter" field=Field::Admission />
            <FilterSelect label="DRG" id="drg-filter" field=Field::Drg />

            <div class="grid grid-cols-2 gap-3">
                <LosInput label="Min LOS" id="los-min" field=Field::LosMin />
                <LosInput label="Max LOS" id="los-max" field=Field::LosMax />
            </div>

            <div class="flex space-x-2 pt-2">
                <button
                    id="apply-filters"
                    on:click=on_apply
                    class="flex-1 px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium transition-colors"
                >
                    "Apply Filters"
                </button>
                <button
                    id="reset-filters"
                    on:click=on_reset
                    class="flex-1 px-4 py-2 bg-gray-200 hover:bg-gray-300 text-gray-800 rounded-lg font-medium transition-colors"
                >
                    "Reset"
                </button>
            </div>
        </aside>
    }
}

#[component]
fn FilterSelect(label: &'static str, id: &'static str, field: Field) -> impl IntoView {
    let (state, _, _) = use_ui();

    view! {
        <label class="block">
            <span class="text-sm text-gray-600">{label}</span>
            <select
                id=id
                class="mt-1 block w-full rounded-lg border-gray-300 bg-gray-50 px-3 py-2"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    state.inputs.update(|inputs| field.set(inputs, value));
                }
                prop:value=move || state.inputs.with(|inputs| field.get(inputs))
            >
                {move || {
                    state.choices.with(|choices| field.choices(choices))
                        .into_iter()
                        .map(|option| view! {
                            <option value=option.value>{option.label}</option>
                        })
                        .collect_view()
                }}
            </select>
        </label>
    }
}

#[component]
fn LosInput(label: &'static str, id: &'static str, field: Field) -> impl IntoView {
    let (state, _, _) = use_ui();

    view! {
        <label class="block">
            <span class="text-sm text-gray-600">{label}</span>
            <input
                id=id
                type="number"
                min="0"
                class="mt-1 block w-full rounded-lg border-gray-300 bg-gray-50 px-3 py-2"
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    state.inputs.update(|inputs| field.set(inputs, value));
                }
                prop:value=move || state.inputs.with(|inputs| field.get(inputs))
            />
        </label>
    }
}

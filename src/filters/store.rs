//! Filter State Store
//!
//! Owns the [`FilterState`] snapshot, the UI-bound input values it is read
//! from, and the option lists loaded from the server.

use serde::{Deserialize, Serialize};

use super::query::{format_bound, FilterState, Selector, ALL};
use crate::api::{FilterOptions, Label};

/// Current values of the filter form controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterInputs {
    pub severity: String,
    pub payment: String,
    pub admission: String,
    pub drg: String,
    pub los_min: String,
    pub los_max: String,
}

impl Default for FilterInputs {
    fn default() -> Self {
        Self {
            severity: ALL.to_string(),
            payment: ALL.to_string(),
            admission: ALL.to_string(),
            drg: ALL.to_string(),
            los_min: String::new(),
            los_max: String::new(),
        }
    }
}

/// One `<option>` of a selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn all(label: &str) -> Self {
        Self {
            value: ALL.to_string(),
            label: label.to_string(),
        }
    }
}

/// Option lists for the four selectors, `"all"` first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectChoices {
    pub severity: Vec<SelectOption>,
    pub payment: Vec<SelectOption>,
    pub admission: Vec<SelectOption>,
    pub drg: Vec<SelectOption>,
}

impl SelectChoices {
    fn from_options(options: &FilterOptions) -> Self {
        fn build(all: &str, values: &[Label], label: impl Fn(&Label) -> String) -> Vec<SelectOption> {
            std::iter::once(SelectOption::all(all))
                .chain(values.iter().map(|v| SelectOption {
                    value: v.to_string(),
                    label: label(v),
                }))
                .collect()
        }

        Self {
            severity: build("All Severities", &options.severity, |v| format!("Severity {}", v)),
            payment: build("All Payment Types", &options.payment, |v| v.to_string()),
            admission: build("All Admission Types", &options.admission, |v| v.to_string()),
            drg: build("All DRGs", &options.drg, |v| format!("DRG {}", v)),
        }
    }
}

/// Filter controller: the only place filter state is mutated
#[derive(Debug, Clone, Default)]
pub struct FilterController {
    state: FilterState,
    inputs: FilterInputs,
    options: Option<FilterOptions>,
    choices: SelectChoices,
}

impl FilterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn inputs(&self) -> &FilterInputs {
        &self.inputs
    }

    /// Form controls write through this while the user edits
    pub fn inputs_mut(&mut self) -> &mut FilterInputs {
        &mut self.inputs
    }

    pub fn options(&self) -> Option<&FilterOptions> {
        self.options.as_ref()
    }

    pub fn choices(&self) -> &SelectChoices {
        &self.choices
    }

    /// Query string for the current snapshot
    pub fn query_string(&self) -> String {
        self.state.to_query_string()
    }

    /// Install freshly loaded options.
    ///
    /// Option lists are replaced, the LOS inputs and the snapshot's bounds
    /// take the server's range, and selector inputs are left as they are.
    pub fn seed(&mut self, options: FilterOptions) {
        self.choices = SelectChoices::from_options(&options);
        self.inputs.los_min = format_bound(options.los.min);
        self.inputs.los_max = format_bound(options.los.max);
        self.state.los_min = Some(options.los.min);
        self.state.los_max = Some(options.los.max);
        tracing::debug!(
            "Filter options loaded: {} severities, {} payment types, {} admission types, {} DRGs",
            options.severity.len(),
            options.payment.len(),
            options.admission.len(),
            options.drg.len()
        );
        self.options = Some(options);
    }

    /// Copy the form values into the snapshot
    pub fn apply_from_inputs(&mut self) -> &FilterState {
        self.state = FilterState {
            severity: Selector::parse(&self.inputs.severity),
            payment: Selector::parse(&self.inputs.payment),
            admission: Selector::parse(&self.inputs.admission),
            drg: Selector::parse(&self.inputs.drg),
            los_min: parse_bound(&self.inputs.los_min),
            los_max: parse_bound(&self.inputs.los_max),
        };
        &self.state
    }

    /// Put every selector back to `"all"`, returning the previous inputs.
    ///
    /// The LOS bounds are re-seeded from the server next; if that fails the
    /// caller hands the returned inputs to [`Self::restore_inputs`] so the
    /// form keeps matching the snapshot.
    pub fn begin_reset(&mut self) -> FilterInputs {
        let previous = self.inputs.clone();
        self.inputs.severity = ALL.to_string();
        self.inputs.payment = ALL.to_string();
        self.inputs.admission = ALL.to_string();
        self.inputs.drg = ALL.to_string();
        previous
    }

    pub fn restore_inputs(&mut self, inputs: FilterInputs) {
        self.inputs = inputs;
    }
}

/// Empty or unparseable text means no bound
fn parse_bound(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

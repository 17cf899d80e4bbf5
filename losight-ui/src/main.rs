//! LOSight Dashboard
//!
//! Hospital length-of-stay dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Filter sidebar driving every analysis tab
//! - Chart.js bar charts and a canvas-drawn outlier scatter
//! - Loading overlay and inline error panel
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Filter state, fetch orchestration and chart data come from
//! the `losight` core; this crate supplies the browser transport, the canvas
//! and Chart.js bindings, and the components.

use leptos::*;

mod api;
mod app;
mod charts;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}

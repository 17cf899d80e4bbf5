//! Filters
//!
//! Filter selections ([`FilterState`]), their query-string encoding, and the
//! controller that owns them for the lifetime of a dashboard session.

mod query;
mod store;

pub use query::{format_bound, FilterState, Selector, ALL};
pub use store::{FilterController, FilterInputs, SelectChoices, SelectOption};

//! Load Generations
//!
//! Every load is stamped with a monotonically increasing generation. Each
//! tab remembers the newest generation issued for it; a response carrying an
//! older stamp is stale and must not overwrite what a newer load rendered.

use std::cell::Cell;

use super::tabs::Tab;

/// Stamp carried by one in-flight tab load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    pub tab: Tab,
    pub generation: u64,
}

/// Generation counter plus the latest stamp per tab
#[derive(Debug, Default)]
pub struct LoadGenerations {
    counter: Cell<u64>,
    latest: [Cell<u64>; 6],
}

impl LoadGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u64 {
        let generation = self.counter.get() + 1;
        self.counter.set(generation);
        generation
    }

    /// Stamp a load of one tab
    pub fn issue(&self, tab: Tab) -> LoadToken {
        let generation = self.next();
        self.latest[tab.slot()].set(generation);
        LoadToken { tab, generation }
    }

    /// Stamp a load of every tab with one shared generation
    pub fn issue_all(&self) -> Vec<LoadToken> {
        let generation = self.next();
        Tab::ALL
            .into_iter()
            .map(|tab| {
                self.latest[tab.slot()].set(generation);
                LoadToken { tab, generation }
            })
            .collect()
    }

    /// Whether no newer load of the same tab has been issued since
    pub fn is_current(&self, token: &LoadToken) -> bool {
        self.latest[token.tab.slot()].get() == token.generation
    }

    /// Most recently issued generation
    pub fn current(&self) -> u64 {
        self.counter.get()
    }
}

//! Chart Instance Registry
//!
//! At most one live chart per canvas. A new chart on a canvas destroys the
//! previous one first.

use std::collections::HashMap;

use super::charts::CanvasId;

/// A live chart that owns resources on its canvas
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// Live charts keyed by canvas
pub struct ChartRegistry<H: ChartHandle> {
    live: HashMap<CanvasId, H>,
}

impl<H: ChartHandle> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
        }
    }
}

impl<H: ChartHandle> ChartRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy the chart bound to `canvas`, if any
    pub fn release(&mut self, canvas: CanvasId) -> bool {
        match self.live.remove(&canvas) {
            Some(mut handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }

    /// Release `canvas`, then bind the chart produced by `create`.
    ///
    /// If `create` fails the canvas is left empty.
    pub fn replace<E>(
        &mut self,
        canvas: CanvasId,
        create: impl FnOnce() -> Result<H, E>,
    ) -> Result<(), E> {
        self.release(canvas);
        let handle = create()?;
        self.live.insert(canvas, handle);
        Ok(())
    }

    pub fn contains(&self, canvas: CanvasId) -> bool {
        self.live.contains_key(&canvas)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Destroy every live chart
    pub fn clear(&mut self) {
        for (_, mut handle) in self.live.drain() {
            handle.destroy();
        }
    }
}

impl<H: ChartHandle> Drop for ChartRegistry<H> {
    fn drop(&mut self) {
        self.clear();
    }
}

//! Cached target geometry.
//!
//! The tracker never computes geometry itself; every refresh is a fresh read
//! of the target's bounding box. A `None` read means the target left the
//! document, which the controller treats as an implicit dismiss.

use imgresize_core::{OverlayRect, VisualTarget};

#[derive(Debug, Clone, Default)]
pub struct GeometryTracker {
    current: Option<OverlayRect>,
    refreshes: u64,
}

impl GeometryTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read the target's bounding box.
    pub fn refresh<T: VisualTarget + ?Sized>(&mut self, target: &T) -> Option<OverlayRect> {
        self.refreshes += 1;
        self.current = target.bounding_box();
        self.current
    }

    /// Last observed rect, if the target was attached at the last refresh.
    #[must_use]
    pub fn current(&self) -> Option<OverlayRect> {
        self.current
    }

    #[must_use]
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

#![forbid(unsafe_code)]

//! In-memory [`VisualTarget`] for tests, replay, and headless hosts.
//!
//! Rendered size follows a simplified box model:
//!
//! - explicit inline size wins;
//! - otherwise an active size preset sets the width to that percentage of the
//!   container width and derives the height from the intrinsic aspect ratio;
//! - otherwise the intrinsic size is used.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::{OverlayRect, Point, Size};
use crate::style::SizePreset;
use crate::target::VisualTarget;

/// Default containing-block width used to resolve percentage presets.
pub const DEFAULT_CONTAINER_WIDTH: u32 = 720;

/// A detached-from-any-renderer image node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTarget {
    origin: Point,
    intrinsic: Size,
    explicit: Option<Size>,
    classes: BTreeSet<String>,
    container_width: u32,
    attached: bool,
    #[serde(default)]
    writes: u64,
}

impl MemoryTarget {
    /// Create an attached target at the viewport origin.
    #[must_use]
    pub fn new(intrinsic: Size) -> Self {
        Self {
            origin: Point::default(),
            intrinsic,
            explicit: None,
            classes: BTreeSet::new(),
            container_width: DEFAULT_CONTAINER_WIDTH,
            attached: true,
            writes: 0,
        }
    }

    /// Place the target's top-left corner.
    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Set the containing-block width used by percentage presets.
    #[must_use]
    pub fn with_container_width(mut self, width: u32) -> Self {
        self.container_width = width;
        self
    }

    /// Move the target, as if the host scrolled.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Active class tokens in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Number of size/class writes applied so far.
    #[must_use]
    pub const fn writes(&self) -> u64 {
        self.writes
    }

    fn active_preset(&self) -> Option<SizePreset> {
        SizePreset::ALL
            .into_iter()
            .find(|preset| self.classes.contains(preset.class_name()))
    }
}

impl VisualTarget for MemoryTarget {
    fn bounding_box(&self) -> Option<OverlayRect> {
        if !self.attached {
            return None;
        }
        let size = self.size();
        Some(OverlayRect::new(
            self.origin.y,
            self.origin.x,
            f64::from(size.width),
            f64::from(size.height),
        ))
    }

    fn size(&self) -> Size {
        if let Some(explicit) = self.explicit {
            return explicit;
        }
        match self.active_preset() {
            Some(preset) => {
                let width = self.container_width.saturating_mul(preset.percent()) / 100;
                let height = (f64::from(width) / self.intrinsic.aspect_ratio()).round() as u32;
                Size::new(width, height)
            }
            None => self.intrinsic,
        }
    }

    fn explicit_size(&self) -> Option<Size> {
        self.explicit
    }

    fn set_size(&mut self, size: Size) {
        self.explicit = Some(size);
        self.writes += 1;
    }

    fn clear_size(&mut self) {
        if self.explicit.take().is_some() {
            self.writes += 1;
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn add_class(&mut self, class: &str) {
        if self.classes.insert(class.to_owned()) {
            self.writes += 1;
        }
    }

    fn remove_class(&mut self, class: &str) {
        if self.classes.remove(class) {
            self.writes += 1;
        }
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_size_wins_over_preset() {
        let mut t = MemoryTarget::new(Size::new(400, 200));
        t.add_class(SizePreset::Medium.class_name());
        assert_eq!(t.size(), Size::new(360, 180));
        t.set_size(Size::new(100, 50));
        assert_eq!(t.size(), Size::new(100, 50));
    }

    #[test]
    fn preset_on_zero_width_image_stays_square() {
        let mut t = MemoryTarget::new(Size::new(0, 100));
        t.add_class(SizePreset::Medium.class_name());
        assert_eq!(t.size(), Size::new(360, 360));
    }

    #[test]
    fn bounding_box_tracks_origin_and_size() {
        let t = MemoryTarget::new(Size::new(200, 100)).with_origin(Point::new(30.0, 40.0));
        assert_eq!(
            t.bounding_box(),
            Some(OverlayRect::new(40.0, 30.0, 200.0, 100.0))
        );
    }

    #[test]
    fn detached_target_has_no_geometry() {
        let mut t = MemoryTarget::new(Size::new(10, 10));
        t.detach();
        assert!(!t.is_attached());
        assert_eq!(t.bounding_box(), None);
    }

    #[test]
    fn writes_count_only_real_changes() {
        let mut t = MemoryTarget::new(Size::new(10, 10));
        t.remove_class("missing");
        t.clear_size();
        assert_eq!(t.writes(), 0);
        t.add_class("align-left");
        t.add_class("align-left");
        assert_eq!(t.writes(), 1);
    }
}

//! Drag-resize math for one gesture.
//!
//! A [`ResizeSession`] is captured at pointer-down on a handle and maps every
//! later pointer position to a new target size. It holds no reference to the
//! target; the caller applies the returned [`Size`].
//!
//! # Rules
//!
//! With `dx = x - start_x` and `dy = y - start_y`:
//!
//! - handles containing `e`: `width = start_width + dx`
//! - handles containing `w`: `width = start_width - dx`
//! - handles containing `s`: `height = start_height + dy`
//! - handles containing `n`: `height = start_height - dy`
//!
//! Corner handles keep the start aspect ratio. The dominant axis is picked by
//! comparing raw pixel deltas: if `|dx| > |dy|` the height follows the width,
//! otherwise the width follows the height (ties go to height).
//!
//! Every dimension the handle drives is rounded and clamped to
//! [`SizeLimits`]. Edge handles leave the orthogonal dimension exactly at its
//! start value.

use imgresize_core::geometry::{Point, Size};
use imgresize_core::{MIN_HEIGHT, MIN_WIDTH};
use serde::{Deserialize, Serialize};

use crate::handle::HandleId;

/// Lower bounds for sizes produced by a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        }
    }
}

/// Transient state between drag-start and drag-end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeSession {
    pub handle: HandleId,
    pub start_pointer: Point,
    pub start_size: Size,
    /// `start_size.width / start_size.height`, or `1.0` for a zero height.
    pub aspect_ratio: f64,
}

impl ResizeSession {
    /// Capture a session from the target's size at pointer-down.
    #[must_use]
    pub fn begin(handle: HandleId, start_pointer: Point, start_size: Size) -> Self {
        Self {
            handle,
            start_pointer,
            start_size,
            aspect_ratio: start_size.aspect_ratio(),
        }
    }

    /// Pointer travel since the gesture started.
    #[must_use]
    pub fn delta(&self, pointer: Point) -> (f64, f64) {
        (
            pointer.x - self.start_pointer.x,
            pointer.y - self.start_pointer.y,
        )
    }

    /// Size for the given pointer position.
    #[must_use]
    pub fn size_at(&self, pointer: Point, limits: SizeLimits) -> Size {
        let (dx, dy) = self.delta(pointer);
        let mut width = f64::from(self.start_size.width);
        let mut height = f64::from(self.start_size.height);

        match self.handle.horizontal_edge() {
            Some(true) => width += dx,
            Some(false) => width -= dx,
            None => {}
        }
        match self.handle.vertical_edge() {
            Some(true) => height += dy,
            Some(false) => height -= dy,
            None => {}
        }

        if self.handle.is_corner() {
            if dx.abs() > dy.abs() {
                height = width / self.aspect_ratio;
            } else {
                width = height * self.aspect_ratio;
            }
        }

        Size::new(
            if self.handle.horizontal_edge().is_some() {
                clamp_dimension(width, limits.min_width)
            } else {
                self.start_size.width
            },
            if self.handle.vertical_edge().is_some() {
                clamp_dimension(height, limits.min_height)
            } else {
                self.start_size.height
            },
        )
    }
}

/// Round to whole pixels and enforce the minimum.
///
/// Float-to-int `as` casts saturate, so negative and NaN values land on 0 and
/// are then lifted to `min`.
fn clamp_dimension(value: f64, min: u32) -> u32 {
    (value.round() as u32).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(handle: HandleId, start: Size, dx: f64, dy: f64) -> Size {
        let origin = Point::new(500.0, 500.0);
        ResizeSession::begin(handle, origin, start)
            .size_at(Point::new(origin.x + dx, origin.y + dy), SizeLimits::default())
    }

    #[test]
    fn se_corner_width_dominant() {
        assert_eq!(drag(HandleId::Se, Size::new(200, 100), 50.0, 10.0), Size::new(250, 125));
    }

    #[test]
    fn se_corner_height_dominant() {
        assert_eq!(drag(HandleId::Se, Size::new(200, 100), 10.0, 50.0), Size::new(300, 150));
    }

    #[test]
    fn equal_deltas_follow_height() {
        assert_eq!(drag(HandleId::Se, Size::new(200, 100), 20.0, 20.0), Size::new(240, 120));
    }

    #[test]
    fn nw_corner_grows_against_pointer() {
        assert_eq!(drag(HandleId::Nw, Size::new(200, 100), -40.0, -5.0), Size::new(240, 120));
    }

    #[test]
    fn west_edge_shrink_clamps_width_only() {
        assert_eq!(drag(HandleId::W, Size::new(40, 40), 1000.0, 0.0), Size::new(48, 40));
    }

    #[test]
    fn north_edge_ignores_horizontal_travel() {
        assert_eq!(drag(HandleId::N, Size::new(300, 200), 75.0, -30.0), Size::new(300, 230));
    }

    #[test]
    fn zero_height_uses_square_ratio() {
        let session = ResizeSession::begin(HandleId::Se, Point::default(), Size::new(120, 0));
        assert_eq!(session.aspect_ratio, 1.0);
        assert_eq!(
            session.size_at(Point::new(30.0, 0.0), SizeLimits::default()),
            Size::new(150, 150)
        );
    }

    #[test]
    fn zero_width_uses_square_ratio() {
        let session = ResizeSession::begin(HandleId::Se, Point::default(), Size::new(0, 100));
        assert_eq!(session.aspect_ratio, 1.0);
        assert_eq!(
            session.size_at(Point::new(100.0, 10.0), SizeLimits::default()),
            Size::new(100, 100)
        );
    }

    #[test]
    fn fractional_results_round() {
        assert_eq!(drag(HandleId::E, Size::new(100, 100), 10.4, 0.0), Size::new(110, 100));
        assert_eq!(drag(HandleId::E, Size::new(100, 100), 10.6, 0.0), Size::new(111, 100));
    }

    #[test]
    fn no_movement_keeps_start_size() {
        for id in HandleId::ALL {
            assert_eq!(drag(id, Size::new(200, 100), 0.0, 0.0), Size::new(200, 100), "{id}");
        }
    }
}

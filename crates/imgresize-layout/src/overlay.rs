//! Overlay placement for resize handles and the floating toolbar.
//!
//! [`render`] is a pure function of the target rectangle, the viewport, and
//! fixed [`OverlayMetrics`]. The overlay lives outside normal document flow,
//! so every output is in viewport coordinates.
//!
//! # Toolbar placement
//!
//! - Horizontally centered over the target.
//! - Prefers sitting above the target with a `padding` gap; flips below when
//!   the preferred position would cross the top of the viewport.
//! - The left edge is clamped into
//!   `[padding, viewport.width - toolbar_width - padding]`. On viewports
//!   narrower than the toolbar the lower bound wins.

use std::fmt;

use imgresize_core::geometry::{OverlayRect, Point, Viewport};
use serde::{Deserialize, Serialize};

use crate::handle::{HANDLES, HandleId, HorizontalAnchor, VerticalAnchor};

/// Fixed sizes for overlay layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayMetrics {
    /// Edge length of a square handle.
    pub handle_size: f64,
    pub toolbar_width: f64,
    pub toolbar_height: f64,
    /// Gap between target and toolbar, and minimum distance from viewport edges.
    pub padding: f64,
}

impl Default for OverlayMetrics {
    fn default() -> Self {
        Self {
            handle_size: 10.0,
            toolbar_width: 280.0,
            toolbar_height: 40.0,
            padding: 8.0,
        }
    }
}

impl OverlayMetrics {
    /// Reject non-finite or non-positive dimensions.
    pub fn validate(&self) -> Result<(), OverlayMetricsError> {
        let positive = [
            ("handle_size", self.handle_size),
            ("toolbar_width", self.toolbar_width),
            ("toolbar_height", self.toolbar_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(OverlayMetricsError::NonPositive { field, value });
            }
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(OverlayMetricsError::NegativePadding {
                value: self.padding,
            });
        }
        Ok(())
    }

    #[inline]
    fn half_handle(&self) -> f64 {
        self.handle_size / 2.0
    }
}

/// Invalid overlay metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayMetricsError {
    NonPositive { field: &'static str, value: f64 },
    NegativePadding { value: f64 },
}

impl fmt::Display for OverlayMetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be a finite value > 0 (got {value})")
            }
            Self::NegativePadding { value } => {
                write!(f, "padding must be a finite value >= 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for OverlayMetricsError {}

/// One positioned handle square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandlePlacement {
    pub id: HandleId,
    pub cursor: &'static str,
    /// Offset of the square's top-left corner relative to the target rect.
    pub offset: Point,
    /// Square in viewport coordinates.
    pub rect: OverlayRect,
}

/// Which side of the target the toolbar ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarSide {
    Above,
    Below,
}

/// Positioned floating toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToolbarPlacement {
    pub rect: OverlayRect,
    pub side: ToolbarSide,
}

/// Result of classifying a pointer position against the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "hit", content = "handle", rename_all = "snake_case")]
pub enum OverlayHit {
    Handle(HandleId),
    Toolbar,
    Target,
    Outside,
}

/// Everything the host needs to paint the overlay for one target rect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub target: OverlayRect,
    pub handles: [HandlePlacement; 8],
    pub toolbar: ToolbarPlacement,
}

impl OverlayFrame {
    /// Placement of one handle.
    #[must_use]
    pub fn handle(&self, id: HandleId) -> &HandlePlacement {
        // Placements are built in `HANDLES` order.
        let index = HANDLES
            .iter()
            .position(|d| d.id == id)
            .unwrap_or_default();
        &self.handles[index]
    }

    /// Classify a pointer position. Handles win over the toolbar, and both
    /// win over the target itself, since handles straddle the target's edges.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> OverlayHit {
        if let Some(placement) = self.handles.iter().find(|h| h.rect.contains(point)) {
            return OverlayHit::Handle(placement.id);
        }
        if self.toolbar.rect.contains(point) {
            return OverlayHit::Toolbar;
        }
        if self.target.contains(point) {
            return OverlayHit::Target;
        }
        OverlayHit::Outside
    }
}

/// Lay out handles and toolbar for `rect`.
#[must_use]
pub fn render(rect: OverlayRect, viewport: Viewport, metrics: &OverlayMetrics) -> OverlayFrame {
    let handles = HANDLES.map(|descriptor| {
        let offset = handle_offset(
            descriptor.horizontal,
            descriptor.vertical,
            rect,
            metrics.half_handle(),
        );
        HandlePlacement {
            id: descriptor.id,
            cursor: descriptor.cursor,
            offset,
            rect: OverlayRect::new(
                rect.top + offset.y,
                rect.left + offset.x,
                metrics.handle_size,
                metrics.handle_size,
            ),
        }
    });

    OverlayFrame {
        target: rect,
        handles,
        toolbar: place_toolbar(rect, viewport, metrics),
    }
}

fn handle_offset(
    horizontal: HorizontalAnchor,
    vertical: VerticalAnchor,
    rect: OverlayRect,
    half: f64,
) -> Point {
    let x = match horizontal {
        HorizontalAnchor::Left => -half,
        HorizontalAnchor::Center => rect.width / 2.0 - half,
        HorizontalAnchor::Right => rect.width - half,
    };
    let y = match vertical {
        VerticalAnchor::Top => -half,
        VerticalAnchor::Center => rect.height / 2.0 - half,
        VerticalAnchor::Bottom => rect.height - half,
    };
    Point::new(x, y)
}

fn place_toolbar(
    rect: OverlayRect,
    viewport: Viewport,
    metrics: &OverlayMetrics,
) -> ToolbarPlacement {
    let above = rect.top - metrics.toolbar_height - metrics.padding;
    let (top, side) = if above < 0.0 {
        (rect.bottom() + metrics.padding, ToolbarSide::Below)
    } else {
        (above, ToolbarSide::Above)
    };

    let centered = rect.center_x() - metrics.toolbar_width / 2.0;
    let left = clamp_left(centered, metrics.toolbar_width, viewport, metrics.padding);

    ToolbarPlacement {
        rect: OverlayRect::new(top, left, metrics.toolbar_width, metrics.toolbar_height),
        side,
    }
}

/// Clamp the toolbar's left edge so it doesn't overflow the viewport.
fn clamp_left(left: f64, width: f64, viewport: Viewport, padding: f64) -> f64 {
    let max = viewport.width - width - padding;
    left.min(max).max(padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1024.0, 768.0)
    }

    #[test]
    fn corner_and_edge_offsets() {
        let rect = OverlayRect::new(100.0, 200.0, 120.0, 60.0);
        let frame = render(rect, viewport(), &OverlayMetrics::default());
        assert_eq!(frame.handle(HandleId::Nw).offset, Point::new(-5.0, -5.0));
        assert_eq!(frame.handle(HandleId::Se).offset, Point::new(115.0, 55.0));
        assert_eq!(frame.handle(HandleId::N).offset, Point::new(55.0, -5.0));
        assert_eq!(frame.handle(HandleId::W).offset, Point::new(-5.0, 25.0));
        assert_eq!(
            frame.handle(HandleId::Se).rect,
            OverlayRect::new(155.0, 315.0, 10.0, 10.0)
        );
    }

    #[test]
    fn toolbar_prefers_above_centered() {
        let rect = OverlayRect::new(200.0, 300.0, 400.0, 100.0);
        let toolbar = render(rect, viewport(), &OverlayMetrics::default()).toolbar;
        assert_eq!(toolbar.side, ToolbarSide::Above);
        assert_eq!(toolbar.rect.top, 152.0);
        assert_eq!(toolbar.rect.left, 360.0);
    }

    #[test]
    fn toolbar_flips_below_near_viewport_top() {
        let rect = OverlayRect::new(30.0, 300.0, 400.0, 100.0);
        let toolbar = render(rect, viewport(), &OverlayMetrics::default()).toolbar;
        assert_eq!(toolbar.side, ToolbarSide::Below);
        assert_eq!(toolbar.rect.top, 138.0);
    }

    #[test]
    fn toolbar_exactly_at_top_stays_above() {
        let rect = OverlayRect::new(48.0, 300.0, 100.0, 100.0);
        let toolbar = render(rect, viewport(), &OverlayMetrics::default()).toolbar;
        assert_eq!(toolbar.side, ToolbarSide::Above);
        assert_eq!(toolbar.rect.top, 0.0);
    }

    #[test]
    fn toolbar_clamped_to_both_edges() {
        let metrics = OverlayMetrics::default();
        let left_edge = render(OverlayRect::new(300.0, 0.0, 50.0, 50.0), viewport(), &metrics);
        assert_eq!(left_edge.toolbar.rect.left, 8.0);

        let right_edge = render(OverlayRect::new(300.0, 990.0, 30.0, 50.0), viewport(), &metrics);
        assert_eq!(right_edge.toolbar.rect.left, 1024.0 - 280.0 - 8.0);
    }

    #[test]
    fn narrow_viewport_pins_toolbar_to_padding() {
        let toolbar = render(
            OverlayRect::new(300.0, 40.0, 100.0, 50.0),
            Viewport::new(200.0, 600.0),
            &OverlayMetrics::default(),
        )
        .toolbar;
        assert_eq!(toolbar.rect.left, 8.0);
    }

    #[test]
    fn hit_test_priorities() {
        let rect = OverlayRect::new(200.0, 200.0, 200.0, 100.0);
        let frame = render(rect, viewport(), &OverlayMetrics::default());
        assert_eq!(frame.hit_test(Point::new(400.0, 300.0)), OverlayHit::Handle(HandleId::Se));
        assert_eq!(frame.hit_test(Point::new(197.0, 250.0)), OverlayHit::Handle(HandleId::W));
        assert_eq!(frame.hit_test(Point::new(250.0, 250.0)), OverlayHit::Target);
        assert_eq!(frame.hit_test(Point::new(300.0, 170.0)), OverlayHit::Toolbar);
        assert_eq!(frame.hit_test(Point::new(10.0, 10.0)), OverlayHit::Outside);
    }

    #[test]
    fn metrics_validation() {
        assert!(OverlayMetrics::default().validate().is_ok());
        let bad = OverlayMetrics {
            handle_size: 0.0,
            ..OverlayMetrics::default()
        };
        assert_eq!(
            bad.validate(),
            Err(OverlayMetricsError::NonPositive {
                field: "handle_size",
                value: 0.0
            })
        );
        let bad_padding = OverlayMetrics {
            padding: f64::NAN,
            ..OverlayMetrics::default()
        };
        assert!(bad_padding.validate().is_err());
    }
}

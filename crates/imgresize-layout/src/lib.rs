#![forbid(unsafe_code)]

//! Layout for the image resize overlay.
//!
//! # Role in imgresize
//! `imgresize-layout` is pure math over `imgresize-core` geometry: nothing here
//! touches a target or holds interaction state beyond a single gesture.
//!
//! - [`handle`]: the eight fixed resize handle descriptors.
//! - [`overlay`]: handle squares and the floating toolbar, clamped to the
//!   viewport, plus hit-testing against that frame.
//! - [`resize`]: pointer-delta interpretation, corner aspect lock, and
//!   minimum-size clamping for one drag gesture.

pub mod handle;
pub mod overlay;
pub mod resize;

pub use handle::{HANDLES, HandleDescriptor, HandleId, HorizontalAnchor, VerticalAnchor};
pub use overlay::{
    HandlePlacement, OverlayFrame, OverlayHit, OverlayMetrics, OverlayMetricsError,
    ToolbarPlacement, ToolbarSide, render,
};
pub use resize::{ResizeSession, SizeLimits};

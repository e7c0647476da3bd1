#![forbid(unsafe_code)]

//! Core: geometry, the target capability interface, style classes, and host events.
//!
//! # Role in imgresize
//! `imgresize-core` is the vocabulary layer. It owns the viewport geometry
//! primitives, the [`VisualTarget`](target::VisualTarget) capability trait that
//! abstracts the live image node, the mutually-exclusive style class groups,
//! and the normalized host events the controller consumes.
//!
//! # Primary responsibilities
//! - **Geometry**: [`OverlayRect`](geometry::OverlayRect), sizes, points, viewport.
//! - **VisualTarget**: size/class read-write access to the host-owned element.
//! - **Style classes**: alignment and size presets, plus the pure toggling rules.
//! - **HostEvent**: pointer, key, scroll, viewport, and mutation signals.
//!
//! # How it fits in the system
//! `imgresize-layout` computes handle/toolbar placement from these types and
//! `imgresize-web` drives the interactive state machine on top of both.

pub mod event;
pub mod geometry;
pub mod memory;
pub mod style;
pub mod target;

pub use event::{HostEvent, KeyCode, MutatedAttribute, PointerButton};
pub use geometry::{OverlayRect, Point, Size, Viewport};
pub use memory::MemoryTarget;
pub use style::{AlignmentClass, SizePreset, StyleChange, StyleGroup, StyleToken};
pub use target::VisualTarget;

/// Minimum rendered width written by the resize engine, in pixels.
pub const MIN_WIDTH: u32 = 48;

/// Minimum rendered height written by the resize engine, in pixels.
pub const MIN_HEIGHT: u32 = 48;

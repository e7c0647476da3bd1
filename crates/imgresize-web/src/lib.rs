#![forbid(unsafe_code)]

//! Host-driven overlay controller for resizing and aligning an embedded image.
//!
//! # Role in imgresize
//! `imgresize-web` is the interactive layer. It owns the activation lifecycle,
//! scoped global listener subscriptions, the live resize gesture, and the
//! one-commit-per-change notification contract with the host editor.
//!
//! # Primary responsibilities
//! - **OverlayController**: Inactive/Active state machine over a
//!   [`VisualTarget`](imgresize_core::VisualTarget).
//! - **ListenerScope**: RAII ownership of every global subscription.
//! - **GeometryTracker**: fresh bounding-box reads and implicit dismiss on detach.
//! - **TraceRecorder**: JSON Lines record of inputs and dispatches for replay.
//!
//! # Determinism
//! The controller never reads a clock and never polls. Time advances only
//! through `HostEvent::Tick`, so a recorded input sequence replays to the
//! same dispatches.

pub mod controller;
pub mod dispatch;
pub mod listener;
pub mod trace;
pub mod tracker;

pub use controller::{ControllerConfig, OverlayCallbacks, OverlayController};
pub use dispatch::{CommitKind, DismissReason, IgnoredReason, OverlayDispatch, ToolbarAction};
pub use listener::{
    ListenerId, ListenerKind, ListenerRegistry, ListenerScope, MemoryRegistry, SharedRegistry,
};
pub use trace::{TRACE_SCHEMA, Trace, TraceInput, TraceLine, TraceRecorder};
pub use tracker::GeometryTracker;

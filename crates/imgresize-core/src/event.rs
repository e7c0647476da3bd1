#![forbid(unsafe_code)]

//! Canonical host input events.
//!
//! Hosts translate their native pointer, keyboard, scroll, viewport and
//! mutation-observer signals into [`HostEvent`] values and hand them to the
//! controller one at a time, in delivery order.
//!
//! # Design Notes
//!
//! - Pointer positions are viewport coordinates (same space as
//!   [`OverlayRect`](crate::geometry::OverlayRect)).
//! - `Tick` marks the boundary of one host scheduling turn. Subscriptions that
//!   must not observe the activating gesture are established on the first
//!   tick after activation.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Viewport};

/// Canonical host event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// A pointer button was pressed anywhere in the document.
    PointerDown {
        position: Point,
        #[serde(default)]
        button: PointerButton,
    },

    /// The pointer moved (document scope).
    PointerMove { position: Point },

    /// A pointer button was released (document scope).
    PointerUp {
        position: Point,
        #[serde(default)]
        button: PointerButton,
    },

    /// A key was pressed.
    Key { code: KeyCode },

    /// The viewport or an ancestor scroll container scrolled.
    Scroll,

    /// The viewport was resized.
    ViewportResized { viewport: Viewport },

    /// The target's size or class attributes changed.
    TargetMutated { attribute: MutatedAttribute },

    /// One host scheduling turn has elapsed.
    Tick,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Key codes the overlay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", content = "char", rename_all = "snake_case")]
pub enum KeyCode {
    Escape,
    Enter,
    Delete,
    Backspace,
    Char(char),
}

/// Which observed attribute of the target changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutatedAttribute {
    Width,
    Height,
    Class,
}

impl HostEvent {
    /// Pointer position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { position, .. }
            | Self::PointerMove { position }
            | Self::PointerUp { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Wire name of the variant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::Key { .. } => "key",
            Self::Scroll => "scroll",
            Self::ViewportResized { .. } => "viewport_resized",
            Self::TargetMutated { .. } => "target_mutated",
            Self::Tick => "tick",
        }
    }
}

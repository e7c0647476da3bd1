#![forbid(unsafe_code)]

//! Outcome records returned by every controller entry point.
//!
//! Each call produces exactly one [`OverlayDispatch`]. Inputs that have no
//! effect are not errors; they come back as
//! [`OverlayDispatch::Ignored`] with a deterministic [`IgnoredReason`], which
//! keeps traces replayable and assertions precise.

use std::fmt;

use imgresize_core::{AlignmentClass, OverlayRect, Size, SizePreset, StyleChange, StyleToken};
use imgresize_layout::HandleId;
use serde::{Deserialize, Serialize};

use crate::listener::ListenerKind;

/// Floating toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ToolbarAction {
    Align(AlignmentClass),
    Size(SizePreset),
    Reset,
    Delete,
}

impl ToolbarAction {
    /// Toolbar buttons in display order.
    pub const ALL: [Self; 8] = [
        Self::Align(AlignmentClass::Left),
        Self::Align(AlignmentClass::Center),
        Self::Align(AlignmentClass::Right),
        Self::Size(SizePreset::Small),
        Self::Size(SizePreset::Medium),
        Self::Size(SizePreset::Full),
        Self::Reset,
        Self::Delete,
    ];

    /// Style token toggled by this button, if any.
    #[must_use]
    pub const fn token(self) -> Option<StyleToken> {
        match self {
            Self::Align(class) => Some(StyleToken::Alignment(class)),
            Self::Size(preset) => Some(StyleToken::Size(preset)),
            Self::Reset | Self::Delete => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Align(AlignmentClass::Left) => "Align left",
            Self::Align(AlignmentClass::Center) => "Align center",
            Self::Align(AlignmentClass::Right) => "Align right",
            Self::Size(SizePreset::Small) => "Small",
            Self::Size(SizePreset::Medium) => "Medium",
            Self::Size(SizePreset::Full) => "Full width",
            Self::Reset => "Reset size",
            Self::Delete => "Remove image",
        }
    }
}

/// Why the overlay went back to inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    /// Pointer-down outside the target, handles and toolbar.
    OutsideClick,
    EscapeKey,
    /// The delete action removed the target.
    TargetRemoved,
    /// A geometry refresh found the target no longer attached.
    TargetDetached,
    /// The host called `deactivate`.
    Host,
    /// A new activation replaced this one.
    Replaced,
}

impl DismissReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutsideClick => "outside_click",
            Self::EscapeKey => "escape_key",
            Self::TargetRemoved => "target_removed",
            Self::TargetDetached => "target_detached",
            Self::Host => "host",
            Self::Replaced => "replaced",
        }
    }
}

impl fmt::Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic reason an input had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    /// The controller is not active.
    Inactive,
    /// Activation was requested for a target that is not attached.
    TargetDetached,
    /// Pointer-down landed on the target body or the toolbar.
    InsideOverlay,
    /// Pointer-down outside before the outside-click listener was armed.
    OutsideClickNotArmed,
    /// The outside-click listener is already armed.
    AlreadyArmed,
    NoActiveGesture,
    GestureInProgress,
    /// Only the primary button starts a resize.
    ButtonNotAllowed,
    UnhandledKey,
    /// The signal arrived without a matching live subscription.
    NotSubscribed { listener: ListenerKind },
}

/// A mutation the host should persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommitKind {
    /// A resize gesture ended with the target at `size`.
    Resize { handle: HandleId, size: Size },
    /// A class token was toggled.
    Style { change: StyleChange },
    /// Explicit size and every alignment and size class were cleared.
    Reset,
    /// The target was removed from its parent.
    Removed,
}

/// Result of one controller entry point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OverlayDispatch {
    Activated { rect: OverlayRect },
    /// Geometry was re-read and the overlay repositioned.
    Refreshed { rect: OverlayRect },
    OutsideClickArmed,
    ResizeStarted { handle: HandleId, start: Size },
    Resized { handle: HandleId, size: Size },
    Committed { commit: CommitKind },
    Dismissed { reason: DismissReason },
    Ignored { reason: IgnoredReason },
}

impl OverlayDispatch {
    #[must_use]
    pub const fn ignored(reason: IgnoredReason) -> Self {
        Self::Ignored { reason }
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }

    #[must_use]
    pub const fn dismiss_reason(&self) -> Option<DismissReason> {
        match self {
            Self::Dismissed { reason } => Some(*reason),
            _ => None,
        }
    }

    #[must_use]
    pub const fn commit(&self) -> Option<CommitKind> {
        match self {
            Self::Committed { commit } => Some(*commit),
            _ => None,
        }
    }
}

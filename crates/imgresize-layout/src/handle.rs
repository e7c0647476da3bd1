//! Resize handle descriptors.
//!
//! Four corners (`nw`, `ne`, `sw`, `se`) and four edges (`n`, `s`, `e`, `w`).
//! Descriptors are static and never mutated.

use serde::{Deserialize, Serialize};

/// Stable handle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleId {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

/// Horizontal anchor of a handle on the target's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

/// Vertical anchor of a handle on the target's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

/// One fixed resize affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandleDescriptor {
    pub id: HandleId,
    /// CSS cursor shown while hovering the handle.
    pub cursor: &'static str,
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

const fn descriptor(
    id: HandleId,
    cursor: &'static str,
    horizontal: HorizontalAnchor,
    vertical: VerticalAnchor,
) -> HandleDescriptor {
    HandleDescriptor {
        id,
        cursor,
        horizontal,
        vertical,
    }
}

/// All handles, corners first.
pub const HANDLES: [HandleDescriptor; 8] = [
    descriptor(HandleId::Nw, "nwse-resize", HorizontalAnchor::Left, VerticalAnchor::Top),
    descriptor(HandleId::Ne, "nesw-resize", HorizontalAnchor::Right, VerticalAnchor::Top),
    descriptor(HandleId::Sw, "nesw-resize", HorizontalAnchor::Left, VerticalAnchor::Bottom),
    descriptor(HandleId::Se, "nwse-resize", HorizontalAnchor::Right, VerticalAnchor::Bottom),
    descriptor(HandleId::N, "ns-resize", HorizontalAnchor::Center, VerticalAnchor::Top),
    descriptor(HandleId::S, "ns-resize", HorizontalAnchor::Center, VerticalAnchor::Bottom),
    descriptor(HandleId::E, "ew-resize", HorizontalAnchor::Right, VerticalAnchor::Center),
    descriptor(HandleId::W, "ew-resize", HorizontalAnchor::Left, VerticalAnchor::Center),
];

impl HandleId {
    pub const ALL: [Self; 8] = [
        Self::Nw,
        Self::Ne,
        Self::Sw,
        Self::Se,
        Self::N,
        Self::S,
        Self::E,
        Self::W,
    ];

    /// The static descriptor for this handle.
    #[must_use]
    pub const fn descriptor(self) -> HandleDescriptor {
        match self {
            Self::Nw => HANDLES[0],
            Self::Ne => HANDLES[1],
            Self::Sw => HANDLES[2],
            Self::Se => HANDLES[3],
            Self::N => HANDLES[4],
            Self::S => HANDLES[5],
            Self::E => HANDLES[6],
            Self::W => HANDLES[7],
        }
    }

    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(self, Self::Nw | Self::Ne | Self::Sw | Self::Se)
    }

    /// `Some(true)` if the handle drags the right edge, `Some(false)` for the
    /// left edge, `None` if it leaves width alone.
    #[must_use]
    pub const fn horizontal_edge(self) -> Option<bool> {
        match self {
            Self::W | Self::Nw | Self::Sw => Some(false),
            Self::E | Self::Ne | Self::Se => Some(true),
            Self::N | Self::S => None,
        }
    }

    /// `Some(true)` for the bottom edge, `Some(false)` for the top edge,
    /// `None` if it leaves height alone.
    #[must_use]
    pub const fn vertical_edge(self) -> Option<bool> {
        match self {
            Self::N | Self::Nw | Self::Ne => Some(false),
            Self::S | Self::Sw | Self::Se => Some(true),
            Self::E | Self::W => None,
        }
    }

    /// Short lowercase name (`"nw"`, `"e"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nw => "nw",
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
        }
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

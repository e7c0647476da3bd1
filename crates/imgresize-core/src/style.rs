#![forbid(unsafe_code)]

//! Mutually-exclusive style class groups.
//!
//! Two disjoint groups are managed on the target:
//!
//! - [`AlignmentClass`]: left, center, right.
//! - [`SizePreset`]: small (33%), medium (50%), full (100%).
//!
//! # Invariants
//!
//! 1. At most one token of each group is active at any time.
//! 2. A size preset and an explicit inline size are never both present:
//!    activating a preset clears the inline size, and manual sizing clears
//!    every preset ([`clear_presets`]).
//! 3. Applying an already-active token deactivates it (toggle-off).
//! 4. [`reset_size`] is idempotent.
//!
//! The functions here are pure with respect to the controller: they mutate the
//! target and report what changed. Geometry refresh and commit notification
//! are the caller's job.

use serde::{Deserialize, Serialize};

use crate::target::VisualTarget;

/// Horizontal alignment of the image within its text flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentClass {
    Left,
    Center,
    Right,
}

impl AlignmentClass {
    pub const ALL: [Self; 3] = [Self::Left, Self::Center, Self::Right];

    /// Class token written to the target.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Left => "align-left",
            Self::Center => "align-center",
            Self::Right => "align-right",
        }
    }
}

/// Percentage-relative width preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePreset {
    Small,
    Medium,
    Full,
}

impl SizePreset {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Full];

    /// Class token written to the target.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Small => "size-small",
            Self::Medium => "size-medium",
            Self::Full => "size-full",
        }
    }

    /// Width relative to the containing block, in percent.
    #[must_use]
    pub const fn percent(self) -> u32 {
        match self {
            Self::Small => 33,
            Self::Medium => 50,
            Self::Full => 100,
        }
    }
}

/// Which exclusive group a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleGroup {
    Alignment,
    Size,
}

impl StyleGroup {
    /// Every token of the group.
    #[must_use]
    pub fn tokens(self) -> [StyleToken; 3] {
        match self {
            Self::Alignment => AlignmentClass::ALL.map(StyleToken::Alignment),
            Self::Size => SizePreset::ALL.map(StyleToken::Size),
        }
    }
}

/// One class-like style token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "group", content = "value", rename_all = "snake_case")]
pub enum StyleToken {
    Alignment(AlignmentClass),
    Size(SizePreset),
}

impl StyleToken {
    #[must_use]
    pub const fn group(self) -> StyleGroup {
        match self {
            Self::Alignment(_) => StyleGroup::Alignment,
            Self::Size(_) => StyleGroup::Size,
        }
    }

    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Alignment(class) => class.class_name(),
            Self::Size(preset) => preset.class_name(),
        }
    }
}

impl From<AlignmentClass> for StyleToken {
    fn from(class: AlignmentClass) -> Self {
        Self::Alignment(class)
    }
}

impl From<SizePreset> for StyleToken {
    fn from(preset: SizePreset) -> Self {
        Self::Size(preset)
    }
}

/// What [`apply_class`] did to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", content = "token", rename_all = "snake_case")]
pub enum StyleChange {
    /// The token was made the single active member of its group.
    Activated(StyleToken),
    /// The token was already active and has been toggled off.
    Deactivated(StyleToken),
}

/// Toggle `token` within its group.
///
/// If the token is active it is removed and the group is left empty.
/// Otherwise every other member of the group is removed and the token added.
/// Activating a size preset also clears the explicit inline size.
pub fn apply_class<T: VisualTarget + ?Sized>(target: &mut T, token: StyleToken) -> StyleChange {
    let class = token.class_name();
    if target.has_class(class) {
        target.remove_class(class);
        return StyleChange::Deactivated(token);
    }

    for other in token.group().tokens() {
        if other != token {
            target.remove_class(other.class_name());
        }
    }
    target.add_class(class);

    if token.group() == StyleGroup::Size {
        target.clear_size();
    }
    StyleChange::Activated(token)
}

/// Remove every size preset class. Returns `true` if one was active.
pub fn clear_presets<T: VisualTarget + ?Sized>(target: &mut T) -> bool {
    let mut cleared = false;
    for preset in SizePreset::ALL {
        if target.has_class(preset.class_name()) {
            target.remove_class(preset.class_name());
            cleared = true;
        }
    }
    cleared
}

/// Clear explicit size and every alignment and size token.
pub fn reset_size<T: VisualTarget + ?Sized>(target: &mut T) {
    target.clear_size();
    for token in StyleGroup::Alignment
        .tokens()
        .into_iter()
        .chain(StyleGroup::Size.tokens())
    {
        target.remove_class(token.class_name());
    }
}

/// Active alignment class, if any.
#[must_use]
pub fn active_alignment<T: VisualTarget + ?Sized>(target: &T) -> Option<AlignmentClass> {
    AlignmentClass::ALL
        .into_iter()
        .find(|class| target.has_class(class.class_name()))
}

/// Active size preset, if any.
#[must_use]
pub fn active_preset<T: VisualTarget + ?Sized>(target: &T) -> Option<SizePreset> {
    SizePreset::ALL
        .into_iter()
        .find(|preset| target.has_class(preset.class_name()))
}

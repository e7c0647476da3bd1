//! Interaction script format.
//!
//! ```json
//! {
//!   "viewport": { "width": 1280.0, "height": 800.0 },
//!   "target": { "width": 200, "height": 100, "left": 300.0, "top": 200.0 },
//!   "steps": [
//!     { "step": "activate" },
//!     { "step": "event", "event": { "event": "tick" } },
//!     { "step": "event", "event": { "event": "pointer_down", "position": { "x": 500.0, "y": 300.0 } } },
//!     { "step": "toolbar", "action": { "action": "align", "value": "center" } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use imgresize_core::{HostEvent, MemoryTarget, Point, Size, StyleToken, Viewport, VisualTarget};
use imgresize_core::style::apply_class;
use imgresize_web::ToolbarAction;
use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result};

/// Initial state of the scripted image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    /// Containing-block width for percentage presets.
    #[serde(default)]
    pub container_width: Option<u32>,
    /// Class tokens present before the first step.
    #[serde(default)]
    pub classes: Vec<StyleToken>,
}

impl TargetSpec {
    /// Build the in-memory target this spec describes.
    #[must_use]
    pub fn build(&self) -> MemoryTarget {
        let mut target = MemoryTarget::new(Size::new(self.width, self.height))
            .with_origin(Point::new(self.left, self.top));
        if let Some(width) = self.container_width {
            target = target.with_container_width(width);
        }
        for token in &self.classes {
            if !target.has_class(token.class_name()) {
                apply_class(&mut target, *token);
            }
        }
        target
    }
}

/// One scripted controller input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Activate,
    Deactivate,
    Event { event: HostEvent },
    Toolbar { action: ToolbarAction },
    /// Another writer removes the image from the document.
    Detach,
    /// Another writer moves the image, e.g. reflow above it.
    Move { left: f64, top: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub viewport: Viewport,
    pub target: TargetSpec,
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let script: Self = serde_json::from_str(&text)?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ReplayError::invalid(format!(
                "viewport must be positive (got {width}x{height})"
            )));
        }
        if self.target.width == 0 {
            return Err(ReplayError::invalid("target width must be > 0"));
        }
        if !(self.target.left.is_finite() && self.target.top.is_finite()) {
            return Err(ReplayError::invalid("target origin must be finite"));
        }
        if !self.steps.iter().any(|s| matches!(s, ScriptStep::Activate)) {
            return Err(ReplayError::invalid("script never activates the overlay"));
        }
        Ok(())
    }
}

//! Replayable edit scripts.
//!
//! A script is a JSON document listing editor operations in order. The CLI and integration tests
//! use it to drive a session the way a user would.
//!
//! ```json
//! { "steps": [
//!     { "op": "set_text", "text": "hello" },
//!     { "op": "drag", "from": [256, 256], "to": [300, 240] },
//!     { "op": "zoom_step", "steps": 2 }
//! ] }
//! ```

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::{EditorError, EditorResult};
use crate::interact::drag::EditorTab;
use crate::interact::pointer::{PointerEvent, WheelEvent};
use crate::session::editor::EditorSession;

/// Ordered list of editor operations.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    /// Operations, applied first to last.
    pub steps: Vec<EditOp>,
}

/// Text size as typed: a number, or the raw field contents.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TextSizeInput {
    /// Already numeric.
    Px(i32),
    /// Raw input, parsed like the size field.
    Raw(String),
}

/// One editor operation. Points are `[x, y]` in canvas space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Pointer pressed.
    PointerDown {
        /// Position.
        at: [f64; 2],
    },
    /// Pointer moved.
    PointerMove {
        /// Position.
        at: [f64; 2],
    },
    /// Pointer released.
    PointerUp,
    /// Pointer left the canvas.
    PointerLeave,
    /// Down at `from`, move to `to`, up.
    Drag {
        /// Start position.
        from: [f64; 2],
        /// End position.
        to: [f64; 2],
    },
    /// Mouse wheel.
    Wheel {
        /// Vertical wheel delta.
        delta_y: f64,
    },
    /// Replace the overlay text.
    SetText {
        /// New content.
        text: String,
    },
    /// Set the text fill color.
    SetTextColor {
        /// `#rrggbb` or `#rgb`.
        color: Rgb8,
    },
    /// Set the text size.
    SetTextSize {
        /// Size in pixels.
        size: TextSizeInput,
    },
    /// Set the image scale.
    SetScale {
        /// Scale factor, clamped.
        scale: f64,
    },
    /// Set the image rotation.
    SetRotation {
        /// Degrees.
        degrees: f64,
    },
    /// Rotate the image by a delta.
    RotateBy {
        /// Degrees.
        degrees: f64,
    },
    /// Zoom buttons.
    ZoomStep {
        /// Positive zooms in.
        steps: i32,
    },
    /// Restore the default framing.
    ResetImage,
    /// Switch the control tab.
    SetTab {
        /// Target tab.
        tab: EditorTab,
    },
    /// Toggle the grid.
    SetGrid {
        /// Whether the grid is shown.
        show: bool,
    },
}

fn point(p: [f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

impl EditScript {
    /// Parse a script from JSON text.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| EditorError::validation(format!("invalid edit script: {e}")))
    }

    /// Read and parse a script file.
    pub fn from_path(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read edit script '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Apply every step to `session`, stopping at the first failing step.
    #[tracing::instrument(skip_all, fields(steps = self.steps.len()))]
    pub fn apply(&self, session: &mut EditorSession) -> EditorResult<()> {
        for (i, op) in self.steps.iter().enumerate() {
            op.apply(session).map_err(|e| match e {
                EditorError::Validation(msg) => {
                    EditorError::validation(format!("step {i}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl EditOp {
    /// Apply this operation to `session`.
    pub fn apply(&self, session: &mut EditorSession) -> EditorResult<()> {
        match self {
            EditOp::PointerDown { at } => session.pointer(PointerEvent::down(at[0], at[1])),
            EditOp::PointerMove { at } => session.pointer(PointerEvent::moved(at[0], at[1])),
            EditOp::PointerUp => session.pointer(PointerEvent::up()),
            EditOp::PointerLeave => session.pointer(PointerEvent::leave()),
            EditOp::Drag { from, to } => {
                let (from, to) = (point(*from), point(*to));
                session.pointer(PointerEvent::down(from.x, from.y));
                session.pointer(PointerEvent::moved(to.x, to.y));
                session.pointer(PointerEvent::up());
            }
            EditOp::Wheel { delta_y } => session.wheel(WheelEvent { delta_y: *delta_y }),
            EditOp::SetText { text } => session.set_text(text.clone()),
            EditOp::SetTextColor { color } => session.set_text_color(*color),
            EditOp::SetTextSize { size } => match size {
                TextSizeInput::Px(px) => session.set_text_size(*px),
                TextSizeInput::Raw(raw) => session.set_text_size_str(raw)?,
            },
            EditOp::SetScale { scale } => session.set_scale(*scale),
            EditOp::SetRotation { degrees } => session.set_rotation(*degrees),
            EditOp::RotateBy { degrees } => session.rotate_by(*degrees),
            EditOp::ZoomStep { steps } => session.step_zoom(*steps),
            EditOp::ResetImage => session.reset_image(),
            EditOp::SetTab { tab } => session.set_tab(*tab),
            EditOp::SetGrid { show } => session.set_grid(*show),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/script/script.rs"]
mod tests;

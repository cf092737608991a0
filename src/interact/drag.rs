//! Pointer interaction state machine.
//!
//! Pointer-down picks exactly one drag target; pointer-move applies the delta from the drag start
//! to the snapshot taken at pointer-down; pointer-up/leave returns to [`DragState::None`].

use crate::foundation::core::{Canvas, Point, Size, Vec2};
use crate::interact::pointer::CursorHint;
use crate::model::text::TextOverlay;
use crate::model::transform::{Corner, ImageTransform};

/// Radius around each corner handle that starts a resize, inclusive.
pub const HANDLE_HIT_RADIUS_PX: f64 = 20.0;

/// Which set of controls is active; also decides hit-test priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorTab {
    /// Image framing (pan, zoom, rotate, handles, grid).
    #[default]
    Image,
    /// Text overlay.
    Text,
}

/// The active drag, carrying only the snapshot that drag needs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    None,
    /// Panning the image.
    PanImage {
        /// Pointer position at pointer-down.
        start: Point,
        /// Image offset at pointer-down.
        initial_offset: Vec2,
    },
    /// Moving the text overlay.
    DragText {
        /// Pointer position at pointer-down.
        start: Point,
        /// Text position at pointer-down.
        initial_position: Point,
    },
    /// Uniform zoom from a corner handle.
    ResizeCorner {
        /// Handle that was grabbed.
        corner: Corner,
        /// Pointer position at pointer-down.
        start: Point,
        /// Image scale at pointer-down.
        initial_scale: f64,
    },
}

impl DragState {
    /// Whether any drag is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::None)
    }

    /// Whether the text overlay is being dragged.
    pub fn is_text_drag(&self) -> bool {
        matches!(self, DragState::DragText { .. })
    }

    /// Cursor matching this drag.
    pub fn cursor(&self) -> CursorHint {
        match self {
            DragState::PanImage { .. } => CursorHint::Move,
            DragState::ResizeCorner { .. } => CursorHint::ResizeNwSe,
            DragState::None | DragState::DragText { .. } => CursorHint::Default,
        }
    }

    /// Tab a freshly started drag switches to, if any.
    pub(crate) fn forced_tab(&self) -> Option<EditorTab> {
        match self {
            DragState::PanImage { .. } => Some(EditorTab::Image),
            DragState::DragText { .. } => Some(EditorTab::Text),
            DragState::None | DragState::ResizeCorner { .. } => None,
        }
    }
}

/// Everything pointer-down needs to pick a target.
pub(crate) struct HitTargets<'a> {
    pub(crate) canvas: Canvas,
    pub(crate) active_tab: EditorTab,
    pub(crate) transform: &'a ImageTransform,
    pub(crate) base_size: Size,
    pub(crate) text: &'a TextOverlay,
    /// Measured advance of `text.content`.
    pub(crate) text_width: f64,
}

pub(crate) fn is_near(a: Point, b: Point, radius: f64) -> bool {
    a.distance(b) <= radius
}

/// First corner handle (TL, TR, BL, BR) within [`HANDLE_HIT_RADIUS_PX`] of `p`.
pub(crate) fn hit_handle(
    transform: &ImageTransform,
    canvas: Canvas,
    base_size: Size,
    p: Point,
) -> Option<Corner> {
    transform
        .corners(canvas, base_size)
        .into_iter()
        .find(|(_, c)| is_near(p, *c, HANDLE_HIT_RADIUS_PX))
        .map(|(corner, _)| corner)
}

/// Resolve pointer-down at `p`: resize handle, then text, then image pan.
pub(crate) fn begin_drag(targets: &HitTargets<'_>, p: Point) -> DragState {
    if targets.active_tab == EditorTab::Image {
        if let Some(corner) = hit_handle(targets.transform, targets.canvas, targets.base_size, p)
        {
            return DragState::ResizeCorner {
                corner,
                start: p,
                initial_scale: targets.transform.scale(),
            };
        }
    }

    let text_hit = targets.text.hit_test(targets.text_width, p);
    if targets.text.is_visible() && (text_hit || targets.active_tab == EditorTab::Text) {
        return DragState::DragText {
            start: p,
            initial_position: targets.text.position,
        };
    }

    DragState::PanImage {
        start: p,
        initial_offset: targets.transform.offset(),
    }
}

/// Apply pointer-move at `p` to the model according to `drag`.
pub(crate) fn apply_drag(
    drag: &DragState,
    p: Point,
    canvas: Canvas,
    transform: &mut ImageTransform,
    text: &mut TextOverlay,
) {
    match *drag {
        DragState::None => {}
        DragState::DragText {
            start,
            initial_position,
        } => {
            text.position = initial_position + (p - start);
        }
        DragState::PanImage {
            start,
            initial_offset,
        } => {
            transform.set_offset(initial_offset + (p - start));
        }
        DragState::ResizeCorner {
            start,
            initial_scale,
            ..
        } => {
            // Uniform zoom around the pivot; which corner was grabbed does not matter.
            let pivot = transform.pivot(canvas);
            let dist_start = start.distance(pivot);
            if dist_start > 0.0 {
                let ratio = p.distance(pivot) / dist_start;
                transform.set_scale(initial_scale * ratio);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;

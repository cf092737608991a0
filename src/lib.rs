//! Sticker composition editor core.
//!
//! One source image under one text overlay, framed on a fixed-size canvas and flattened to PNG.
//! The public API is session-oriented:
//!
//! - Open an [`EditorSession`] for a source image and resolve its load through an
//!   [`ImageSource`]
//! - Feed pointer events and control changes; render the editor view with
//!   [`EditorSession::render`]
//! - Finish with [`EditorSession::save`] (flattened [`ExportedImage`]) or
//!   [`EditorSession::cancel`]
//!
//! Rendering is CPU-only (`vello_cpu`) and deterministic for a given session state.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod export;
mod foundation;
mod interact;
mod model;
mod render;
mod session;

/// Replayable JSON edit scripts.
pub mod script;

pub use crate::assets::font::FontSource;
pub use crate::assets::source::{FetchedImage, ImageSource, LocalImageSource, PixelAccess};
pub use crate::export::png::ExportedImage;
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgb8, Size, Vec2};
pub use crate::foundation::error::{EditorError, EditorResult};
pub use crate::interact::drag::{DragState, EditorTab, HANDLE_HIT_RADIUS_PX};
pub use crate::interact::pointer::{CursorHint, PointerEvent, PointerKind, Viewport, WheelEvent};
pub use crate::model::text::{
    DEFAULT_TEXT_SIZE_PX, TEXT_HIT_MARGIN_PX, TEXT_SELECTION_MARGIN_PX, TextOverlay,
    parse_text_size,
};
pub use crate::model::transform::{
    Corner, ImageTransform, MAX_SCALE, MIN_SCALE, base_draw_size, clamp_scale,
};
pub use crate::render::backend::{FrameFingerprint, FrameRGBA, RenderMode};
pub use crate::script::{EditOp, EditScript, TextSizeInput};
pub use crate::session::editor::{EditorOpts, EditorSession, LoadStatus};

use crate::foundation::core::{Canvas, Point, Rect};

/// Phase of a pointer (mouse or touch) event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    /// Button pressed / finger down.
    Down,
    /// Pointer moved.
    Move,
    /// Button released / finger lifted.
    Up,
    /// Pointer left the canvas.
    Leave,
}

/// A pointer event in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Event phase.
    pub kind: PointerKind,
    /// Position in canvas space (ignored for `Up` and `Leave`).
    pub position: Point,
}

impl PointerEvent {
    /// Pointer-down at `(x, y)`.
    pub fn down(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Down,
            position: Point::new(x, y),
        }
    }

    /// Pointer-move to `(x, y)`.
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            position: Point::new(x, y),
        }
    }

    /// Pointer-up.
    pub fn up() -> Self {
        Self {
            kind: PointerKind::Up,
            position: Point::ORIGIN,
        }
    }

    /// Pointer left the canvas.
    pub fn leave() -> Self {
        Self {
            kind: PointerKind::Leave,
            position: Point::ORIGIN,
        }
    }

    /// Build an event from a touch list; only the first touch is tracked.
    ///
    /// `Down`/`Move` with no touches yield `None`. A touch end carries no touches and maps to `Up`.
    pub fn from_touches(kind: PointerKind, touches: &[Point]) -> Option<Self> {
        match (kind, touches.first()) {
            (PointerKind::Up | PointerKind::Leave, first) => Some(Self {
                kind,
                position: first.copied().unwrap_or(Point::ORIGIN),
            }),
            (_, Some(&position)) => Some(Self { kind, position }),
            (_, None) => None,
        }
    }
}

/// Mouse-wheel input; positive `delta_y` zooms out.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WheelEvent {
    /// Vertical scroll delta in wheel units.
    pub delta_y: f64,
}

/// Where the canvas is displayed in client (window) coordinates.
///
/// The displayed canvas may be resized by the host layout; pointer positions are scaled back to
/// canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Client-space rectangle covered by the canvas.
    pub rect: Rect,
}

impl Viewport {
    /// Viewport covering `rect` in client space.
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Viewport that displays the canvas 1:1 at the client origin.
    pub fn identity(canvas: Canvas) -> Self {
        Self {
            rect: Rect::from_origin_size(Point::ORIGIN, canvas.size()),
        }
    }

    /// Map a client-space point to canvas space.
    ///
    /// A degenerate viewport maps every point to the canvas origin.
    pub fn to_canvas(&self, canvas: Canvas, client: Point) -> Point {
        let w = self.rect.width();
        let h = self.rect.height();
        if w <= 0.0 || h <= 0.0 {
            return Point::ORIGIN;
        }
        let sx = f64::from(canvas.width) / w;
        let sy = f64::from(canvas.height) / h;
        Point::new((client.x - self.rect.x0) * sx, (client.y - self.rect.y0) * sy)
    }
}

/// Cursor the host should show for the current interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CursorHint {
    /// Regular arrow.
    #[default]
    Default,
    /// Panning the image.
    Move,
    /// Resizing from a corner handle.
    ResizeNwSe,
}

#[cfg(test)]
#[path = "../../tests/unit/interact/pointer.rs"]
mod tests;

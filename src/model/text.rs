use crate::foundation::core::{Point, Rect, Rgb8};
use crate::foundation::error::{EditorError, EditorResult};

/// Margin added on every side of the text box for pointer hit-testing.
pub const TEXT_HIT_MARGIN_PX: f64 = 20.0;
/// Margin added on every side of the text box for the dashed selection rectangle.
pub const TEXT_SELECTION_MARGIN_PX: f64 = 15.0;
/// Font size used for a fresh overlay.
pub const DEFAULT_TEXT_SIZE_PX: i32 = 60;
/// Smallest font size the renderer will shape.
pub const MIN_RENDER_TEXT_SIZE_PX: f32 = 1.0;
/// Largest font size the renderer will shape.
pub const MAX_RENDER_TEXT_SIZE_PX: f32 = 4096.0;
/// Font weight of the overlay text (black).
pub const TEXT_FONT_WEIGHT: u16 = 900;

/// The single styled text layer drawn over the image.
///
/// `position` is the text center in canvas space and is never clamped to the canvas. An empty
/// `content` hides the overlay and makes it non-hit-testable.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextOverlay {
    /// Text to draw.
    pub content: String,
    /// Fill color; the outline is always black.
    pub color: Rgb8,
    /// Font size in pixels as entered by the user. Not clamped on storage.
    pub size_px: i32,
    /// Center of the text in canvas space.
    pub position: Point,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            content: String::new(),
            color: Rgb8::WHITE,
            size_px: DEFAULT_TEXT_SIZE_PX,
            position: Point::new(256.0, 400.0),
        }
    }
}

impl TextOverlay {
    /// Whether the overlay is drawn and hit-testable.
    pub fn is_visible(&self) -> bool {
        !self.content.is_empty()
    }

    /// Font size used for shaping, clamped to a sane positive range.
    pub fn render_size_px(&self) -> f32 {
        (self.size_px as f32).clamp(MIN_RENDER_TEXT_SIZE_PX, MAX_RENDER_TEXT_SIZE_PX)
    }

    /// Outline stroke width, proportional to the font size.
    pub fn stroke_width(&self) -> f64 {
        f64::from(self.render_size_px()) / 12.0
    }

    /// Unpadded text box centered on `position`, given the measured advance `width`.
    pub fn text_box(&self, width: f64) -> Rect {
        let h = f64::from(self.render_size_px());
        Rect::from_center_size(self.position, (width.max(0.0), h))
    }

    /// Text box grown by [`TEXT_HIT_MARGIN_PX`].
    pub fn hit_box(&self, width: f64) -> Rect {
        self.text_box(width).inflate(TEXT_HIT_MARGIN_PX, TEXT_HIT_MARGIN_PX)
    }

    /// Text box grown by [`TEXT_SELECTION_MARGIN_PX`].
    pub fn selection_box(&self, width: f64) -> Rect {
        self.text_box(width)
            .inflate(TEXT_SELECTION_MARGIN_PX, TEXT_SELECTION_MARGIN_PX)
    }

    /// Pointer hit-test against the padded text box; edges count as inside.
    pub fn hit_test(&self, width: f64, p: Point) -> bool {
        if !self.is_visible() {
            return false;
        }
        rect_contains_inclusive(self.hit_box(width), p)
    }
}

/// Parse the numeric text-size field.
///
/// Reads an optional sign and the leading decimal digits after any leading whitespace, so
/// `"42px"` is 42 and `"12.7"` is 12. Values beyond `i32` saturate. Zero and negatives are kept
/// as given. Input without a leading digit is rejected.
pub fn parse_text_size(input: &str) -> EditorResult<i32> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let mut magnitude: i64 = 0;
    for d in digits {
        seen = true;
        magnitude = magnitude.saturating_mul(10).saturating_add(i64::from(d - b'0'));
    }
    if !seen {
        return Err(EditorError::validation(format!(
            "text size must start with an integer, got \"{input}\""
        )));
    }
    let value = if negative { -magnitude } else { magnitude };
    Ok(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

pub(crate) fn rect_contains_inclusive(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

#[cfg(test)]
#[path = "../../tests/unit/model/text.rs"]
mod tests;

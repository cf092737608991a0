use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{EditorError, EditorResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Editing surface dimensions in pixels.
///
/// The rasterizer addresses surfaces with 16-bit coordinates, so both sides must fit in `u16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas (`1..=65535` on both sides).
    pub fn new(width: u32, height: u32) -> EditorResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Check that both sides are non-zero and addressable by the rasterizer.
    pub fn validate(self) -> EditorResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EditorError::validation("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(EditorError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(())
    }

    /// Canvas center point in canvas space.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Canvas size as floating-point extent.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgba8Premul {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Rgba8Premul {
    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub(crate) fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Return the channels as a `[r, g, b, a]` array.
    pub(crate) fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Opaque 8-bit RGB color, written as `#rrggbb`.
///
/// Serializes to and from the hex string form, which is also what the text color picker produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> EditorResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(EditorError::validation(format!(
                "invalid hex color \"{s}\""
            )));
        }

        fn hex_byte(pair: &str) -> EditorResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| EditorError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        match s.len() {
            6 => Ok(Self::new(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            3 => {
                let nib = |i: usize| -> EditorResult<u8> {
                    let v = hex_byte(&s[i..i + 1])?;
                    Ok(v * 17)
                };
                Ok(Self::new(nib(0)?, nib(1)?, nib(2)?))
            }
            _ => Err(EditorError::validation(
                "hex color must be #RRGGBB or #RGB (case-insensitive)",
            )),
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Attach an alpha channel and premultiply.
    pub(crate) fn with_alpha(self, a: u8) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, a)
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb8 {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

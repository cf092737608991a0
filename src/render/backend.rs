use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::{EditorError, EditorResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

const XXH3_SEED: u64 = 0x5f1c_6b2d_93a4_e7c1;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** as produced by the renderer. The `premultiplied` flag makes
/// this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Content hash of a frame, stable across runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl FrameRGBA {
    /// Fully transparent premultiplied frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    pub(crate) fn from_premul(width: u32, height: u32, data: Vec<u8>) -> EditorResult<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(EditorError::render("frame byte len mismatch"));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied: true,
        })
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    /// Hash of dimensions, alpha mode and pixels.
    pub fn fingerprint(&self) -> FrameFingerprint {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(&self.width.to_le_bytes());
        h.update(&self.height.to_le_bytes());
        h.update(&[u8::from(self.premultiplied)]);
        h.update(&self.data);
        let v = h.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// What a render is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Interactive view: checkerboard backdrop, grid, handles and selection box.
    #[default]
    Editor,
    /// Final composite: image and text only, on a transparent background.
    Export,
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;

use std::io::Cursor;

use base64::Engine as _;

use crate::foundation::error::{EditorError, EditorResult};
use crate::render::backend::FrameRGBA;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Flattened composite produced by a save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded PNG bytes (straight alpha).
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// `data:image/png;base64,...` form of the PNG.
    pub fn to_data_url(&self) -> String {
        let mut out = String::from(PNG_DATA_URL_PREFIX);
        base64::engine::general_purpose::STANDARD.encode_string(&self.png, &mut out);
        out
    }

    /// Parse a PNG data URL back into an export, reading dimensions from the PNG header.
    ///
    /// Hosts keep saved stickers as data URLs; this recovers the export (size and bytes) from the
    /// stored string, for instance before handing the same URL back to [`crate::EditorSession::open`]
    /// for another round of edits.
    pub fn from_data_url(url: &str) -> EditorResult<Self> {
        let payload = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| EditorError::decode("not a base64 png data url"))?;
        let png = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| EditorError::decode(format!("invalid base64 payload: {e}")))?;
        let (width, height) = image::ImageReader::with_format(Cursor::new(&png), image::ImageFormat::Png)
            .into_dimensions()
            .map_err(|e| EditorError::decode(format!("read png dimensions: {e}")))?;
        Ok(Self { width, height, png })
    }

    /// Decode back to straight RGBA8 pixels.
    pub fn to_rgba8(&self) -> EditorResult<Vec<u8>> {
        let img = image::load_from_memory_with_format(&self.png, image::ImageFormat::Png)
            .map_err(|e| EditorError::decode(format!("decode exported png: {e}")))?;
        Ok(img.to_rgba8().into_raw())
    }
}

/// Unpremultiply a rendered frame and encode it as PNG.
#[tracing::instrument(level = "debug", skip(frame), fields(w = frame.width, h = frame.height))]
pub(crate) fn encode_png(frame: &FrameRGBA) -> EditorResult<ExportedImage> {
    let rgba = frame.to_straight_rgba();
    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| EditorError::encode("frame buffer does not match its dimensions"))?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| EditorError::encode(format!("encode png: {e}")))?;
    tracing::debug!(bytes = png.len(), "png encoded");
    Ok(ExportedImage {
        width: frame.width,
        height: frame.height,
        png,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;

use std::sync::Arc;

use crate::assets::source::{FetchedImage, PixelAccess};
use crate::foundation::error::{EditorError, EditorResult};
use crate::foundation::math::premultiply_rgba8_in_place;

#[derive(Clone, Debug)]
/// Decoded raster image in premultiplied RGBA8 form.
pub(crate) struct PreparedImage {
    /// Width in pixels.
    pub(crate) width: u32,
    /// Height in pixels.
    pub(crate) height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

/// A source image ready for drawing.
///
/// The paint is built once per load; renders only read it.
#[derive(Clone)]
pub(crate) struct LoadedImage {
    pub(crate) url: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) paint: vello_cpu::Image,
    pub(crate) pixel_access: PixelAccess,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub(crate) fn decode_image(bytes: &[u8]) -> EditorResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| EditorError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(EditorError::decode("image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode fetched bytes and build the draw paint for them.
pub(crate) fn load_image(url: &str, fetched: FetchedImage) -> EditorResult<LoadedImage> {
    let prepared = decode_image(&fetched.bytes)?;
    let paint = crate::render::cpu::rgba_premul_to_image(
        &prepared.rgba8_premul,
        prepared.width,
        prepared.height,
    )?;
    Ok(LoadedImage {
        url: url.to_string(),
        width: prepared.width,
        height: prepared.height,
        paint,
        pixel_access: fetched.pixel_access,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

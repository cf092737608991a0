use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{EditorError, EditorResult};
use crate::foundation::math::mul_div255_u8;

/// Drop-shadow layer for a rasterized text layer.
///
/// Only the coverage (alpha) of `layer` matters: it is blurred as a single-channel mask, then
/// every pixel becomes `tint` scaled by the blurred coverage.
pub(crate) fn shadow_from_coverage(
    layer: &[u8],
    width: u32,
    height: u32,
    tint: Rgba8Premul,
    radius: u32,
    sigma: f32,
) -> EditorResult<Vec<u8>> {
    let px_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| EditorError::render("shadow buffer size overflow"))?;
    if layer.len() != px_count * 4 {
        return Err(EditorError::render(
            "shadow_from_coverage expects a layer matching width*height*4",
        ));
    }

    let coverage: Vec<u8> = layer.chunks_exact(4).map(|px| px[3]).collect();
    let mask = blur_mask(&coverage, width, height, radius, sigma)?;

    let tint = tint.to_array();
    let mut out = vec![0u8; layer.len()];
    for (dst, &a) in out.chunks_exact_mut(4).zip(&mask) {
        if a == 0 {
            continue;
        }
        for (d, &t) in dst.iter_mut().zip(&tint) {
            *d = mul_div255_u8(u16::from(t), u16::from(a));
        }
    }
    Ok(out)
}

/// Separable gaussian blur of an 8-bit coverage mask (one byte per pixel).
fn blur_mask(
    mask: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> EditorResult<Vec<u8>> {
    if mask.len() != (width as usize) * (height as usize) {
        return Err(EditorError::render("blur_mask expects width*height bytes"));
    }
    if radius == 0 || mask.is_empty() {
        return Ok(mask.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let w = width as usize;
    let h = height as usize;
    let mut rows = vec![0u8; mask.len()];
    let mut out = vec![0u8; mask.len()];

    // Rows, then columns; edges clamp to the border sample.
    for y in 0..h {
        let line = &mask[y * w..(y + 1) * w];
        for x in 0..w {
            rows[y * w + x] = convolve(&kernel, w, x, |i| line[i]);
        }
    }
    for x in 0..w {
        for y in 0..h {
            out[y * w + x] = convolve(&kernel, h, y, |i| rows[i * w + x]);
        }
    }
    Ok(out)
}

fn convolve(kernel: &[u32], len: usize, at: usize, sample: impl Fn(usize) -> u8) -> u8 {
    let radius = kernel.len() / 2;
    let last = len - 1;
    let mut acc = 0u64;
    for (ki, &kw) in kernel.iter().enumerate() {
        let i = (at + ki).saturating_sub(radius).min(last);
        acc += u64::from(kw) * u64::from(sample(i));
    }
    ((acc + 32768) >> 16).min(255) as u8
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> EditorResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(EditorError::validation("blur sigma must be > 0"));
    }

    let r = i64::from(radius);
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(EditorError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Rounding drift goes into the center tap so the kernel sums to exactly 1.0.
    let acc: i64 = weights.iter().map(|&q| i64::from(q)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;

    Ok(weights)
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;

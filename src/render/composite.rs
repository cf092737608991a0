use crate::foundation::error::{EditorError, EditorResult};
use crate::foundation::math::mul_div255_u8;

pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with an extra opacity multiplier on `src`.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> EditorResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(EditorError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over with `src` shifted by `(dx, dy)` pixels; parts shifted off-frame are dropped.
pub(crate) fn over_offset_in_place(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    height: u32,
    dx: i32,
    dy: i32,
) -> EditorResult<()> {
    let expected = (width as usize) * (height as usize) * 4;
    if dst.len() != expected || src.len() != expected {
        return Err(EditorError::render(
            "over_offset_in_place expects width*height*4 buffers",
        ));
    }
    let (w, h) = (width as i32, height as i32);
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let si = ((sy * w + sx) as usize) * 4;
            let di = ((y * w + x) as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            if s[3] == 0 {
                continue;
            }
            let d = &mut dst[di..di + 4];
            let out = over([d[0], d[1], d[2], d[3]], s, 1.0);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

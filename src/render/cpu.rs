use std::sync::Arc;

use kurbo::Shape as _;

use crate::assets::decode::LoadedImage;
use crate::assets::font::{ShapedText, TextShaper, fallback_width};
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgb8, Size};
use crate::foundation::error::{EditorError, EditorResult};
use crate::interact::drag::{DragState, EditorTab};
use crate::model::text::TextOverlay;
use crate::model::transform::{ImageTransform, base_draw_size};
use crate::render::backend::{FrameRGBA, RenderMode};
use crate::render::blur::shadow_from_coverage;
use crate::render::composite::{over_in_place, over_offset_in_place};

pub(crate) const CHECKER_CELL_PX: u32 = 20;
const CHECKER_DARK: Rgb8 = Rgb8::new(0x33, 0x33, 0x33);
const CHECKER_LIGHT: Rgb8 = Rgb8::new(0x44, 0x44, 0x44);

const GRID_ALPHA: u8 = 77;
const GRID_LINE_WIDTH: f64 = 1.0;

const ACCENT: Rgb8 = Rgb8::new(0x63, 0x66, 0xf1);
const FRAME_LINE_WIDTH: f64 = 2.0;
pub(crate) const HANDLE_RADIUS_PX: f64 = 8.0;

const TEXT_MITER_LIMIT: f64 = 2.0;
const SHADOW_ALPHA: u8 = 204;
const SHADOW_OFFSET_PX: i32 = 3;
// Canvas shadowBlur 8 corresponds to sigma 4; three sigmas of support.
const SHADOW_SIGMA: f32 = 4.0;
const SHADOW_RADIUS_PX: u32 = 12;

const SELECTION_LINE_WIDTH: f64 = 2.0;
const SELECTION_DASH: [f64; 2] = [6.0, 6.0];

/// Everything a single render reads. Built fresh from session state per call.
pub(crate) struct Scene<'a> {
    pub(crate) canvas: Canvas,
    pub(crate) image: Option<&'a LoadedImage>,
    pub(crate) transform: &'a ImageTransform,
    pub(crate) text: &'a TextOverlay,
    pub(crate) active_tab: EditorTab,
    pub(crate) show_grid: bool,
    pub(crate) drag: DragState,
}

/// CPU compositor powered by `vello_cpu` for vector and text rasterization.
///
/// Holds only scratch state; output depends on the [`Scene`] alone.
#[derive(Default)]
pub(crate) struct CpuRenderer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?mode, tab = ?scene.active_tab))]
    pub(crate) fn render(
        &mut self,
        scene: &Scene<'_>,
        shaper: &mut TextShaper,
        mode: RenderMode,
    ) -> EditorResult<FrameRGBA> {
        let canvas = scene.canvas;
        let (w16, h16) = canvas_dims_u16(canvas)?;
        let Some(image) = scene.image else {
            return Ok(FrameRGBA::transparent(canvas.width, canvas.height));
        };
        let editor = mode == RenderMode::Editor;
        let base = base_draw_size(image.width, image.height, canvas);

        let mut frame = self.draw_pass(w16, h16, |ctx| {
            if editor {
                draw_checkerboard(ctx, canvas);
            }
            draw_image(ctx, scene.transform.affine(canvas), image, base);
            if editor && scene.active_tab == EditorTab::Image {
                if scene.show_grid {
                    draw_grid(ctx, canvas);
                }
                draw_image_frame(ctx, scene.transform, canvas, base);
            }
        })?;

        if !scene.text.is_visible() {
            return FrameRGBA::from_premul(canvas.width, canvas.height, frame);
        }

        let shaped = shaper.shape(scene.text);
        let text_width = match &shaped {
            Some(s) => s.width,
            None => fallback_width(&scene.text.content, scene.text.render_size_px()),
        };
        if let (Some(shaped), Some(font)) = (shaped.as_ref(), shaper.font_data().cloned()) {
            let layer = self.draw_pass(w16, h16, |ctx| draw_text(ctx, shaped, &font, scene.text))?;
            let shadow = shadow_from_coverage(
                &layer,
                canvas.width,
                canvas.height,
                Rgb8::BLACK.with_alpha(SHADOW_ALPHA),
                SHADOW_RADIUS_PX,
                SHADOW_SIGMA,
            )?;
            over_offset_in_place(
                &mut frame,
                &shadow,
                canvas.width,
                canvas.height,
                SHADOW_OFFSET_PX,
                SHADOW_OFFSET_PX,
            )?;
            over_in_place(&mut frame, &layer, 1.0)?;
        }

        if editor && (scene.active_tab == EditorTab::Text || scene.drag.is_text_drag()) {
            let sel = scene.text.selection_box(text_width);
            let layer = self.draw_pass(w16, h16, |ctx| draw_selection_box(ctx, sel))?;
            over_in_place(&mut frame, &layer, 1.0)?;
        }

        FrameRGBA::from_premul(canvas.width, canvas.height, frame)
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> EditorResult<R>,
    ) -> EditorResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Rasterize one layer onto a transparent surface and return its premultiplied bytes.
    fn draw_pass(
        &mut self,
        width: u16,
        height: u16,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> EditorResult<Vec<u8>> {
        self.with_ctx_mut(width, height, |ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            draw(ctx);
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            clear_pixmap_to_transparent(&mut pixmap);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap.data_as_u8_slice().to_vec())
        })
    }
}

fn canvas_dims_u16(canvas: Canvas) -> EditorResult<(u16, u16)> {
    canvas.validate()?;
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| EditorError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| EditorError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn color(c: Rgb8, a: u8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, a)
}

fn draw_checkerboard(ctx: &mut vello_cpu::RenderContext, canvas: Canvas) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    let cell = f64::from(CHECKER_CELL_PX);
    for i in 0..canvas.width.div_ceil(CHECKER_CELL_PX) {
        for j in 0..canvas.height.div_ceil(CHECKER_CELL_PX) {
            let c = if (i + j) % 2 == 0 {
                CHECKER_DARK
            } else {
                CHECKER_LIGHT
            };
            ctx.set_paint(color(c, 255));
            let x = f64::from(i) * cell;
            let y = f64::from(j) * cell;
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + cell, y + cell));
        }
    }
}

/// Draw the image stretched over its base box, centered on the local origin.
fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    local_to_canvas: Affine,
    image: &LoadedImage,
    base: Size,
) {
    let iw = f64::from(image.width);
    let ih = f64::from(image.height);
    let tr = local_to_canvas
        * Affine::translate((-base.width / 2.0, -base.height / 2.0))
        * Affine::scale_non_uniform(base.width / iw, base.height / ih);
    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint(image.paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
}

fn draw_grid(ctx: &mut vello_cpu::RenderContext, canvas: Canvas) {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let mut path = BezPath::new();
    for k in [1.0, 2.0] {
        path.move_to((k * w / 3.0, 0.0));
        path.line_to((k * w / 3.0, h));
        path.move_to((0.0, k * h / 3.0));
        path.line_to((w, k * h / 3.0));
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(GRID_LINE_WIDTH));
    ctx.set_paint(color(Rgb8::WHITE, GRID_ALPHA));
    ctx.stroke_path(&bezpath_to_cpu(&path));
}

/// Bounding quad of the transformed image plus a round handle on each corner.
fn draw_image_frame(
    ctx: &mut vello_cpu::RenderContext,
    transform: &ImageTransform,
    canvas: Canvas,
    base: Size,
) {
    let [tl, tr, bl, br] = transform.corners(canvas, base).map(|(_, p)| p);
    let mut quad = BezPath::new();
    quad.move_to(tl);
    quad.line_to(tr);
    quad.line_to(br);
    quad.line_to(bl);
    quad.close_path();

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(FRAME_LINE_WIDTH));
    ctx.set_paint(color(ACCENT, 255));
    ctx.stroke_path(&bezpath_to_cpu(&quad));

    for p in [tl, tr, bl, br] {
        let dot = bezpath_to_cpu(&handle_path(p));
        ctx.set_paint(color(Rgb8::WHITE, 255));
        ctx.fill_path(&dot);
        ctx.set_paint(color(ACCENT, 255));
        ctx.stroke_path(&dot);
    }
}

fn handle_path(center: Point) -> BezPath {
    kurbo::Circle::new(center, HANDLE_RADIUS_PX).to_path(0.1)
}

/// Black outline first, then the fill, both centered on the overlay position.
fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    shaped: &ShapedText,
    font: &vello_cpu::peniko::FontData,
    text: &TextOverlay,
) {
    let origin = Affine::translate((
        text.position.x - shaped.width / 2.0,
        text.position.y - shaped.height / 2.0,
    ));
    ctx.set_transform(affine_to_cpu(origin));
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(text.stroke_width())
            .with_join(vello_cpu::kurbo::Join::Round)
            .with_miter_limit(TEXT_MITER_LIMIT),
    );

    ctx.set_paint(color(Rgb8::BLACK, 255));
    for run in &shaped.runs {
        ctx.glyph_run(font)
            .font_size(run.font_size)
            .stroke_glyphs(run.glyphs.iter().copied());
    }
    for run in &shaped.runs {
        let b = run.brush;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
        ctx.glyph_run(font)
            .font_size(run.font_size)
            .fill_glyphs(run.glyphs.iter().copied());
    }
}

fn draw_selection_box(ctx: &mut vello_cpu::RenderContext, rect: Rect) {
    let dashed: BezPath = kurbo::dash(rect.path_elements(0.1), 0.0, &SELECTION_DASH).collect();
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(SELECTION_LINE_WIDTH));
    ctx.set_paint(color(Rgb8::WHITE, 255));
    ctx.stroke_path(&bezpath_to_cpu(&dashed));
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> EditorResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| EditorError::decode("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| EditorError::decode("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(EditorError::decode("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> EditorResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

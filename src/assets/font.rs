use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{EditorError, EditorResult};
use crate::model::text::{TEXT_FONT_WEIGHT, TextOverlay};

/// Advance per character, in ems, used to estimate text width when no font is available.
pub(crate) const FALLBACK_ADVANCE_EM: f64 = 0.6;

/// Where the overlay font comes from.
#[derive(Clone, Debug, Default)]
pub enum FontSource {
    /// Heaviest matching sans-serif face found among system fonts.
    #[default]
    System,
    /// Font file bytes supplied by the host.
    Bytes(Arc<Vec<u8>>),
    /// Font file on disk.
    Path(PathBuf),
    /// No font: text width is estimated and glyphs are not drawn.
    None,
}

#[derive(Clone, Debug)]
pub(crate) struct FontFace {
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) index: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// One shaped glyph run, positioned relative to the layout's top-left corner.
#[derive(Clone, Debug)]
pub(crate) struct ShapedRun {
    pub(crate) font_size: f32,
    pub(crate) brush: TextBrushRgba8,
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
}

#[derive(Clone, Debug)]
pub(crate) struct ShapedText {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) runs: Vec<ShapedRun>,
}

pub(crate) fn resolve_font(source: &FontSource) -> Option<FontFace> {
    match source {
        FontSource::None => None,
        FontSource::Bytes(bytes) => Some(FontFace {
            bytes: Arc::clone(bytes),
            index: 0,
        }),
        FontSource::Path(path) => match std::fs::read(path) {
            Ok(bytes) => Some(FontFace {
                bytes: Arc::new(bytes),
                index: 0,
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read font file");
                None
            }
        },
        FontSource::System => system_face(),
    }
}

fn system_face() -> Option<FontFace> {
    static FACE: OnceLock<Option<FontFace>> = OnceLock::new();
    FACE.get_or_init(find_system_face).clone()
}

fn find_system_face() -> Option<FontFace> {
    use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

    let mut db = Database::new();
    db.load_system_fonts();

    let families = [
        Family::Name("Inter"),
        Family::Name("DejaVu Sans"),
        Family::Name("Liberation Sans"),
        Family::Name("Arial"),
        Family::SansSerif,
    ];
    let query = Query {
        families: &families,
        weight: Weight(TEXT_FONT_WEIGHT),
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))?;
    let face = db.with_face_data(id, |data, index| FontFace {
        bytes: Arc::new(data.to_vec()),
        index,
    });
    if face.is_none() {
        tracing::warn!("system font face data unavailable");
    }
    face
}

/// Parley contexts bound to one registered font family.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `face` and remember its family name.
    pub(crate) fn new(face: &FontFace) -> EditorResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            EditorError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| EditorError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Shape and lay out plain text as a single unwrapped block.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// Measures and shapes the overlay text, falling back to an estimate without a font.
pub(crate) struct TextShaper {
    engine: Option<TextLayoutEngine>,
    font_data: Option<vello_cpu::peniko::FontData>,
}

impl TextShaper {
    pub(crate) fn new(source: &FontSource) -> Self {
        let Some(face) = resolve_font(source) else {
            if !matches!(source, FontSource::None) {
                tracing::warn!("no usable font; text width is estimated and glyphs are skipped");
            }
            return Self::without_font();
        };
        match TextLayoutEngine::new(&face) {
            Ok(engine) => {
                tracing::debug!(family = %engine.family_name, "text font ready");
                let font_data = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                    face.index,
                );
                Self {
                    engine: Some(engine),
                    font_data: Some(font_data),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "font rejected; falling back to estimated text width");
                Self::without_font()
            }
        }
    }

    pub(crate) fn without_font() -> Self {
        Self {
            engine: None,
            font_data: None,
        }
    }

    pub(crate) fn font_data(&self) -> Option<&vello_cpu::peniko::FontData> {
        self.font_data.as_ref()
    }

    /// Advance width of the overlay text; zero when the overlay is hidden.
    pub(crate) fn measure_width(&mut self, overlay: &TextOverlay) -> f64 {
        if !overlay.is_visible() {
            return 0.0;
        }
        match self.shape(overlay) {
            Some(shaped) => shaped.width,
            None => fallback_width(&overlay.content, overlay.render_size_px()),
        }
    }

    /// Shape the overlay text; `None` without a font or for hidden overlays.
    pub(crate) fn shape(&mut self, overlay: &TextOverlay) -> Option<ShapedText> {
        if !overlay.is_visible() {
            return None;
        }
        let engine = self.engine.as_mut()?;
        let layout =
            engine.layout_plain(&overlay.content, overlay.render_size_px(), overlay.color.into());
        Some(collect_runs(&layout))
    }
}

fn collect_runs(layout: &parley::Layout<TextBrushRgba8>) -> ShapedText {
    let mut width = 0.0f64;
    let mut height = 0.0f64;
    let mut runs = Vec::new();
    for line in layout.lines() {
        let m = line.metrics();
        width = width.max(f64::from(m.advance));
        height += f64::from(m.ascent + m.descent + m.leading);

        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                continue;
            };
            let mut x = glyph_run.offset();
            let y = glyph_run.baseline();
            let glyphs = glyph_run
                .glyphs()
                .map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    };
                    x += g.advance;
                    glyph
                })
                .collect();
            runs.push(ShapedRun {
                font_size: glyph_run.run().font_size(),
                brush: glyph_run.style().brush,
                glyphs,
            });
        }
    }
    ShapedText {
        width,
        height,
        runs,
    }
}

pub(crate) fn fallback_width(text: &str, size_px: f32) -> f64 {
    FALLBACK_ADVANCE_EM * f64::from(size_px) * text.chars().count() as f64
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;

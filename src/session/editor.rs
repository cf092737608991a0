use crate::assets::decode::{LoadedImage, load_image};
use crate::assets::font::{FontSource, TextShaper};
use crate::assets::source::{FetchedImage, ImageSource, PixelAccess};
use crate::export::png::{ExportedImage, encode_png};
use crate::foundation::core::{Canvas, Point, Rgb8, Size};
use crate::foundation::error::{EditorError, EditorResult};
use crate::interact::drag::{DragState, EditorTab, HitTargets, apply_drag, begin_drag};
use crate::interact::pointer::{CursorHint, PointerEvent, PointerKind, Viewport, WheelEvent};
use crate::model::text::{TextOverlay, parse_text_size};
use crate::model::transform::{ImageTransform, base_draw_size};
use crate::render::backend::{FrameRGBA, RenderMode};
use crate::render::cpu::{CpuRenderer, Scene};

// Default text anchor sits at 400/512 of the canvas height, horizontally centered.
const DEFAULT_TEXT_Y_FRACTION: f64 = 400.0 / 512.0;

/// Options for an editing session.
#[derive(Clone, Debug, Default)]
pub struct EditorOpts {
    pub(crate) canvas: Canvas,
    pub(crate) font: FontSource,
    pub(crate) text_position: Option<Point>,
}

impl EditorOpts {
    /// Return options with a different editing surface size.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Return options with a different overlay font.
    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    /// Return options with a different initial text position (canvas space).
    pub fn with_text_position(mut self, position: Point) -> Self {
        self.text_position = Some(position);
        self
    }

    fn initial_text_position(&self) -> Point {
        self.text_position.unwrap_or_else(|| {
            Point::new(
                f64::from(self.canvas.width) / 2.0,
                f64::from(self.canvas.height) * DEFAULT_TEXT_Y_FRACTION,
            )
        })
    }
}

/// Where the source image is in its load lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Waiting for the host to deliver bytes.
    Pending,
    /// Decoded and drawable.
    Loaded,
    /// Fetch or decode failed and no earlier image is available; the editor stays blank.
    Failed,
}

/// The drawable image and the most recently requested one.
///
/// A new request never evicts `current`; only a successful load of `requested` replaces it.
struct SourceImage {
    requested: String,
    in_flight: bool,
    current: Option<LoadedImage>,
}

impl SourceImage {
    fn pending(url: String) -> Self {
        Self {
            requested: url,
            in_flight: true,
            current: None,
        }
    }

    fn awaits(&self, url: &str) -> bool {
        self.in_flight && self.requested == url
    }

    fn status(&self) -> LoadStatus {
        match (self.in_flight, &self.current) {
            (true, _) => LoadStatus::Pending,
            (false, Some(_)) => LoadStatus::Loaded,
            (false, None) => LoadStatus::Failed,
        }
    }
}

/// One sticker composition: a single image layer under a single text layer.
///
/// Created by [`EditorSession::open`], consumed by [`EditorSession::save`] or
/// [`EditorSession::cancel`]. All mutation happens on the caller's thread.
pub struct EditorSession {
    canvas: Canvas,
    image: SourceImage,
    base_size: Size,
    transform: ImageTransform,
    text: TextOverlay,
    drag: DragState,
    active_tab: EditorTab,
    show_grid: bool,
    viewport: Viewport,

    shaper: TextShaper,
    renderer: CpuRenderer,
}

impl EditorSession {
    /// Start editing `source_url`. The session is pending until the host delivers the image.
    #[tracing::instrument(skip_all, fields(w = opts.canvas.width, h = opts.canvas.height))]
    pub fn open(source_url: impl Into<String>, opts: EditorOpts) -> EditorResult<Self> {
        opts.canvas.validate()?;
        let text = TextOverlay {
            position: opts.initial_text_position(),
            ..TextOverlay::default()
        };
        Ok(Self {
            canvas: opts.canvas,
            image: SourceImage::pending(source_url.into()),
            base_size: Size::ZERO,
            transform: ImageTransform::default(),
            text,
            drag: DragState::None,
            active_tab: EditorTab::Image,
            show_grid: true,
            viewport: Viewport::identity(opts.canvas),
            shaper: TextShaper::new(&opts.font),
            renderer: CpuRenderer::new(),
        })
    }

    /// [`EditorSession::open`] followed by [`EditorSession::resolve_load`].
    pub fn open_with(
        source_url: impl Into<String>,
        source: &dyn ImageSource,
        opts: EditorOpts,
    ) -> EditorResult<Self> {
        let mut session = Self::open(source_url, opts)?;
        session.resolve_load(source);
        Ok(session)
    }

    /// Fetch the pending image through `source`. No-op unless a load is pending.
    pub fn resolve_load(&mut self, source: &dyn ImageSource) {
        if !self.image.in_flight {
            tracing::debug!("resolve_load without a pending image");
            return;
        }
        let url = self.image.requested.clone();
        let fetched = source.fetch(&url);
        self.finish_load(&url, fetched);
    }

    /// Complete the load of `url` with the host's fetch result.
    ///
    /// Results for anything other than the currently pending URL are stale and dropped.
    /// Failures are logged, not returned; any previously loaded image stays in place.
    #[tracing::instrument(skip(self, fetched), fields(ok = fetched.is_ok()))]
    pub fn finish_load(&mut self, url: &str, fetched: EditorResult<FetchedImage>) {
        if !self.image.awaits(url) {
            tracing::debug!(requested = %self.image.requested, "dropping stale load result");
            return;
        }
        self.image.in_flight = false;

        match fetched.and_then(|f| load_image(url, f)) {
            Ok(img) => {
                self.base_size = base_draw_size(img.width, img.height, self.canvas);
                self.transform.reset();
                self.drag = DragState::None;
                tracing::debug!(
                    w = img.width,
                    h = img.height,
                    base_w = self.base_size.width,
                    base_h = self.base_size.height,
                    "source image loaded"
                );
                self.image.current = Some(img);
            }
            Err(e) if self.image.current.is_some() => {
                tracing::warn!(error = %e, "replacement image failed to load; keeping the previous one");
            }
            Err(e) => {
                tracing::warn!(error = %e, "source image failed to load; editor stays blank");
            }
        }
    }

    /// Request a different source image.
    ///
    /// The session is pending until the new image resolves. Until then the previous image (if
    /// any) keeps being drawn, hit-tested and exported.
    pub fn load(&mut self, url: impl Into<String>) {
        let url = url.into();
        tracing::debug!(%url, "source image superseded");
        self.image.requested = url;
        self.image.in_flight = true;
    }

    /// Feed a pointer event in canvas coordinates.
    pub fn pointer(&mut self, ev: PointerEvent) {
        match ev.kind {
            PointerKind::Down => {
                if self.image.current.is_none() {
                    return;
                }
                let text_width = self.shaper.measure_width(&self.text);
                let targets = HitTargets {
                    canvas: self.canvas,
                    active_tab: self.active_tab,
                    transform: &self.transform,
                    base_size: self.base_size,
                    text: &self.text,
                    text_width,
                };
                self.drag = begin_drag(&targets, ev.position);
                if let Some(tab) = self.drag.forced_tab() {
                    self.active_tab = tab;
                }
                tracing::debug!(drag = ?self.drag, "drag started");
            }
            PointerKind::Move => {
                apply_drag(
                    &self.drag,
                    ev.position,
                    self.canvas,
                    &mut self.transform,
                    &mut self.text,
                );
            }
            PointerKind::Up | PointerKind::Leave => {
                if self.drag.is_active() {
                    tracing::debug!("drag ended");
                }
                self.drag = DragState::None;
            }
        }
    }

    /// Feed a pointer event in client coordinates, mapped through the current viewport.
    pub fn client_pointer(&mut self, ev: PointerEvent) {
        let position = self.viewport.to_canvas(self.canvas, ev.position);
        self.pointer(PointerEvent { position, ..ev });
    }

    /// Set where the canvas is displayed in client space.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Mouse-wheel zoom.
    pub fn wheel(&mut self, ev: WheelEvent) {
        self.transform.zoom_by_wheel(ev.delta_y);
    }

    /// Replace the overlay text; empty text hides the overlay.
    pub fn set_text(&mut self, content: impl Into<String>) {
        self.text.content = content.into();
    }

    /// Set the overlay fill color.
    pub fn set_text_color(&mut self, color: Rgb8) {
        self.text.color = color;
    }

    /// Set the overlay fill color from `#rrggbb` / `#rgb`.
    pub fn set_text_color_hex(&mut self, hex: &str) -> EditorResult<()> {
        self.text.color = Rgb8::from_hex(hex)?;
        Ok(())
    }

    /// Set the font size in pixels; stored as given.
    pub fn set_text_size(&mut self, size_px: i32) {
        self.text.size_px = size_px;
    }

    /// Parse and set the font size; invalid input leaves the size untouched.
    pub fn set_text_size_str(&mut self, input: &str) -> EditorResult<()> {
        self.text.size_px = parse_text_size(input)?;
        Ok(())
    }

    /// Move the overlay (canvas space, unclamped).
    pub fn set_text_position(&mut self, position: Point) {
        self.text.position = position;
    }

    /// Set the image scale (clamped).
    pub fn set_scale(&mut self, scale: f64) {
        self.transform.set_scale(scale);
    }

    /// Set the image rotation in degrees.
    pub fn set_rotation(&mut self, rotation_deg: f64) {
        self.transform.set_rotation(rotation_deg);
    }

    /// Add `delta_deg` to the image rotation.
    pub fn rotate_by(&mut self, delta_deg: f64) {
        self.transform.rotate_by(delta_deg);
    }

    /// Zoom in (`steps > 0`) or out by whole button steps.
    pub fn step_zoom(&mut self, steps: i32) {
        self.transform.step_scale(steps);
    }

    /// Restore the default framing.
    pub fn reset_image(&mut self) {
        self.transform.reset();
    }

    /// Switch the control tab.
    pub fn set_tab(&mut self, tab: EditorTab) {
        self.active_tab = tab;
    }

    /// Show or hide the rule-of-thirds grid.
    pub fn set_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    /// Editing surface.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// URL most recently requested, whether pending, loaded or failed.
    pub fn source_url(&self) -> &str {
        &self.image.requested
    }

    /// URL of the image currently drawn, if any.
    pub fn displayed_url(&self) -> Option<&str> {
        self.image.current.as_ref().map(|img| img.url.as_str())
    }

    /// Load lifecycle of the most recent request.
    pub fn load_status(&self) -> LoadStatus {
        self.image.status()
    }

    /// Pre-scale draw size of the drawn image; zero until one has loaded.
    pub fn base_size(&self) -> Size {
        self.base_size
    }

    /// Image framing.
    pub fn transform(&self) -> &ImageTransform {
        &self.transform
    }

    /// Text overlay.
    pub fn text(&self) -> &TextOverlay {
        &self.text
    }

    /// Measured advance width of the overlay text.
    pub fn text_width(&mut self) -> f64 {
        self.shaper.measure_width(&self.text)
    }

    /// Current drag.
    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// Active control tab.
    pub fn active_tab(&self) -> EditorTab {
        self.active_tab
    }

    /// Whether the grid is shown.
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Cursor for the current interaction.
    pub fn cursor(&self) -> CursorHint {
        self.drag.cursor()
    }

    /// Render the editor view, overlays included.
    pub fn render(&mut self) -> EditorResult<FrameRGBA> {
        self.render_mode(RenderMode::Editor)
    }

    /// Full repaint of the current state in `mode`.
    pub fn render_mode(&mut self, mode: RenderMode) -> EditorResult<FrameRGBA> {
        let scene = Scene {
            canvas: self.canvas,
            image: self.image.current.as_ref(),
            transform: &self.transform,
            text: &self.text,
            active_tab: self.active_tab,
            show_grid: self.show_grid,
            drag: self.drag,
        };
        self.renderer.render(&scene, &mut self.shaper, mode)
    }

    /// Flatten image and text to PNG without ending the session.
    #[tracing::instrument(skip(self), fields(url = ?self.displayed_url()))]
    pub fn export_png(&mut self) -> EditorResult<ExportedImage> {
        let img = self
            .image
            .current
            .as_ref()
            .ok_or_else(|| EditorError::not_ready("source image is not loaded"))?;
        if img.pixel_access == PixelAccess::Restricted {
            return Err(EditorError::tainted(
                "source image pixels are cross-origin restricted",
            ));
        }
        let frame = self.render_mode(RenderMode::Export)?;
        encode_png(&frame)
    }

    /// Export the composite and end the session.
    pub fn save(mut self) -> EditorResult<ExportedImage> {
        let out = self.export_png()?;
        tracing::debug!(bytes = out.png.len(), "session saved");
        Ok(out)
    }

    /// End the session without producing anything.
    pub fn cancel(self) {
        tracing::debug!(url = %self.image.requested, "session cancelled");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;

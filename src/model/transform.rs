use crate::foundation::core::{Affine, Canvas, Point, Size, Vec2};

/// Smallest allowed image scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed image scale.
pub const MAX_SCALE: f64 = 5.0;
/// Scale change per unit of wheel `delta_y`.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;
/// Scale change of one zoom step (the `-`/`+` buttons).
pub const SCALE_STEP: f64 = 0.1;
/// Rotation change of one rotate step, in degrees.
pub const ROTATION_STEP_DEG: f64 = 90.0;

/// Clamp a scale value into `[MIN_SCALE, MAX_SCALE]`.
///
/// Idempotent: clamping an already clamped value returns it unchanged.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// One of the four corner handles of the image's bounding quadrilateral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    /// Top-left.
    TopLeft,
    /// Top-right.
    TopRight,
    /// Bottom-left.
    BottomLeft,
    /// Bottom-right.
    BottomRight,
}

impl Corner {
    /// All corners in hit-test priority order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Local-space position of this corner on a centered rectangle of `base` size.
    pub fn local_point(self, base: Size) -> Point {
        let hw = base.width / 2.0;
        let hh = base.height / 2.0;
        match self {
            Corner::TopLeft => Point::new(-hw, -hh),
            Corner::TopRight => Point::new(hw, -hh),
            Corner::BottomLeft => Point::new(-hw, hh),
            Corner::BottomRight => Point::new(hw, hh),
        }
    }
}

/// Scale, rotation and screen-space translation of the source image.
///
/// `offset` displaces the image pivot from the canvas center. `scale` always lies in
/// `[MIN_SCALE, MAX_SCALE]`; `rotation_deg` is stored exactly as given.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "TransformRepr", into = "TransformRepr")]
pub struct ImageTransform {
    scale: f64,
    rotation_deg: f64,
    offset: Vec2,
}

#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
struct TransformRepr {
    scale: f64,
    rotation_deg: f64,
    offset_x: f64,
    offset_y: f64,
}

impl From<TransformRepr> for ImageTransform {
    fn from(r: TransformRepr) -> Self {
        let mut t = ImageTransform::default();
        t.set_scale(r.scale);
        t.set_rotation(r.rotation_deg);
        t.set_offset(Vec2::new(r.offset_x, r.offset_y));
        t
    }
}

impl From<ImageTransform> for TransformRepr {
    fn from(t: ImageTransform) -> Self {
        Self {
            scale: t.scale,
            rotation_deg: t.rotation_deg,
            offset_x: t.offset.x,
            offset_y: t.offset.y,
        }
    }
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_deg: 0.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ImageTransform {
    /// Build a transform, clamping `scale`.
    pub fn new(scale: f64, rotation_deg: f64, offset: Vec2) -> Self {
        let mut t = Self::default();
        t.set_scale(scale);
        t.set_rotation(rotation_deg);
        t.set_offset(offset);
        t
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current rotation in degrees (not normalized).
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// Current pivot displacement from the canvas center.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Reset to identity (`scale = 1`, no rotation, no offset).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Store a new scale, clamped. NaN is ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.scale = clamp_scale(scale);
    }

    /// Store a new rotation in degrees. Any finite value is accepted unmodified.
    pub fn set_rotation(&mut self, rotation_deg: f64) {
        if rotation_deg.is_finite() {
            self.rotation_deg = rotation_deg;
        }
    }

    /// Store a new pivot offset. Non-finite components are ignored.
    pub fn set_offset(&mut self, offset: Vec2) {
        if offset.is_finite() {
            self.offset = offset;
        }
    }

    /// Apply a wheel zoom: positive `delta_y` zooms out.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) {
        self.set_scale(self.scale - delta_y * WHEEL_ZOOM_SENSITIVITY);
    }

    /// Apply `steps` zoom steps of [`SCALE_STEP`] (negative zooms out).
    pub fn step_scale(&mut self, steps: i32) {
        self.set_scale(self.scale + f64::from(steps) * SCALE_STEP);
    }

    /// Add `delta_deg` to the rotation.
    pub fn rotate_by(&mut self, delta_deg: f64) {
        self.set_rotation(self.rotation_deg + delta_deg);
    }

    /// Screen-space pivot: canvas center plus offset.
    pub fn pivot(&self, canvas: Canvas) -> Point {
        canvas.center() + self.offset
    }

    /// Local image space to canvas space: rotate, then scale, then translate to the pivot.
    pub fn affine(&self, canvas: Canvas) -> Affine {
        Affine::translate(self.pivot(canvas).to_vec2())
            * Affine::scale(self.scale)
            * Affine::rotate(self.rotation_deg.to_radians())
    }

    /// Map a local image-space point to canvas space.
    pub fn to_screen(&self, canvas: Canvas, local: Point) -> Point {
        self.affine(canvas) * local
    }

    /// Canvas-space positions of the four handles, in hit-test priority order.
    pub fn corners(&self, canvas: Canvas, base: Size) -> [(Corner, Point); 4] {
        let a = self.affine(canvas);
        Corner::ALL.map(|c| (c, a * c.local_point(base)))
    }
}

/// Pre-scale draw size of an image that covers the whole canvas while keeping its aspect ratio.
///
/// The image is fitted to the canvas width first; if that leaves the height short, it is fitted
/// to the canvas height instead. Degenerate images produce a zero size.
pub fn base_draw_size(image_width: u32, image_height: u32, canvas: Canvas) -> Size {
    if image_width == 0 || image_height == 0 {
        return Size::ZERO;
    }
    let aspect = f64::from(image_width) / f64::from(image_height);
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);

    let mut w = cw;
    let mut h = cw / aspect;
    if h < ch {
        h = ch;
        w = ch * aspect;
    }
    Size::new(w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/model/transform.rs"]
mod tests;

use super::*;

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn scale_is_clamped_on_every_mutation() {
    let mut t = ImageTransform::default();
    for s in [-3.0, 0.0, 0.05, 5.0001, 1e9, f64::INFINITY, f64::NEG_INFINITY] {
        t.set_scale(s);
        assert!((MIN_SCALE..=MAX_SCALE).contains(&t.scale()), "{s}");
    }
    t.set_scale(7.0);
    assert_eq!(t.scale(), MAX_SCALE);
    t.set_scale(f64::NAN);
    assert_eq!(t.scale(), MAX_SCALE);

    assert_eq!(ImageTransform::new(0.0, 0.0, Vec2::ZERO).scale(), MIN_SCALE);
}

#[test]
fn clamp_is_idempotent() {
    for s in [-1.0, 0.1, 0.7, 5.0, 12.0] {
        let once = clamp_scale(s);
        assert_eq!(clamp_scale(once), once);
    }
}

#[test]
fn reset_maps_origin_to_canvas_center() {
    let canvas = Canvas::new(512, 300).unwrap();
    let mut t = ImageTransform::new(3.0, 47.0, Vec2::new(12.0, -8.0));
    t.reset();
    assert_eq!(t.to_screen(canvas, Point::ORIGIN), canvas.center());
    t.reset();
    assert_eq!(t, ImageTransform::default());
}

#[test]
fn to_screen_rotates_then_scales_then_translates() {
    let canvas = Canvas::default();
    let t = ImageTransform::new(2.0, 90.0, Vec2::ZERO);
    let p = t.to_screen(canvas, Point::new(10.0, 0.0));
    assert!(approx(p, canvas.center() + Vec2::new(0.0, 20.0)), "{p:?}");

    let t = ImageTransform::new(0.5, 0.0, Vec2::new(4.0, 6.0));
    let p = t.to_screen(canvas, Point::new(10.0, -10.0));
    assert!(approx(p, Point::new(256.0 + 5.0 + 4.0, 256.0 - 5.0 + 6.0)));
}

#[test]
fn rotation_is_not_normalized() {
    let mut t = ImageTransform::default();
    t.set_rotation(450.0);
    assert_eq!(t.rotation_deg(), 450.0);
    t.rotate_by(-ROTATION_STEP_DEG);
    assert_eq!(t.rotation_deg(), 360.0);
    t.set_rotation(f64::NAN);
    assert_eq!(t.rotation_deg(), 360.0);

    let canvas = Canvas::default();
    let a = ImageTransform::new(1.0, 450.0, Vec2::ZERO).to_screen(canvas, Point::new(10.0, 0.0));
    let b = ImageTransform::new(1.0, 90.0, Vec2::ZERO).to_screen(canvas, Point::new(10.0, 0.0));
    assert!(approx(a, b));
}

#[test]
fn wheel_and_step_zoom_follow_editor_controls() {
    let mut t = ImageTransform::default();
    t.zoom_by_wheel(100.0);
    assert!((t.scale() - 0.9).abs() < 1e-12);
    t.zoom_by_wheel(-10_000.0);
    assert_eq!(t.scale(), MAX_SCALE);
    t.step_scale(-1);
    assert!((t.scale() - 4.9).abs() < 1e-12);
    t.step_scale(-100);
    assert_eq!(t.scale(), MIN_SCALE);
}

#[test]
fn cover_fit_base_size() {
    let canvas = Canvas::default();
    // Landscape image: height fits, width overflows.
    let s = base_draw_size(200, 100, canvas);
    assert_eq!(s, Size::new(1024.0, 512.0));
    // Portrait image: width fits, height overflows.
    let s = base_draw_size(100, 400, canvas);
    assert_eq!(s, Size::new(512.0, 2048.0));
    // Square on a wide canvas.
    let s = base_draw_size(64, 64, Canvas::new(300, 100).unwrap());
    assert_eq!(s, Size::new(300.0, 300.0));
    assert_eq!(base_draw_size(0, 10, canvas), Size::ZERO);
}

#[test]
fn corners_are_in_priority_order() {
    let canvas = Canvas::default();
    let t = ImageTransform::default();
    let c = t.corners(canvas, Size::new(100.0, 50.0));
    assert_eq!(c[0], (Corner::TopLeft, Point::new(206.0, 231.0)));
    assert_eq!(c[1], (Corner::TopRight, Point::new(306.0, 231.0)));
    assert_eq!(c[2], (Corner::BottomLeft, Point::new(206.0, 281.0)));
    assert_eq!(c[3], (Corner::BottomRight, Point::new(306.0, 281.0)));
}

#[test]
fn serde_roundtrip_clamps_scale() {
    let t: ImageTransform = serde_json::from_str(
        r#"{"scale": 9.0, "rotation_deg": -30.0, "offset_x": 1.5, "offset_y": 2.0}"#,
    )
    .unwrap();
    assert_eq!(t.scale(), MAX_SCALE);
    assert_eq!(t.rotation_deg(), -30.0);
    assert_eq!(t.offset(), Vec2::new(1.5, 2.0));
}

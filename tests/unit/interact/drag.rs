use super::*;

const BASE: Size = Size::new(200.0, 100.0);

fn targets<'a>(
    tab: EditorTab,
    transform: &'a ImageTransform,
    text: &'a TextOverlay,
) -> HitTargets<'a> {
    HitTargets {
        canvas: Canvas::default(),
        active_tab: tab,
        transform,
        base_size: BASE,
        text,
        text_width: 100.0,
    }
}

fn text_at(x: f64, y: f64) -> TextOverlay {
    TextOverlay {
        content: "hello".to_string(),
        position: Point::new(x, y),
        size_px: 40,
        ..TextOverlay::default()
    }
}

#[test]
fn handle_hit_radius_is_inclusive() {
    let t = ImageTransform::default();
    let canvas = Canvas::default();
    // Top-left corner of a 200x100 base at identity sits at (156, 206).
    let tl = Point::new(156.0, 206.0);
    assert_eq!(
        hit_handle(&t, canvas, BASE, tl + Vec2::new(20.0, 0.0)),
        Some(Corner::TopLeft)
    );
    assert_eq!(
        hit_handle(&t, canvas, BASE, tl + Vec2::new(0.0, -20.0)),
        Some(Corner::TopLeft)
    );
    assert_eq!(
        hit_handle(&t, canvas, BASE, tl + Vec2::new(-20.0001, 0.0)),
        None
    );
}

#[test]
fn handles_win_over_text_on_image_tab() {
    let t = ImageTransform::default();
    // Text sitting right on top of the bottom-right handle (356, 306).
    let text = text_at(356.0, 306.0);
    let d = begin_drag(
        &targets(EditorTab::Image, &t, &text),
        Point::new(356.0, 306.0),
    );
    assert!(matches!(
        d,
        DragState::ResizeCorner {
            corner: Corner::BottomRight,
            initial_scale,
            ..
        } if initial_scale == 1.0
    ));
    assert_eq!(d.forced_tab(), None);
    assert_eq!(d.cursor(), CursorHint::ResizeNwSe);
}

#[test]
fn handles_are_ignored_on_text_tab() {
    let t = ImageTransform::default();
    let text = text_at(10.0, 10.0);
    let d = begin_drag(
        &targets(EditorTab::Text, &t, &text),
        Point::new(156.0, 206.0),
    );
    // Text tab with visible text drags the text even when the pointer misses it.
    assert!(d.is_text_drag());
    assert_eq!(d.forced_tab(), Some(EditorTab::Text));
}

#[test]
fn text_hit_switches_to_text_drag() {
    let t = ImageTransform::default();
    let text = text_at(256.0, 256.0);
    let d = begin_drag(
        &targets(EditorTab::Image, &t, &text),
        Point::new(256.0 + 50.0 + 20.0, 256.0),
    );
    assert_eq!(
        d,
        DragState::DragText {
            start: Point::new(326.0, 256.0),
            initial_position: Point::new(256.0, 256.0),
        }
    );
}

#[test]
fn misses_fall_back_to_pan() {
    let t = ImageTransform::new(1.0, 0.0, Vec2::new(5.0, -5.0));
    let empty = TextOverlay::default();
    let d = begin_drag(
        &targets(EditorTab::Text, &t, &empty),
        Point::new(256.0, 256.0),
    );
    assert_eq!(
        d,
        DragState::PanImage {
            start: Point::new(256.0, 256.0),
            initial_offset: Vec2::new(5.0, -5.0),
        }
    );
    assert_eq!(d.forced_tab(), Some(EditorTab::Image));
    assert_eq!(d.cursor(), CursorHint::Move);
}

#[test]
fn pan_applies_exact_delta() {
    let canvas = Canvas::default();
    let mut t = ImageTransform::new(2.0, 30.0, Vec2::new(1.0, 1.0));
    let mut text = TextOverlay::default();
    let d = DragState::PanImage {
        start: Point::new(100.0, 100.0),
        initial_offset: t.offset(),
    };
    apply_drag(&d, Point::new(130.0, 90.0), canvas, &mut t, &mut text);
    assert_eq!(t.offset(), Vec2::new(31.0, -9.0));
    assert_eq!(t.scale(), 2.0);
    assert_eq!(t.rotation_deg(), 30.0);
}

#[test]
fn text_drag_is_unbounded() {
    let canvas = Canvas::default();
    let mut t = ImageTransform::default();
    let mut text = text_at(10.0, 10.0);
    let d = DragState::DragText {
        start: Point::new(0.0, 0.0),
        initial_position: text.position,
    };
    apply_drag(&d, Point::new(-900.0, 2000.0), canvas, &mut t, &mut text);
    assert_eq!(text.position, Point::new(-890.0, 2010.0));
}

#[test]
fn resize_is_uniform_across_corners() {
    let canvas = Canvas::default();
    let pivot = canvas.center();
    let mut results = Vec::new();
    for corner in Corner::ALL {
        let mut t = ImageTransform::default();
        let mut text = TextOverlay::default();
        let start = pivot + Vec2::new(100.0, 0.0);
        let d = DragState::ResizeCorner {
            corner,
            start,
            initial_scale: 1.0,
        };
        apply_drag(&d, pivot + Vec2::new(150.0, 0.0), canvas, &mut t, &mut text);
        results.push(t.scale());
    }
    assert!(results.iter().all(|s| *s == results[0]));
    assert!((results[0] - 1.5).abs() < 1e-12);
}

#[test]
fn resize_clamps_and_skips_zero_distance() {
    let canvas = Canvas::default();
    let pivot = canvas.center();
    let mut text = TextOverlay::default();

    let mut t = ImageTransform::default();
    let d = DragState::ResizeCorner {
        corner: Corner::TopLeft,
        start: pivot + Vec2::new(1.0, 0.0),
        initial_scale: 1.0,
    };
    apply_drag(&d, pivot + Vec2::new(500.0, 0.0), canvas, &mut t, &mut text);
    assert_eq!(t.scale(), 5.0);

    let mut t = ImageTransform::new(1.7, 0.0, Vec2::ZERO);
    let d = DragState::ResizeCorner {
        corner: Corner::TopLeft,
        start: pivot,
        initial_scale: 1.7,
    };
    apply_drag(&d, pivot + Vec2::new(40.0, 0.0), canvas, &mut t, &mut text);
    assert_eq!(t.scale(), 1.7);
}

#[test]
fn none_state_ignores_moves() {
    let canvas = Canvas::default();
    let mut t = ImageTransform::default();
    let mut text = TextOverlay::default();
    apply_drag(
        &DragState::None,
        Point::new(1.0, 1.0),
        canvas,
        &mut t,
        &mut text,
    );
    assert_eq!(t, ImageTransform::default());
    assert!(!DragState::None.is_active());
}

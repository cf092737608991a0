use super::*;

#[test]
fn viewport_scales_client_coordinates() {
    let canvas = Canvas::default();
    let vp = Viewport::new(Rect::new(100.0, 50.0, 356.0, 306.0));
    assert_eq!(
        vp.to_canvas(canvas, Point::new(100.0, 50.0)),
        Point::new(0.0, 0.0)
    );
    assert_eq!(
        vp.to_canvas(canvas, Point::new(228.0, 178.0)),
        Point::new(256.0, 256.0)
    );

    let id = Viewport::identity(canvas);
    assert_eq!(
        id.to_canvas(canvas, Point::new(12.5, 7.0)),
        Point::new(12.5, 7.0)
    );
}

#[test]
fn degenerate_viewport_maps_to_origin() {
    let vp = Viewport::new(Rect::new(10.0, 10.0, 10.0, 40.0));
    assert_eq!(
        vp.to_canvas(Canvas::default(), Point::new(99.0, 99.0)),
        Point::ORIGIN
    );
}

#[test]
fn touches_use_first_point_only() {
    let touches = [Point::new(1.0, 2.0), Point::new(50.0, 60.0)];
    let ev = PointerEvent::from_touches(PointerKind::Down, &touches).unwrap();
    assert_eq!(ev, PointerEvent::down(1.0, 2.0));

    assert!(PointerEvent::from_touches(PointerKind::Move, &[]).is_none());
    let end = PointerEvent::from_touches(PointerKind::Up, &[]).unwrap();
    assert_eq!(end.kind, PointerKind::Up);
}

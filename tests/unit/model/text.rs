use super::*;

fn overlay(content: &str) -> TextOverlay {
    TextOverlay {
        content: content.to_string(),
        position: Point::new(100.0, 100.0),
        size_px: 40,
        ..TextOverlay::default()
    }
}

#[test]
fn defaults_match_editor() {
    let t = TextOverlay::default();
    assert!(!t.is_visible());
    assert_eq!(t.color, Rgb8::WHITE);
    assert_eq!(t.size_px, 60);
    assert_eq!(t.position, Point::new(256.0, 400.0));
}

#[test]
fn boxes_use_independent_margins() {
    let t = overlay("hi");
    let b = t.text_box(80.0);
    assert_eq!(b, Rect::new(60.0, 80.0, 140.0, 120.0));
    assert_eq!(t.hit_box(80.0), Rect::new(40.0, 60.0, 160.0, 140.0));
    assert_eq!(t.selection_box(80.0), Rect::new(45.0, 65.0, 155.0, 135.0));
}

#[test]
fn hit_test_is_inclusive_and_ignores_empty_text() {
    let t = overlay("hi");
    assert!(t.hit_test(80.0, Point::new(160.0, 140.0)));
    assert!(t.hit_test(80.0, Point::new(40.0, 60.0)));
    assert!(!t.hit_test(80.0, Point::new(160.01, 100.0)));
    assert!(!overlay("").hit_test(80.0, Point::new(100.0, 100.0)));
}

#[test]
fn degenerate_sizes_render_with_a_positive_size() {
    let mut t = overlay("x");
    t.size_px = -20;
    assert_eq!(t.render_size_px(), MIN_RENDER_TEXT_SIZE_PX);
    t.size_px = i32::MAX;
    assert_eq!(t.render_size_px(), MAX_RENDER_TEXT_SIZE_PX);
    t.size_px = 0;
    assert!(t.text_box(10.0).height() > 0.0);
    t.size_px = 60;
    assert_eq!(t.stroke_width(), 5.0);
}

#[test]
fn text_size_parsing_accepts_any_integer() {
    assert_eq!(parse_text_size(" 72 ").unwrap(), 72);
    assert_eq!(parse_text_size("-5").unwrap(), -5);
    assert!(parse_text_size("big").is_err());
    assert!(parse_text_size("").is_err());
}

#[test]
fn text_size_parsing_keeps_the_leading_integer() {
    assert_eq!(parse_text_size("42px").unwrap(), 42);
    assert_eq!(parse_text_size("12.7").unwrap(), 12);
    assert_eq!(parse_text_size("+8").unwrap(), 8);
    assert_eq!(parse_text_size("99999999999").unwrap(), i32::MAX);
    assert_eq!(parse_text_size("-99999999999").unwrap(), i32::MIN);
    assert!(parse_text_size("-").is_err());
    assert!(parse_text_size("px42").is_err());
    assert!(parse_text_size(".5").is_err());
}

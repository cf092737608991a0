use super::*;

#[test]
fn canvas_validation_and_center() {
    let c = Canvas::new(512, 256).unwrap();
    assert_eq!(c.center(), Point::new(256.0, 128.0));
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::default(), Canvas::new(512, 512).unwrap());
}

#[test]
fn rgb_hex_parsing_and_formatting() {
    assert_eq!(Rgb8::from_hex("#ffffff").unwrap(), Rgb8::WHITE);
    assert_eq!(Rgb8::from_hex("FF3366").unwrap(), Rgb8::new(0xff, 0x33, 0x66));
    assert_eq!(Rgb8::from_hex("#0f8").unwrap(), Rgb8::new(0x00, 0xff, 0x88));
    assert_eq!(Rgb8::new(1, 2, 255).to_hex(), "#0102ff");
    assert!(Rgb8::from_hex("#12345").is_err());
    assert!(Rgb8::from_hex("#gg0000").is_err());
    assert!(Rgb8::from_hex("#ééé").is_err());
}

#[test]
fn rgb_serde_uses_hex_strings() {
    let c: Rgb8 = serde_json::from_str("\"#6366f1\"").unwrap();
    assert_eq!(c, Rgb8::new(0x63, 0x66, 0xf1));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#6366f1\"");
    assert!(serde_json::from_str::<Rgb8>("\"nope\"").is_err());
}

#[test]
fn premultiply_rounds_to_nearest() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgb8::BLACK.with_alpha(204).to_array(), [0, 0, 0, 204]);
}

use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100u8, 50u8, 200u8, 128u8]);

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, EditorError::Decode(_)));
}

#[test]
fn load_image_keeps_access_and_dimensions() {
    let buf = png_bytes(3, 2, vec![255u8; 3 * 2 * 4]);
    let loaded = load_image(
        "mem://x.png",
        FetchedImage {
            bytes: buf,
            pixel_access: PixelAccess::Restricted,
        },
    )
    .unwrap();
    assert_eq!((loaded.width, loaded.height), (3, 2));
    assert_eq!(loaded.pixel_access, PixelAccess::Restricted);
    assert_eq!(loaded.url, "mem://x.png");
}

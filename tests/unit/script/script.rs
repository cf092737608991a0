use std::io::Cursor;

use super::*;
use crate::assets::font::FontSource;
use crate::assets::source::FetchedImage;
use crate::foundation::core::{Canvas, Vec2};
use crate::session::editor::EditorOpts;

fn session() -> EditorSession {
    let img = image::RgbaImage::from_raw(2, 2, vec![255u8; 16]).unwrap();
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let mut s = EditorSession::open(
        "mem://a.png",
        EditorOpts::default()
            .with_canvas(Canvas::new(64, 64).unwrap())
            .with_font(FontSource::None),
    )
    .unwrap();
    s.finish_load("mem://a.png", Ok(FetchedImage::readable(png)));
    s
}

#[test]
fn parses_tagged_ops() {
    let script = EditScript::from_json(
        r##"{ "steps": [
            { "op": "set_text", "text": "yo" },
            { "op": "set_text_color", "color": "#00ff00" },
            { "op": "set_text_size", "size": 40 },
            { "op": "set_text_size", "size": "41" },
            { "op": "drag", "from": [30, 30], "to": [35, 20] },
            { "op": "pointer_up" },
            { "op": "set_tab", "tab": "text" }
        ] }"##,
    )
    .unwrap();
    assert_eq!(script.steps.len(), 7);
    assert_eq!(
        script.steps[2],
        EditOp::SetTextSize {
            size: TextSizeInput::Px(40)
        }
    );
    assert_eq!(
        script.steps[3],
        EditOp::SetTextSize {
            size: TextSizeInput::Raw("41".to_string())
        }
    );
    assert_eq!(script.steps[5], EditOp::PointerUp);
}

#[test]
fn unknown_ops_are_validation_errors() {
    let err = EditScript::from_json(r#"{ "steps": [ { "op": "undo" } ] }"#).unwrap_err();
    assert!(matches!(err, EditorError::Validation(_)));
}

#[test]
fn apply_replays_in_order() {
    let mut s = session();
    let script = EditScript {
        steps: vec![
            EditOp::Drag {
                from: [30.0, 30.0],
                to: [35.0, 20.0],
            },
            EditOp::ZoomStep { steps: 3 },
            EditOp::RotateBy { degrees: -90.0 },
            EditOp::SetText {
                text: "hey".to_string(),
            },
            EditOp::SetGrid { show: false },
        ],
    };
    script.apply(&mut s).unwrap();
    assert_eq!(s.transform().offset(), Vec2::new(5.0, -10.0));
    assert!((s.transform().scale() - 1.3).abs() < 1e-9);
    assert_eq!(s.transform().rotation_deg(), -90.0);
    assert_eq!(s.text().content, "hey");
    assert!(!s.show_grid());
    assert_eq!(s.drag(), crate::interact::drag::DragState::None);
}

#[test]
fn failing_step_reports_its_index() {
    let mut s = session();
    let script = EditScript {
        steps: vec![
            EditOp::SetScale { scale: 2.0 },
            EditOp::SetTextSize {
                size: TextSizeInput::Raw("big".to_string()),
            },
        ],
    };
    let err = script.apply(&mut s).unwrap_err();
    assert!(err.to_string().contains("step 1"));
    assert_eq!(s.transform().scale(), 2.0);
}

#[test]
fn missing_script_file_is_an_error() {
    assert!(EditScript::from_path("target/no-such-script.json").is_err());
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

use caption_studio::io::serialization::{export_snapshot, import_snapshot};
use caption_studio::overlay::element::{Handle, PointerTarget};
use caption_studio::render::font::FontFace;
use caption_studio::util::geometry::{Point, Size};
use caption_studio::{
    BackgroundKind, BackgroundRef, CaptionUpdate, Editor, EditorConfig, EditorError,
    LoadStateRequest,
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([20, 120, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn editor() -> Editor {
    Editor::with_font(EditorConfig::default(), FontFace::builtin().unwrap())
}

#[test]
fn compose_export_and_reedit() {
    let mut editor = editor();
    assert!(!editor.has_background());
    assert!(matches!(editor.export_blob(), Err(EditorError::NoBackground)));

    editor
        .load_background_blocking(BackgroundRef::from_bytes(png(1000, 500)), BackgroundKind::Upload)
        .unwrap();
    assert_eq!(editor.document().canvas_size(), (800, 400));

    // Overlay shown at half size
    editor.set_overlay_size(Size::new(400.0, 200.0));

    let top = editor.add_caption();
    editor.update_caption(top, CaptionUpdate::Text("TOP TEXT".into()));
    editor.update_caption(top, CaptionUpdate::Color("#ff0".into()));
    let bottom = editor.add_caption_at(50.0, 300.0);
    editor.update_caption(bottom, CaptionUpdate::Text("BOTTOM TEXT".into()));

    // Drag the top caption 20 screen pixels right
    let element = editor.overlay().element(top).unwrap().rect;
    let grab = Point::new(element.x + 2.0, element.y + 2.0);
    editor.pointer_down(PointerTarget::Body(top), grab);
    editor.pointer_move(Point::new(grab.x + 20.0, grab.y));
    editor.pointer_up();
    let moved = editor.document().caption(top).unwrap();
    assert_eq!(moved.x, 300.0 + 40.0);
    assert_eq!(moved.color, "#FFFF00");

    // Grow the bottom caption from its south-east corner
    let rect = editor.overlay().element(bottom).unwrap().rect;
    let corner = Point::new(rect.right(), rect.bottom());
    editor.pointer_down(PointerTarget::Handle(bottom, Handle::SouthEast), corner);
    editor.pointer_move(Point::new(corner.x + 10.0, corner.y + rect.height / 2.0));
    editor.pointer_up();
    let grown = editor.document().caption(bottom).unwrap();
    assert!((grown.font_size - 60.0).abs() < 1e-6);
    assert_eq!((grown.x, grown.y), (50.0, 300.0));

    let blob = editor.export_blob().unwrap();
    let exported = image::load_from_memory(&blob).unwrap();
    assert_eq!((exported.width(), exported.height()), (800, 400));

    // Save, reset, restore
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caption.json");
    export_snapshot(&editor.get_state(), &path).unwrap();
    let state = editor.get_state();

    editor.reset();
    assert!(!editor.has_background());
    assert!(editor.document().captions().is_empty());

    let snapshot = import_snapshot(&path).unwrap();
    editor
        .load_state_blocking(LoadStateRequest {
            image_url: None,
            canvas_state: snapshot,
        })
        .unwrap();
    assert!(editor.has_background());
    assert_eq!(editor.get_state(), state);

    let restored = editor.export_blob().unwrap();
    assert_eq!(image::load_from_memory(&restored).unwrap().width(), 800);
}

#[test]
fn failed_reedit_leaves_editor_untouched() {
    let mut editor = editor();
    editor.add_caption();
    let before = editor.get_state();

    let mut state = before.clone();
    state.background_ref = Some("/no/such/background.png".to_string());
    let result = editor.load_state_blocking(LoadStateRequest {
        image_url: None,
        canvas_state: state,
    });

    assert!(matches!(result, Err(EditorError::Io { .. })));
    assert_eq!(editor.get_state(), before);
}

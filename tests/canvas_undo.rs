//! Drawing surface history and frame tests through the public API.

use image::RgbaImage;
use sketchguess::canvas::frame::decode_payload;
use sketchguess::canvas::types::BACKGROUND;
use sketchguess::canvas::{DrawingSurface, InputEvent, Point, Tool};

fn surface() -> DrawingSurface {
    DrawingSurface::new(40, 30, 4.0, 10).expect("valid surface")
}

fn stroke(surface: &mut DrawingSurface, from: (f32, f32), to: (f32, f32)) {
    surface
        .handle_input(InputEvent::PointerDown(Point::new(from.0, from.1)))
        .expect("down");
    surface
        .handle_input(InputEvent::PointerMove(Point::new(to.0, to.1)))
        .expect("move");
    surface.handle_input(InputEvent::PointerUp).expect("up");
}

#[test]
fn undo_after_n_operations_restores_each_prior_state() {
    for n in 1..=10usize {
        let mut s = surface();
        let mut before: Vec<RgbaImage> = Vec::new();
        for i in 0..n {
            before.push(s.raster().clone());
            if i % 4 == 3 {
                s.clear().expect("clear");
            } else {
                let y = (i as f32 * 3.0) % 28.0 + 1.0;
                stroke(&mut s, (1.0, y), (38.0, 29.0 - y));
            }
        }
        for expected in before.iter().rev() {
            s.undo().expect("undo").expect("history not empty");
            assert_eq!(s.raster(), expected, "n = {n}");
        }
        assert!(s.undo().expect("undo").is_none());
        assert!(!s.can_undo());
    }
}

#[test]
fn history_keeps_only_the_newest_ten() {
    let mut s = surface();
    for i in 0..12 {
        let x = i as f32 * 3.0 + 1.0;
        stroke(&mut s, (x, 1.0), (x, 28.0));
    }
    assert_eq!(s.undo_depth(), 10);
    let mut undone = 0;
    while s.undo().expect("undo").is_some() {
        undone += 1;
    }
    assert_eq!(undone, 10);
    // The first two strokes are permanent.
    assert_ne!(s.raster(), &RgbaImage::from_pixel(40, 30, BACKGROUND));
}

#[test]
fn clear_frame_is_fully_background() {
    let mut s = surface();
    stroke(&mut s, (0.0, 0.0), (39.0, 29.0));
    let frame = s.clear().expect("clear");

    let decoded = decode_payload(&frame.to_data_uri()).expect("decode");
    assert_eq!(decoded, RgbaImage::from_pixel(40, 30, BACKGROUND));
    assert_eq!((frame.width(), frame.height()), (40, 30));
}

#[test]
fn eraser_restores_background_under_its_path() {
    let mut s = surface();
    stroke(&mut s, (2.0, 15.0), (38.0, 15.0));
    s.set_tool(Tool::Eraser);
    stroke(&mut s, (2.0, 15.0), (38.0, 15.0));

    assert_eq!(s.raster().get_pixel(20, 15), &BACKGROUND);
    assert_eq!(s.undo_depth(), 2);
}

#[test]
fn stroke_without_movement_paints_nothing() {
    let mut s = surface();
    s.handle_input(InputEvent::PointerDown(Point::new(10.0, 10.0)))
        .expect("down");
    let frame = s
        .handle_input(InputEvent::PointerLeave)
        .expect("leave")
        .expect("stroke ended");

    assert_eq!(
        frame.decode().expect("decode"),
        RgbaImage::from_pixel(40, 30, BACKGROUND)
    );
    assert!(s.can_undo(), "snapshot was still taken on stroke start");
}

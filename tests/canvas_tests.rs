use egui::Color32;
use lienzo::canvas::{PixelBuffer, RasterCanvas, MAX_UNDO_STEPS};

fn all_white(buffer: &PixelBuffer) -> bool {
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if buffer.get(x, y) != Some(Color32::WHITE) {
                return false;
            }
        }
    }
    true
}

#[test]
fn new_canvas_is_white_with_default_pen() {
    let canvas = RasterCanvas::new(100, 100);
    assert!(all_white(canvas.buffer()));
    assert_eq!(canvas.pen_color(), Color32::BLACK);
    assert_eq!(canvas.pen_width(), 3);
    assert!(!canvas.is_drawing());
}

#[test]
fn undo_restores_pre_stroke_buffer_and_redo_restores_post_stroke() {
    let mut canvas = RasterCanvas::new(100, 100);
    let before = canvas.buffer().clone();

    canvas.begin_stroke((10, 10));
    canvas.extend_stroke((40, 40));
    canvas.extend_stroke((60, 20));
    canvas.end_stroke();
    let after = canvas.buffer().clone();
    assert_ne!(before, after);

    canvas.undo();
    assert_eq!(*canvas.buffer(), before);

    canvas.redo();
    assert_eq!(*canvas.buffer(), after);
}

#[test]
fn all_segments_of_one_stroke_undo_as_a_unit() {
    let mut canvas = RasterCanvas::new(100, 100);
    canvas.begin_stroke((5, 5));
    canvas.extend_stroke((20, 5));
    canvas.extend_stroke((20, 20));
    canvas.extend_stroke((5, 20));
    canvas.end_stroke();

    assert_eq!(canvas.undo_steps(), 1);
    canvas.undo();
    assert!(all_white(canvas.buffer()));
}

#[test]
fn starting_a_stroke_discards_pending_redo_entries() {
    let mut canvas = RasterCanvas::new(50, 50);
    canvas.begin_stroke((10, 10));
    canvas.extend_stroke((20, 20));
    canvas.end_stroke();

    canvas.undo();
    assert_eq!(canvas.redo_steps(), 1);

    canvas.begin_stroke((30, 30));
    assert_eq!(canvas.redo_steps(), 0);
    canvas.end_stroke();
}

#[test]
fn single_dot_stroke_with_width_one_undoes_to_white() {
    let mut canvas = RasterCanvas::new(100, 100);
    canvas.set_pen_color(Color32::RED);
    canvas.set_pen_width(1);

    canvas.begin_stroke((10, 10));
    canvas.extend_stroke((10, 10));
    canvas.end_stroke();
    assert_eq!(canvas.buffer().get(10, 10), Some(Color32::RED));
    assert_eq!(canvas.buffer().get(12, 10), Some(Color32::WHITE));

    canvas.undo();
    assert!(all_white(canvas.buffer()));
}

#[test]
fn resize_keeps_top_left_content_and_pads_with_white() {
    let mut canvas = RasterCanvas::new(50, 50);
    canvas.set_pen_color(Color32::RED);
    canvas.set_pen_width(1);
    canvas.begin_stroke((5, 5));
    canvas.extend_stroke((5, 5));
    canvas.end_stroke();

    canvas.resize(80, 80);
    assert_eq!(canvas.width(), 80);
    assert_eq!(canvas.height(), 80);
    assert_eq!(canvas.buffer().get(5, 5), Some(Color32::RED));
    assert_eq!(canvas.buffer().get(70, 70), Some(Color32::WHITE));
}

#[test]
fn shrinking_then_growing_back_clips_to_white() {
    let mut canvas = RasterCanvas::new(50, 50);
    canvas.set_pen_color(Color32::BLUE);
    canvas.begin_stroke((40, 40));
    canvas.extend_stroke((45, 45));
    canvas.end_stroke();

    canvas.resize(20, 20);
    canvas.resize(50, 50);

    for y in 0..50 {
        for x in 0..50 {
            if x >= 20 || y >= 20 {
                assert_eq!(
                    canvas.buffer().get(x, y),
                    Some(Color32::WHITE),
                    "clipped region must come back white at ({x}, {y})"
                );
            }
        }
    }
}

#[test]
fn resize_does_not_touch_history() {
    let mut canvas = RasterCanvas::new(50, 50);
    canvas.begin_stroke((10, 10));
    canvas.extend_stroke((15, 15));
    canvas.end_stroke();
    canvas.undo();

    canvas.resize(30, 30);
    assert_eq!(canvas.undo_steps(), 0);
    assert_eq!(canvas.redo_steps(), 1);
}

#[test]
fn clear_whitens_everything_without_touching_history() {
    let mut canvas = RasterCanvas::new(50, 50);
    canvas.begin_stroke((10, 10));
    canvas.extend_stroke((30, 30));
    canvas.end_stroke();
    canvas.undo();
    canvas.redo();

    let undo_before = canvas.undo_steps();
    let redo_before = canvas.redo_steps();
    canvas.clear();

    assert!(all_white(canvas.buffer()));
    assert_eq!(canvas.undo_steps(), undo_before);
    assert_eq!(canvas.redo_steps(), redo_before);
}

#[test]
fn undo_and_redo_on_empty_history_are_noops() {
    let mut canvas = RasterCanvas::new(30, 30);
    canvas.undo();
    canvas.redo();
    assert!(all_white(canvas.buffer()));
    assert_eq!(canvas.undo_steps(), 0);
    assert_eq!(canvas.redo_steps(), 0);
}

#[test]
fn extend_outside_a_stroke_paints_nothing() {
    let mut canvas = RasterCanvas::new(30, 30);
    canvas.extend_stroke((10, 10));
    assert!(all_white(canvas.buffer()));

    canvas.begin_stroke((5, 5));
    canvas.end_stroke();
    canvas.extend_stroke((10, 10));
    assert!(all_white(canvas.buffer()));
}

#[test]
fn pen_width_is_clamped_to_at_least_one() {
    let mut canvas = RasterCanvas::new(30, 30);
    canvas.set_pen_width(0);
    assert_eq!(canvas.pen_width(), 1);
    canvas.set_pen_width(12);
    assert_eq!(canvas.pen_width(), 12);
}

#[test]
fn undo_history_is_capped_by_evicting_the_oldest_snapshot() {
    let mut canvas = RasterCanvas::new(10, 10);
    for i in 0..(MAX_UNDO_STEPS + 5) {
        let p = (i as i32 % 10, i as i32 % 10);
        canvas.begin_stroke(p);
        canvas.extend_stroke(p);
        canvas.end_stroke();
    }
    assert_eq!(canvas.undo_steps(), MAX_UNDO_STEPS);
}

#[test]
fn segments_are_clipped_at_the_buffer_edge() {
    let mut canvas = RasterCanvas::new(20, 20);
    canvas.set_pen_width(5);
    canvas.begin_stroke((18, 18));
    canvas.extend_stroke((25, 25));
    canvas.end_stroke();

    assert_eq!(canvas.buffer().get(19, 19), Some(Color32::BLACK));
    assert_eq!(canvas.buffer().get(25, 25), None);
}

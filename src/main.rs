use eframe::egui;

use lienzo::app::DrawingApp;
use lienzo::logging;

const WINDOW_WIDTH: f32 = 1024.0;
const WINDOW_HEIGHT: f32 = 768.0;

fn main() -> eframe::Result<()> {
    logging::init();

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(WINDOW_WIDTH, WINDOW_HEIGHT)),
        ..Default::default()
    };
    eframe::run_native(
        "Lienzo",
        native_options,
        Box::new(|_cc| Box::new(DrawingApp::default())),
    )
}

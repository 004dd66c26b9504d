use std::path::PathBuf;

use eframe::egui;
use egui::{Color32, Pos2, Rect, TextureHandle, TextureOptions};
use rfd::FileDialog;
use tracing::error;

use crate::canvas::RasterCanvas;
use crate::error::CanvasError;

const INITIAL_CANVAS_WIDTH: usize = 800;
const INITIAL_CANVAS_HEIGHT: usize = 600;

/// The controller: owns one `RasterCanvas`, translates pointer and command
/// events into canvas operations, and blits the buffer each frame. All the
/// window chrome lives here; the canvas never pushes anything back.
pub struct DrawingApp {
    canvas: RasterCanvas,
    texture: Option<TextureHandle>,
    texture_dirty: bool,
    last_save_path: Option<PathBuf>,
    error_message: Option<String>,
    show_error: bool,
}

impl Default for DrawingApp {
    fn default() -> Self {
        Self {
            canvas: RasterCanvas::new(INITIAL_CANVAS_WIDTH, INITIAL_CANVAS_HEIGHT),
            texture: None,
            texture_dirty: true,
            last_save_path: None,
            error_message: None,
            show_error: false,
        }
    }
}

impl DrawingApp {
    fn choose_open_path() -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("Image Files", &["png", "jpg", "jpeg", "bmp"])
            .add_filter("PNG Image", &["png"])
            .add_filter("JPEG Image", &["jpg", "jpeg"])
            .add_filter("BMP Image", &["bmp"])
            .pick_file()
    }

    fn choose_save_path() -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .add_filter("JPEG Image", &["jpg", "jpeg"])
            .add_filter("BMP Image", &["bmp"])
            .save_file()
    }

    fn open_image(&mut self) {
        if let Some(path) = Self::choose_open_path() {
            match self.canvas.load(&path) {
                Ok(()) => {
                    self.texture_dirty = true;
                    self.last_save_path = Some(path);
                }
                Err(e) => self.report_error(e),
            }
        }
    }

    fn save_image_as(&mut self) {
        if let Some(path) = Self::choose_save_path() {
            self.save_to(path);
        }
    }

    /// Saves to the last used path, falling back to the save dialog.
    fn quick_save(&mut self) {
        match self.last_save_path.clone() {
            Some(path) => self.save_to(path),
            None => self.save_image_as(),
        }
    }

    fn save_to(&mut self, path: PathBuf) {
        match self.canvas.save(&path) {
            Ok(()) => self.last_save_path = Some(path),
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, err: CanvasError) {
        error!("{err}");
        self.error_message = Some(err.to_string());
        self.show_error = true;
    }

    fn update_texture(&mut self, ctx: &egui::Context) {
        if self.texture_dirty || self.texture.is_none() {
            let size = [self.canvas.width(), self.canvas.height()];
            let image =
                egui::ColorImage::from_rgba_unmultiplied(size, &self.canvas.buffer().to_rgba_bytes());
            self.texture = Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST));
            self.texture_dirty = false;
        }
    }
}

fn to_buffer_coords(pos: Pos2, rect: Rect) -> (i32, i32) {
    ((pos.x - rect.min.x) as i32, (pos.y - rect.min.y) as i32)
}

impl eframe::App for DrawingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keyboard shortcuts
        let ctrl = ctx.input(|i| i.modifiers.ctrl);
        let shift = ctx.input(|i| i.modifiers.shift);
        if ctrl {
            if ctx.input(|i| i.key_pressed(egui::Key::Z)) && !shift {
                self.canvas.undo();
                self.texture_dirty = true;
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Y))
                || shift && ctx.input(|i| i.key_pressed(egui::Key::Z))
            {
                self.canvas.redo();
                self.texture_dirty = true;
            }
            if ctx.input(|i| i.key_pressed(egui::Key::S)) {
                self.quick_save();
            }
        }

        if self.show_error {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(self.error_message.as_deref().unwrap_or("An error occurred"));
                    if ui.button("OK").clicked() {
                        self.show_error = false;
                    }
                });
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    self.canvas.clear();
                    self.texture_dirty = true;
                }
                if ui.button("Undo").clicked() {
                    self.canvas.undo();
                    self.texture_dirty = true;
                }
                if ui.button("Redo").clicked() {
                    self.canvas.redo();
                    self.texture_dirty = true;
                }

                ui.separator();

                let mut color = self.canvas.pen_color();
                if ui.color_edit_button_srgba(&mut color).changed() {
                    self.canvas.set_pen_color(color);
                }
                ui.label("Width:");
                let mut width = self.canvas.pen_width();
                if ui
                    .add(egui::DragValue::new(&mut width).speed(0.1).clamp_range(1..=128))
                    .changed()
                {
                    self.canvas.set_pen_width(width);
                }

                ui.separator();

                if ui.button("Open…").clicked() {
                    self.open_image();
                }
                if ui.button("Save…").clicked() {
                    self.save_image_as();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;

            // The buffer tracks the displayed size; old content stays in
            // the top-left, anything clipped by a shrink is lost.
            let width = rect.width().round().max(1.0) as usize;
            let height = rect.height().round().max(1.0) as usize;
            if (width, height) != (self.canvas.width(), self.canvas.height()) {
                self.canvas.resize(width, height);
                self.texture_dirty = true;
            }

            let primary_down = ui.input(|i| i.pointer.primary_down());

            if response.drag_started() && primary_down {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.canvas.begin_stroke(to_buffer_coords(pos, rect));
                }
            }

            // Only forward moves while the button is still held; a missed
            // release event must not keep painting.
            if response.dragged() && primary_down && response.drag_delta() != egui::Vec2::ZERO {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.canvas.extend_stroke(to_buffer_coords(pos, rect));
                    self.texture_dirty = true;
                }
            }

            if response.drag_released() {
                self.canvas.end_stroke();
            }

            self.update_texture(ctx);
            if let Some(texture) = &self.texture {
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
        });
    }
}

use std::path::Path;

use egui::Color32;
use image::imageops::FilterType;
use image::{GenericImageView, Rgb, RgbImage};
use tracing::{debug, info};

use crate::error::CanvasError;
use crate::format::FileFormat;

/// Maximum number of undo snapshots kept; the oldest one is evicted first.
pub const MAX_UNDO_STEPS: usize = 20;

pub const DEFAULT_PEN_WIDTH: u32 = 3;

/// Flat row-major pixel grid. Fully opaque; new buffers start out white.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<Color32>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Color32::WHITE; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Color32> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Color32) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = color;
        }
    }

    pub fn fill(&mut self, color: Color32) {
        self.data.fill(color);
    }

    /// Raw RGBA bytes in row-major order, for texture upload.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for color in &self.data {
            bytes.extend_from_slice(&[color.r(), color.g(), color.b(), color.a()]);
        }
        bytes
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// The drawing model: a pixel buffer, the pen, and snapshot-based
/// undo/redo history.
///
/// A stroke runs from `begin_stroke` to `end_stroke`. The undo snapshot is
/// taken once, at stroke start, so every segment of one stroke undoes
/// atomically as a unit.
pub struct RasterCanvas {
    buffer: PixelBuffer,
    pen_color: Color32,
    pen_width: u32,
    is_drawing: bool,
    last_point: Option<(i32, i32)>,
    undo_stack: Vec<PixelBuffer>,
    redo_stack: Vec<PixelBuffer>,
}

impl RasterCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            pen_color: Color32::BLACK,
            pen_width: DEFAULT_PEN_WIDTH,
            is_drawing: false,
            last_point: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn width(&self) -> usize {
        self.buffer.width
    }

    pub fn height(&self) -> usize {
        self.buffer.height
    }

    pub fn pen_color(&self) -> Color32 {
        self.pen_color
    }

    pub fn set_pen_color(&mut self, color: Color32) {
        self.pen_color = color;
    }

    pub fn pen_width(&self) -> u32 {
        self.pen_width
    }

    /// Widths below 1 are clamped; a zero-width pen would paint nothing.
    pub fn set_pen_width(&mut self, width: u32) {
        self.pen_width = width.max(1);
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn undo_steps(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_steps(&self) -> usize {
        self.redo_stack.len()
    }

    /// Grows or shrinks the buffer to the new size. Old pixels are copied
    /// into the top-left of a fresh white buffer; content clipped away by a
    /// shrink is gone for good. Content is never scaled here, only on an
    /// explicit `load`. History is untouched.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        if new_width == self.buffer.width && new_height == self.buffer.height {
            return;
        }
        let mut new_buffer = PixelBuffer::new(new_width, new_height);
        let copy_width = new_width.min(self.buffer.width);
        let copy_height = new_height.min(self.buffer.height);
        for y in 0..copy_height {
            for x in 0..copy_width {
                if let Some(color) = self.buffer.get(x, y) {
                    new_buffer.set(x, y, color);
                }
            }
        }
        self.buffer = new_buffer;
    }

    /// Starts a stroke at `point`: snapshots the buffer for undo and
    /// invalidates all redo state, since a new edit branch discards the
    /// old future.
    pub fn begin_stroke(&mut self, point: (i32, i32)) {
        self.undo_stack.push(self.buffer.clone());
        if self.undo_stack.len() > MAX_UNDO_STEPS {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.is_drawing = true;
        self.last_point = Some(point);
    }

    /// Renders a segment from the last consumed point to `point` into the
    /// live buffer. Ignored outside a stroke. No snapshot is taken here;
    /// that happened at stroke start.
    pub fn extend_stroke(&mut self, point: (i32, i32)) {
        if !self.is_drawing {
            return;
        }
        let start = self.last_point.unwrap_or(point);
        self.draw_segment(start, point);
        self.last_point = Some(point);
    }

    pub fn end_stroke(&mut self) {
        self.is_drawing = false;
        self.last_point = None;
    }

    /// Fills the buffer white. Clears bypass the undo history.
    pub fn clear(&mut self) {
        self.buffer.fill(Color32::WHITE);
    }

    pub fn undo(&mut self) {
        if let Some(previous) = self.undo_stack.pop() {
            let current = std::mem::replace(&mut self.buffer, previous);
            self.redo_stack.push(current);
            debug!(remaining = self.undo_stack.len(), "undo");
        }
    }

    pub fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            let current = std::mem::replace(&mut self.buffer, next);
            self.undo_stack.push(current);
            debug!(remaining = self.redo_stack.len(), "redo");
        }
    }

    /// Encodes the buffer to `path` in the format implied by its
    /// extension. The canvas itself is unaffected, even on failure.
    pub fn save(&self, path: &Path) -> Result<(), CanvasError> {
        let Some(format) = FileFormat::from_path(path).image_format() else {
            return Err(CanvasError::encode(path, "unsupported file extension"));
        };

        let mut img = RgbImage::new(self.buffer.width as u32, self.buffer.height as u32);
        for y in 0..self.buffer.height {
            for x in 0..self.buffer.width {
                let color = self.buffer.get(x, y).unwrap_or(Color32::WHITE);
                img.put_pixel(x as u32, y as u32, Rgb([color.r(), color.g(), color.b()]));
            }
        }

        img.save_with_format(path, format)
            .map_err(|e| CanvasError::encode(path, e))?;
        info!(path = %path.display(), "canvas saved");
        Ok(())
    }

    /// Decodes the image at `path`, resamples it to fit the current canvas
    /// size (aspect ratio preserved, smooth filter) and places it in the
    /// top-left of a white buffer of the current size. Neither history
    /// stack is touched. On failure the buffer is left unchanged.
    pub fn load(&mut self, path: &Path) -> Result<(), CanvasError> {
        let img = image::open(path).map_err(|e| CanvasError::decode(path, e))?;

        let width = self.buffer.width;
        let height = self.buffer.height;
        let fitted = if img.dimensions() == (width as u32, height as u32) {
            // Already the right size; skipping the filter keeps lossless
            // round-trips pixel-exact.
            img.to_rgb8()
        } else {
            img.resize(width as u32, height as u32, FilterType::CatmullRom)
                .to_rgb8()
        };

        let mut new_buffer = PixelBuffer::new(width, height);
        for (x, y, pixel) in fitted.enumerate_pixels() {
            let Rgb([r, g, b]) = *pixel;
            new_buffer.set(x as usize, y as usize, Color32::from_rgb(r, g, b));
        }
        self.buffer = new_buffer;
        info!(path = %path.display(), "image loaded");
        Ok(())
    }

    /// Round-capped, round-joined solid segment: a Bresenham walk stamping
    /// a filled circle of the pen width at every cell.
    fn draw_segment(&mut self, start: (i32, i32), end: (i32, i32)) {
        let (x0, y0) = start;
        let (x1, y1) = end;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.stamp(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Paints a filled circle of diameter `pen_width` centered on (x, y),
    /// clipped to the buffer.
    fn stamp(&mut self, x: i32, y: i32) {
        let width = self.buffer.width as i32;
        let height = self.buffer.height as i32;
        let radius = self.pen_width as f32 / 2.0;
        let reach = radius.ceil() as i32;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx * dx + dy * dy) as f32 <= radius * radius {
                    let px = x + dx;
                    let py = y + dy;
                    if px >= 0 && px < width && py >= 0 && py < height {
                        self.buffer.set(px as usize, py as usize, self.pen_color);
                    }
                }
            }
        }
    }
}

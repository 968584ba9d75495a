//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use pixnote::{DrawStyle, PixelBuffer, RasterError, RasterSurface, Rect, Rgba};

/// A draw call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Rgba,
        width: f32,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
        fill: Option<Rgba>,
    },
    FilledRect {
        rect: Rect,
        color: Rgba,
        alpha: f32,
    },
    Text {
        text: String,
        at: (f32, f32),
    },
}

/// In-memory surface that stores raw pixels and records every draw call.
///
/// The call log is shared so tests can inspect it after the surface has been
/// moved into an engine.
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pixels: PixelBuffer,
    calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: PixelBuffer::filled(width, height, fill),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_pixels(pixels: PixelBuffer) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<DrawCall>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: DrawCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, rect: Rect) -> Result<(), RasterError> {
        if rect.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(RasterError::OutOfBounds {
                rect,
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl RasterSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get_pixels(&self, rect: Rect) -> Result<PixelBuffer, RasterError> {
        self.check(rect)?;
        let mut out = PixelBuffer::new(rect.width, rect.height);
        for y in 0..rect.height {
            for x in 0..rect.width {
                let p = self.pixels.pixel(rect.x + x, rect.y + y).unwrap();
                out.set_pixel(x, y, p);
            }
        }
        Ok(out)
    }

    fn put_pixels(&mut self, rect: Rect, buffer: &PixelBuffer) -> Result<(), RasterError> {
        self.check(rect)?;
        for y in 0..rect.height {
            for x in 0..rect.width {
                let p = buffer.pixel(x, y).unwrap();
                self.pixels.set_pixel(rect.x + x, rect.y + y, p);
            }
        }
        Ok(())
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: &DrawStyle) {
        self.record(DrawCall::Line {
            from: (x0, y0),
            to: (x1, y1),
            stroke: style.stroke,
            width: style.stroke_width,
        });
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, style: &DrawStyle) {
        self.record(DrawCall::Circle {
            center: (cx, cy),
            radius,
            fill: style.fill,
        });
    }

    fn draw_filled_rect(&mut self, rect: Rect, style: &DrawStyle) {
        self.record(DrawCall::FilledRect {
            rect,
            color: style.fill_color(),
            alpha: style.alpha,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, _style: &DrawStyle) {
        self.record(DrawCall::Text {
            text: text.to_string(),
            at: (x, y),
        });
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

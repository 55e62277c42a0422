use std::path::Path;
use std::rc::Rc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect as PixelRect;
use log::warn;
use rusttype::Font;

use super::glyphs::rasterize;
use crate::geometry::{Point, Rect};
use crate::surface::{Color, Font as TextFont, Surface};

/// Off-screen surface backed by an RGBA buffer, used for snapshots.
/// Corners are drawn square.
pub struct ImageSurface {
    canvas: RgbaImage,
    font: Option<Font<'static>>,
    warned_font: bool,
}

impl ImageSurface {
    pub fn new(font: Option<Font<'static>>) -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
            font,
            warned_font: false,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        self.canvas
            .save(path)
            .map_err(|e| format!("Failed to save image: {}", e))
    }
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

fn pixel_rect(rect: Rect) -> Option<PixelRect> {
    let width = rect.width.round() as i64;
    let height = rect.height.round() as i64;

    if width <= 0 || height <= 0 {
        return None;
    }

    Some(PixelRect::at(rect.x.round() as i32, rect.y.round() as i32).of_size(width as u32, height as u32))
}

impl Surface for ImageSurface {
    type Image = Rc<RgbaImage>;
    type Error = String;

    fn set_size(&mut self, width: u32, height: u32) -> Result<(), Self::Error> {
        if self.canvas.dimensions() != (width, height) {
            self.canvas = RgbaImage::new(width, height);
        }

        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), Self::Error> {
        if let Some(rect) = pixel_rect(rect) {
            draw_filled_rect_mut(&mut self.canvas, rect, Rgba([0, 0, 0, 0]));
        }

        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, _radius: f64, color: Color) -> Result<(), Self::Error> {
        if let Some(rect) = pixel_rect(rect) {
            draw_filled_rect_mut(&mut self.canvas, rect, rgba(color));
        }

        Ok(())
    }

    fn stroke_rect(
        &mut self,
        rect: Rect,
        _radius: f64,
        line_width: f64,
        color: Color,
    ) -> Result<(), Self::Error> {
        // The line is centered on the rectangle's edge.
        let half = (line_width / 2.0).round() as i32;

        for offset in -half..half.max(1) {
            let inset = offset as f64;
            let ring = Rect::new(
                rect.x + inset,
                rect.y + inset,
                rect.width - 2.0 * inset,
                rect.height - 2.0 * inset,
            );

            if let Some(ring) = pixel_rect(ring) {
                draw_hollow_rect_mut(&mut self.canvas, ring, rgba(color));
            }
        }

        Ok(())
    }

    fn draw_image(&mut self, image: &Rc<RgbaImage>, src: Rect, dest: Rect) -> Result<(), Self::Error> {
        let (Some(src), Some(dest)) = (pixel_rect(src), pixel_rect(dest)) else {
            return Ok(());
        };

        let region = imageops::crop_imm(
            &**image,
            src.left().max(0) as u32,
            src.top().max(0) as u32,
            src.width(),
            src.height(),
        )
        .to_image();
        let scaled = imageops::resize(&region, dest.width(), dest.height(), FilterType::Triangle);

        imageops::overlay(&mut self.canvas, &scaled, dest.left() as i64, dest.top() as i64);

        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font: TextFont,
        color: Color,
    ) -> Result<(), Self::Error> {
        let Some(face) = self.font.as_ref() else {
            if !self.warned_font {
                warn!("No font available, tile numbers are not drawn");
                self.warned_font = true;
            }
            return Ok(());
        };

        if let Some(glyphs) = rasterize(face, text, font.size as f32, color) {
            let x = center.x - glyphs.width() as f64 / 2.0;
            let y = center.y - glyphs.height() as f64 / 2.0;

            imageops::overlay(&mut self.canvas, &glyphs, x.round() as i64, y.round() as i64);
        }

        Ok(())
    }
}

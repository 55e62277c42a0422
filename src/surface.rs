use std::convert::Infallible;
use std::fmt::Display;

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const ANTIQUE_WHITE: Color = Color::rgb(250, 235, 215);
    pub const BURLYWOOD: Color = Color::rgb(222, 184, 135);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f64,
    pub bold: bool,
}

impl Font {
    pub fn css(&self) -> String {
        if self.bold {
            format!("bold {}px serif", self.size)
        } else {
            format!("{}px serif", self.size)
        }
    }
}

/// A 2D raster target the puzzle paints onto.
///
/// Rectangles take a corner radius; backends without rounded shapes may draw
/// square corners. Text is centered on the given point.
pub trait Surface {
    /// Raster handle accepted by [`Surface::draw_image`].
    type Image;
    type Error: Display;

    fn set_size(&mut self, width: u32, height: u32) -> Result<(), Self::Error>;

    fn size(&self) -> (u32, u32);

    fn clear_rect(&mut self, rect: Rect) -> Result<(), Self::Error>;

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color) -> Result<(), Self::Error>;

    fn stroke_rect(
        &mut self,
        rect: Rect,
        radius: f64,
        line_width: f64,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn draw_image(&mut self, image: &Self::Image, src: Rect, dest: Rect) -> Result<(), Self::Error>;

    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font: Font,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn clear(&mut self) -> Result<(), Self::Error> {
        let (width, height) = self.size();

        self.clear_rect(Rect::new(0.0, 0.0, width as f64, height as f64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetSize { width: u32, height: u32 },
    Clear(Rect),
    Fill { rect: Rect, radius: f64, color: Color },
    Stroke { rect: Rect, radius: f64, line_width: f64, color: Color },
    Image { image: u32, src: Rect, dest: Rect },
    Text { text: String, center: Point, font: Font, color: Color },
}

/// Surface that records every primitive instead of drawing it. Images are
/// opaque ids.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands since the last full clear.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear(_)))
            .unwrap_or(0);

        &self.commands[start..]
    }
}

impl Surface for RecordingSurface {
    type Image = u32;
    type Error = Infallible;

    fn set_size(&mut self, width: u32, height: u32) -> Result<(), Self::Error> {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::SetSize { width, height });
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Clear(rect));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Fill {
            rect,
            radius,
            color,
        });
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        rect: Rect,
        radius: f64,
        line_width: f64,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Stroke {
            rect,
            radius,
            line_width,
            color,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &u32, src: Rect, dest: Rect) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Image {
            image: *image,
            src,
            dest,
        });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font: Font,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            font,
            color,
        });
        Ok(())
    }
}

use crate::board::{TileValue, BLANK};
use crate::geometry::Rect;
use crate::surface::{Color, Font, Surface};

pub const CORNER_RADIUS: f64 = 10.0;

/// Frame of a single tile, shared by all cells of one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStyle {
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f64,
    pub corner_radius: f64,
}

/// Supplies the content painted inside a non-blank tile.
pub trait TileSource<S: Surface> {
    fn style(&self, grid_size: usize) -> TileStyle;

    fn draw_tile(
        &self,
        surface: &mut S,
        value: TileValue,
        dest: Rect,
        grid_size: usize,
    ) -> Result<(), S::Error>;

    /// Painted over the tile border, after everything else in the cell.
    fn draw_overlay(
        &self,
        _surface: &mut S,
        _value: TileValue,
        _dest: Rect,
    ) -> Result<(), S::Error> {
        Ok(())
    }
}

/// Numbered tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberTiles;

impl<S: Surface> TileSource<S> for NumberTiles {
    fn style(&self, _grid_size: usize) -> TileStyle {
        TileStyle {
            fill: Color::ANTIQUE_WHITE,
            stroke: Color::WHITE,
            line_width: 5.0,
            corner_radius: CORNER_RADIUS,
        }
    }

    fn draw_tile(
        &self,
        surface: &mut S,
        value: TileValue,
        dest: Rect,
        _grid_size: usize,
    ) -> Result<(), S::Error> {
        let font = Font {
            size: dest.width / 4.0,
            bold: false,
        };

        surface.fill_text(&value.to_string(), dest.center(), font, Color::BURLYWOOD)
    }
}

/// A fully loaded picture cut into an implicit N×N grid of source regions.
///
/// Only hosts that have seen the image's load signal can build one, so tiles
/// are never drawn from a half-loaded image.
#[derive(Debug, Clone)]
pub struct ImageAtlas<I> {
    image: I,
    width: u32,
    height: u32,
}

impl<I> ImageAtlas<I> {
    pub fn loaded(image: I, width: u32, height: u32) -> Self {
        Self {
            image,
            width,
            height,
        }
    }

    pub fn image(&self) -> &I {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Region of the picture that belongs to `value` on a solved board.
    pub fn source_rect(&self, value: TileValue, grid_size: usize) -> Option<Rect> {
        if value == BLANK || grid_size == 0 {
            return None;
        }

        let index = (value - 1) as usize;
        let width = self.width as f64 / grid_size as f64;
        let height = self.height as f64 / grid_size as f64;

        Some(Rect::new(
            (index % grid_size) as f64 * width,
            (index / grid_size) as f64 * height,
            width,
            height,
        ))
    }
}

/// Tiles cropped from an [`ImageAtlas`], optionally with a faint numeral
/// drawn over the border.
#[derive(Debug, Clone)]
pub struct ImageTiles<I> {
    atlas: ImageAtlas<I>,
    numbers: bool,
}

impl<I> ImageTiles<I> {
    pub fn new(atlas: ImageAtlas<I>, numbers: bool) -> Self {
        Self { atlas, numbers }
    }

    pub fn atlas(&self) -> &ImageAtlas<I> {
        &self.atlas
    }
}

impl<S: Surface> TileSource<S> for ImageTiles<S::Image> {
    fn style(&self, grid_size: usize) -> TileStyle {
        TileStyle {
            fill: Color::ANTIQUE_WHITE,
            stroke: Color::ANTIQUE_WHITE,
            line_width: 24.0 / grid_size.max(1) as f64,
            corner_radius: CORNER_RADIUS,
        }
    }

    fn draw_tile(
        &self,
        surface: &mut S,
        value: TileValue,
        dest: Rect,
        grid_size: usize,
    ) -> Result<(), S::Error> {
        match self.atlas.source_rect(value, grid_size) {
            Some(src) => surface.draw_image(self.atlas.image(), src, dest),
            None => Ok(()),
        }
    }

    fn draw_overlay(&self, surface: &mut S, value: TileValue, dest: Rect) -> Result<(), S::Error> {
        if !self.numbers {
            return Ok(());
        }

        let font = Font {
            size: dest.width / 3.0,
            bold: true,
        };

        surface.fill_text(
            &value.to_string(),
            dest.center(),
            font,
            Color::WHITE.with_alpha(128),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_rect_matches_solved_position() {
        let atlas = ImageAtlas::loaded((), 300, 600);

        assert_eq!(atlas.source_rect(1, 3), Some(Rect::new(0.0, 0.0, 100.0, 200.0)));
        assert_eq!(atlas.source_rect(5, 3), Some(Rect::new(100.0, 200.0, 100.0, 200.0)));
        assert_eq!(atlas.source_rect(8, 3), Some(Rect::new(100.0, 400.0, 100.0, 200.0)));
        assert_eq!(atlas.source_rect(BLANK, 3), None);
    }
}

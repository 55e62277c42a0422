use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use log::debug;
use rusttype::{point, Font, Scale};

use crate::error::PuzzleError;
use crate::surface::Color;

/// Fonts tried when none is given explicitly.
pub const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\times.ttf",
];

pub fn load_font(path: &Path) -> Result<Font<'static>, PuzzleError> {
    let bytes = fs::read(path)
        .map_err(|e| PuzzleError::Asset(format!("{}: {}", path.display(), e)))?;

    Font::try_from_vec(bytes)
        .ok_or_else(|| PuzzleError::Asset(format!("{}: not a TrueType font", path.display())))
}

pub fn find_system_font() -> Option<Font<'static>> {
    SYSTEM_FONTS.iter().find_map(|path| {
        let font = load_font(Path::new(path)).ok()?;

        debug!("Using font {}", path);

        Some(font)
    })
}

/// Renders `text` onto a transparent image just large enough to hold it.
pub fn rasterize(font: &Font, text: &str, px: f32, color: Color) -> Option<RgbaImage> {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let width = glyphs
        .iter()
        .filter_map(|glyph| glyph.pixel_bounding_box().map(|bounds| bounds.max.x))
        .max()?;
    let height = (v_metrics.ascent - v_metrics.descent).ceil() as i32;

    if width <= 0 || height <= 0 {
        return None;
    }

    let mut image = RgbaImage::new(width as u32, height as u32);

    for glyph in &glyphs {
        if let Some(bounds) = glyph.pixel_bounding_box() {
            glyph.draw(|x, y, coverage| {
                let px = x as i32 + bounds.min.x;
                let py = y as i32 + bounds.min.y;

                if px >= 0 && py >= 0 && px < width && py < height {
                    let alpha = (coverage * color.a as f32) as u8;

                    image.put_pixel(px as u32, py as u32, Rgba([color.r, color.g, color.b, alpha]));
                }
            });
        }
    }

    Some(image)
}

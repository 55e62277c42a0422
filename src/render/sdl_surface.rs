use std::collections::HashMap;
use std::rc::Rc;

use image::RgbaImage;
use log::warn;
use rusttype::Font;
use sdl2::pixels::{Color as SdlColor, PixelFormatEnum};
use sdl2::rect::Rect as SdlRect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use super::glyphs::rasterize;
use crate::geometry::{Point, Rect};
use crate::surface::{Color, Font as TextFont, Surface};

const BACKGROUND: SdlColor = SdlColor::RGB(32, 32, 32);

fn sdl_color(color: Color) -> SdlColor {
    SdlColor::RGBA(color.r, color.g, color.b, color.a)
}

fn sdl_rect(rect: Rect) -> Option<SdlRect> {
    let width = rect.width.round() as i64;
    let height = rect.height.round() as i64;

    if width <= 0 || height <= 0 {
        return None;
    }

    Some(SdlRect::new(
        rect.x.round() as i32,
        rect.y.round() as i32,
        width as u32,
        height as u32,
    ))
}

pub fn texture_from_image(creator: &TextureCreator<WindowContext>, image: &RgbaImage) -> Result<Texture, String> {
    let (width, height) = image.dimensions();
    let mut texture = creator
        .create_texture_static(PixelFormatEnum::RGBA32, width, height)
        .map_err(|e| e.to_string())?;

    texture
        .update(None, image.as_raw(), width as usize * 4)
        .map_err(|e| e.to_string())?;
    texture.set_blend_mode(BlendMode::Blend);

    Ok(texture)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GlyphKey {
    text: String,
    size: u32,
    color: Color,
}

/// Rasterized numerals for one surface size. Glyph sizes follow the tile
/// size, so a new surface size makes every entry stale.
struct GlyphCache<T> {
    size: (u32, u32),
    entries: HashMap<GlyphKey, Option<T>>,
}

impl<T> GlyphCache<T> {
    fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            entries: HashMap::new(),
        }
    }

    fn get_or_insert_with<F>(&mut self, key: GlyphKey, build: F) -> Option<&T>
    where
        F: FnOnce(&GlyphKey) -> Option<T>,
    {
        self.entries.entry(key).or_insert_with_key(build).as_ref()
    }

    /// Returns the evicted entries when `size` differs from the cached one.
    fn resize(&mut self, size: (u32, u32)) -> Vec<T> {
        if self.size == size {
            return Vec::new();
        }

        self.size = size;
        self.entries.drain().filter_map(|(_, entry)| entry).collect()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Window-backed surface. Numerals are rasterized once per text, size and
/// color and kept as textures.
pub struct SdlSurface {
    canvas: Canvas<Window>,
    creator: TextureCreator<WindowContext>,
    font: Option<Font<'static>>,
    glyphs: GlyphCache<Texture>,
    size: (u32, u32),
    warned_font: bool,
}

impl SdlSurface {
    pub fn new(mut canvas: Canvas<Window>, font: Option<Font<'static>>) -> Self {
        canvas.set_blend_mode(BlendMode::Blend);

        let creator = canvas.texture_creator();
        let size = canvas.output_size().unwrap_or((0, 0));

        Self {
            canvas,
            creator,
            font,
            glyphs: GlyphCache::new(size),
            size,
            warned_font: false,
        }
    }

    pub fn load_image(&self, image: &RgbaImage) -> Result<Rc<Texture>, String> {
        texture_from_image(&self.creator, image).map(Rc::new)
    }

    pub fn window_mut(&mut self) -> &mut Window {
        self.canvas.window_mut()
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }
}

impl Surface for SdlSurface {
    type Image = Rc<Texture>;
    type Error = String;

    fn set_size(&mut self, width: u32, height: u32) -> Result<(), Self::Error> {
        // The window is the viewport; the board only claims its top left square.
        for texture in self.glyphs.resize((width, height)) {
            // SAFETY: the canvas that created the texture is still alive.
            unsafe { texture.destroy() };
        }

        self.size = (width, height);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.canvas.set_draw_color(BACKGROUND);
        self.canvas.clear();
        Ok(())
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), Self::Error> {
        if let Some(rect) = sdl_rect(rect) {
            self.canvas.set_draw_color(BACKGROUND);
            self.canvas.fill_rect(rect)?;
        }

        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, _radius: f64, color: Color) -> Result<(), Self::Error> {
        if let Some(rect) = sdl_rect(rect) {
            self.canvas.set_draw_color(sdl_color(color));
            self.canvas.fill_rect(rect)?;
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
        let half = (line_width / 2.0).round() as i32;

        self.canvas.set_draw_color(sdl_color(color));

        for offset in -half..half.max(1) {
            let inset = offset as f64;
            let ring = Rect::new(
                rect.x + inset,
                rect.y + inset,
                rect.width - 2.0 * inset,
                rect.height - 2.0 * inset,
            );

            if let Some(ring) = sdl_rect(ring) {
                self.canvas.draw_rect(ring)?;
            }
        }

        Ok(())
    }

    fn draw_image(&mut self, image: &Rc<Texture>, src: Rect, dest: Rect) -> Result<(), Self::Error> {
        if let (Some(src), Some(dest)) = (sdl_rect(src), sdl_rect(dest)) {
            self.canvas.copy(image, src, dest)?;
        }

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

        let key = GlyphKey {
            text: text.to_string(),
            size: font.size.round().max(1.0) as u32,
            color,
        };
        let creator = &self.creator;
        let cached = self.glyphs.get_or_insert_with(key, |key| {
            let image = rasterize(face, &key.text, key.size as f32, key.color)?;

            texture_from_image(creator, &image)
                .map_err(|e| warn!("Failed to build glyph texture: {}", e))
                .ok()
        });

        let Some(texture) = cached else {
            return Ok(());
        };

        let query = texture.query();
        let dest = SdlRect::from_center(
            (center.x.round() as i32, center.y.round() as i32),
            query.width,
            query.height,
        );

        self.canvas.copy(texture, None, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str, size: u32) -> GlyphKey {
        GlyphKey {
            text: text.to_string(),
            size,
            color: Color::BURLYWOOD,
        }
    }

    #[test]
    fn glyph_cache_builds_each_key_once() {
        let mut cache = GlyphCache::new((300, 300));
        let mut builds = 0;

        for _ in 0..3 {
            cache.get_or_insert_with(key("1", 25), |_| {
                builds += 1;
                Some(1)
            });
        }

        assert_eq!(builds, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn glyph_cache_is_evicted_on_resize() {
        let mut cache = GlyphCache::new((300, 300));

        cache.get_or_insert_with(key("1", 25), |_| Some(1));
        cache.get_or_insert_with(key("2", 25), |_| Some(2));
        cache.get_or_insert_with(key("3", 25), |_| None);

        assert!(cache.resize((300, 300)).is_empty());
        assert_eq!(cache.len(), 3);

        let mut evicted = cache.resize((500, 500));
        evicted.sort_unstable();

        assert_eq!(evicted, vec![1, 2]);
        assert_eq!(cache.len(), 0);
    }
}

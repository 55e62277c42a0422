pub mod events;

#[cfg(feature = "image")]
pub mod image_surface;

#[cfg(feature = "image")]
pub mod glyphs;

#[cfg(feature = "sdl2")]
pub mod sdl_surface;

#[cfg(feature = "wasm")]
pub mod canvas_surface;

pub use events::GameEvent;

use crate::board::{Board, BLANK};
use crate::geometry::SurfaceGeometry;
use crate::surface::Surface;
use crate::tile_source::TileSource;

/// Paints one complete frame: a single clear of the whole surface followed by
/// every tile (fill, content, border, overlay). Reads the board and geometry,
/// mutates only the surface.
pub fn render_frame<S, T>(
    board: &Board,
    geometry: &SurfaceGeometry,
    surface: &mut S,
    source: &T,
) -> Result<(), S::Error>
where
    S: Surface,
    T: TileSource<S> + ?Sized,
{
    let grid_size = board.grid_size();
    let style = source.style(grid_size);

    surface.clear()?;

    for (cell, &value) in board.grid() {
        let rect = geometry.tile_rect(cell);

        surface.fill_rect(rect, style.corner_radius, style.fill)?;

        if value != BLANK {
            source.draw_tile(surface, value, rect, grid_size)?;
        }

        surface.stroke_rect(rect, style.corner_radius, style.line_width, style.stroke)?;

        if value != BLANK {
            source.draw_overlay(surface, value, rect)?;
        }
    }

    Ok(())
}

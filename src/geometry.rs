use crate::grid::Cell;

/// Largest side the puzzle surface grows to, in pixels.
pub const MAX_DIMENSION: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Host window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pixel layout of one frame. Rendering and input mapping must read the same
/// instance, otherwise clicks land on the wrong cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    side: u32,
    grid_size: usize,
    tile_size: f64,
}

impl SurfaceGeometry {
    pub fn new(viewport: Viewport, max_dimension: u32, grid_size: usize) -> Self {
        let side = viewport.width.min(viewport.height).min(max_dimension);

        Self {
            side,
            grid_size,
            tile_size: side as f64 / grid_size.max(1) as f64,
        }
    }

    /// Geometry with an explicit tile size, as used by hosts with a fixed
    /// layout.
    pub fn with_tile_size(tile_size: f64, grid_size: usize) -> Self {
        Self {
            side: (tile_size * grid_size as f64).floor() as u32,
            grid_size,
            tile_size,
        }
    }

    /// Width and height of the square drawing surface.
    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn tile_rect(&self, cell: Cell) -> Rect {
        Rect::new(
            cell.col as f64 * self.tile_size,
            cell.row as f64 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Cell under a surface-relative point, if it lies on the board.
    pub fn cell_at(&self, point: Point) -> Option<Cell> {
        if self.tile_size <= 0.0 || !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }

        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }

        let row = (point.y / self.tile_size).floor() as usize;
        let col = (point.x / self.tile_size).floor() as usize;

        (row < self.grid_size && col < self.grid_size).then_some(Cell::new(row, col))
    }
}

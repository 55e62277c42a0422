use crate::geometry::{Point, Rect, SurfaceGeometry};
use crate::grid::Cell;

/// Pointer input already translated into surface coordinates by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Pointer(Point),
    /// Touch start; only the first contact counts.
    Touch(Vec<Point>),
    Unsupported,
}

impl InputEvent {
    pub fn pointer(x: f64, y: f64) -> Self {
        InputEvent::Pointer(Point::new(x, y))
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Pointer(point) => Some(*point),
            InputEvent::Touch(points) => points.first().copied(),
            InputEvent::Unsupported => None,
        }
    }
}

/// Converts client (window) coordinates into coordinates relative to the
/// surface's bounding rectangle.
pub fn client_to_surface(client: Point, bounds: Rect) -> Point {
    Point::new(client.x - bounds.x, client.y - bounds.y)
}

/// The cell the player pressed. Whether it may move is decided by the board.
pub fn map_input_to_move(event: &InputEvent, geometry: &SurfaceGeometry) -> Option<Cell> {
    geometry.cell_at(event.position()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_maps_to_row_and_column() {
        let geometry = SurfaceGeometry::with_tile_size(100.0, 3);

        assert_eq!(
            map_input_to_move(&InputEvent::pointer(150.0, 250.0), &geometry),
            Some(Cell::new(2, 1))
        );
    }

    #[test]
    fn touch_uses_first_contact() {
        let geometry = SurfaceGeometry::with_tile_size(100.0, 3);
        let event = InputEvent::Touch(vec![Point::new(10.0, 110.0), Point::new(250.0, 250.0)]);

        assert_eq!(map_input_to_move(&event, &geometry), Some(Cell::new(1, 0)));
        assert_eq!(map_input_to_move(&InputEvent::Touch(vec![]), &geometry), None);
    }

    #[test]
    fn unsupported_and_offboard_events_are_ignored() {
        let geometry = SurfaceGeometry::with_tile_size(100.0, 3);

        assert_eq!(map_input_to_move(&InputEvent::Unsupported, &geometry), None);
        assert_eq!(map_input_to_move(&InputEvent::pointer(450.0, 20.0), &geometry), None);
    }

    #[test]
    fn client_coordinates_are_offset_by_bounds() {
        let bounds = Rect::new(40.0, 60.0, 300.0, 300.0);

        assert_eq!(
            client_to_surface(Point::new(190.0, 310.0), bounds),
            Point::new(150.0, 250.0)
        );
    }
}

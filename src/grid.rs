use core::str::FromStr;
use enum_map::{Enum, EnumMap};

/// A cell address. Rows grow downwards, columns to the right.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_adjacent(&self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Enum)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Square grid dimension, parsed from either `4` or `4x4`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GridSize(pub usize);

impl FromStr for GridSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = match s.split_once('x') {
            Some((width, height)) if width == height => width,
            Some(_) => return Err(format!("grid must be square: {}", s)),
            None => s,
        };

        let size = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid grid size: {}", s))?;

        Ok(GridSize(size))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

pub struct GridIter<'a, T> {
    grid: &'a Grid<T>,
    pos: usize,
}

impl<T> Grid<T> {
    pub fn new<F: FnMut(Cell) -> T>(width: usize, height: usize, initializer: &mut F) -> Self {
        let mut data = Vec::with_capacity(width * height);

        for row in 0..height {
            for col in 0..width {
                data.push(initializer(Cell::new(row, col)));
            }
        }

        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Cells in row-major reading order.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> GridIter<T> {
        GridIter { grid: self, pos: 0 }
    }

    pub fn get(&self, cell: Cell) -> Option<&T> {
        if !self.contains(cell) {
            return None;
        }

        self.data.get(self.index(cell))
    }

    pub fn swap(&mut self, a: Cell, b: Cell) -> Result<(), &'static str> {
        if !self.contains(a) || !self.contains(b) {
            Err("Cell out of range")?
        }

        let (a, b) = (self.index(a), self.index(b));

        self.data.swap(a, b);

        Ok(())
    }

    pub fn get_neighbors(&self, cell: Cell) -> EnumMap<Direction, Option<Cell>> {
        EnumMap::from_fn(|direction| self.get_neighbor(cell, direction))
    }

    pub fn get_neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let Cell { row, col } = cell;

        let neighbor = match direction {
            Direction::Up => {
                if row == 0 {
                    None
                } else {
                    Some(Cell::new(row - 1, col))
                }
            }
            Direction::Down => {
                if row + 1 >= self.height {
                    None
                } else {
                    Some(Cell::new(row + 1, col))
                }
            }
            Direction::Left => {
                if col == 0 {
                    None
                } else {
                    Some(Cell::new(row, col - 1))
                }
            }
            Direction::Right => {
                if col + 1 >= self.width {
                    None
                } else {
                    Some(Cell::new(row, col + 1))
                }
            }
        }?;

        self.contains(cell).then_some(neighbor)
    }

    fn index(&self, cell: Cell) -> usize {
        cell.col + (cell.row * self.width)
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = (Cell, &'a T);
    type IntoIter = GridIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iterator for GridIter<'a, T> {
    type Item = (Cell, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.grid.data.len() {
            None
        } else {
            let cell = Cell::new(self.pos / self.grid.width, self.pos % self.grid.width);
            let value = &self.grid.data[self.pos];

            self.pos += 1;

            Some((cell, value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_respect_edges() {
        let grid = Grid::new(3, 3, &mut |cell| cell.row * 10 + cell.col);

        let corner = grid.get_neighbors(Cell::new(0, 0));
        assert!(corner[Direction::Up].is_none());
        assert!(corner[Direction::Left].is_none());
        assert_eq!(corner[Direction::Right], Some(Cell::new(0, 1)));
        assert_eq!(corner[Direction::Down], Some(Cell::new(1, 0)));

        let center = grid.get_neighbors(Cell::new(1, 1));
        assert_eq!(center.values().flatten().count(), 4);

        assert_eq!(grid.get(Cell::new(2, 1)), Some(&21));
        assert_eq!(grid.get(Cell::new(1, 3)), None);
    }

    #[test]
    fn iteration_is_row_major() {
        let grid = Grid::new(2, 2, &mut |cell| cell);
        let cells: Vec<Cell> = grid.iter().map(|(cell, _)| cell).collect();

        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1)
            ]
        );
    }

    #[test]
    fn grid_size_parses_both_forms() {
        assert_eq!("4".parse::<GridSize>(), Ok(GridSize(4)));
        assert_eq!("5x5".parse::<GridSize>(), Ok(GridSize(5)));
        assert!("3x4".parse::<GridSize>().is_err());
        assert!("three".parse::<GridSize>().is_err());
    }
}

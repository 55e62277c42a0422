use std::fmt;

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{PuzzleError, Result};
use crate::grid::{Cell, Grid};

/// Value painted on a tile. `BLANK` marks the empty cell.
pub type TileValue = u32;

pub const BLANK: TileValue = 0;
pub const MIN_GRID_SIZE: usize = 2;
pub const SHUFFLE_MOVES: usize = 1000;

/// An N×N sliding puzzle board.
///
/// The board always holds a permutation of `0..N²`. The solved layout is
/// `1..N²` in reading order with the blank in the bottom-right corner, and
/// that single layout is both the starting point of a shuffle and the target
/// checked by [`Board::is_solved`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid<TileValue>,
    blank: Cell,
}

impl Board {
    pub fn solved(grid_size: usize) -> Result<Self> {
        check_grid_size(grid_size)?;

        let last = grid_size * grid_size - 1;
        let grid = Grid::new(grid_size, grid_size, &mut |cell| {
            let index = cell.row * grid_size + cell.col;

            if index == last {
                BLANK
            } else {
                index as TileValue + 1
            }
        });

        Ok(Self {
            grid,
            blank: Cell::new(grid_size - 1, grid_size - 1),
        })
    }

    /// Solved board scrambled by `moves` random legal moves.
    pub fn shuffled<R: Rng + ?Sized>(grid_size: usize, moves: usize, rng: &mut R) -> Result<Self> {
        let mut board = Self::solved(grid_size)?;

        board.shuffle(moves, rng);

        debug!("Shuffled {}x{} board with {} moves", grid_size, grid_size, moves);

        Ok(board)
    }

    /// Builds a board from explicit rows, rejecting anything that is not a
    /// square permutation of `0..N²`.
    pub fn from_rows(rows: &[Vec<TileValue>]) -> Result<Self> {
        let grid_size = rows.len();

        check_grid_size(grid_size)?;

        if let Some(row) = rows.iter().position(|row| row.len() != grid_size) {
            return Err(PuzzleError::InvalidBoard(format!(
                "row {} has {} cells, expected {}",
                row,
                rows[row].len(),
                grid_size
            )));
        }

        let area = grid_size * grid_size;
        let mut seen = vec![false; area];

        for &value in rows.iter().flatten() {
            let slot = seen
                .get_mut(value as usize)
                .ok_or_else(|| PuzzleError::InvalidBoard(format!("value {} out of range", value)))?;

            if *slot {
                return Err(PuzzleError::InvalidBoard(format!("duplicate value {}", value)));
            }

            *slot = true;
        }

        let grid = Grid::new(grid_size, grid_size, &mut |cell| rows[cell.row][cell.col]);
        let blank = grid
            .iter()
            .find(|(_, &value)| value == BLANK)
            .map(|(cell, _)| cell)
            .ok_or_else(|| PuzzleError::InvalidBoard("no blank cell".to_string()))?;

        Ok(Self { grid, blank })
    }

    pub fn grid_size(&self) -> usize {
        self.grid.width()
    }

    pub fn blank(&self) -> Cell {
        self.blank
    }

    pub fn get(&self, cell: Cell) -> Option<TileValue> {
        self.grid.get(cell).copied()
    }

    pub fn grid(&self) -> &Grid<TileValue> {
        &self.grid
    }

    pub fn to_rows(&self) -> Vec<Vec<TileValue>> {
        self.grid
            .values()
            .chunks(self.grid_size())
            .map(|row| row.to_vec())
            .collect()
    }

    /// Cells that may slide into the blank.
    pub fn legal_moves(&self) -> Vec<Cell> {
        self.grid
            .get_neighbors(self.blank)
            .into_iter()
            .filter_map(|(_, cell)| cell)
            .collect()
    }

    /// Random walk of the blank. Every step is a legal move, so the result
    /// stays solvable.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, moves: usize, rng: &mut R) {
        for _ in 0..moves {
            let candidates = self.legal_moves();

            if let Some(&target) = candidates.choose(rng) {
                self.slide(target);
            }
        }
    }

    /// Slides `target` into the blank if the two are orthogonal neighbours.
    /// Returns whether the move was applied; rejected moves leave the board
    /// untouched.
    pub fn apply_move(&mut self, target: Cell) -> bool {
        if !self.grid.contains(target) || !target.is_adjacent(self.blank) {
            trace!("Rejected move to ({}, {})", target.row, target.col);
            return false;
        }

        self.slide(target);

        true
    }

    pub fn is_solved(&self) -> bool {
        let last = self.grid.size() - 1;

        self.grid.values().iter().enumerate().all(|(index, &value)| {
            if index == last {
                value == BLANK
            } else {
                value as usize == index + 1
            }
        })
    }

    /// Inversion parity test for reachability of the solved layout.
    pub fn is_solvable(&self) -> bool {
        let tiles: Vec<TileValue> = self
            .grid
            .values()
            .iter()
            .copied()
            .filter(|&value| value != BLANK)
            .collect();

        let inversions = tiles
            .iter()
            .enumerate()
            .map(|(i, a)| tiles[i + 1..].iter().filter(|&b| b < a).count())
            .sum::<usize>();

        let grid_size = self.grid_size();

        if grid_size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let blank_row_from_bottom = grid_size - self.blank.row;

            (inversions + blank_row_from_bottom) % 2 == 1
        }
    }

    fn slide(&mut self, target: Cell) {
        let swapped = self.grid.swap(self.blank, target);

        debug_assert!(swapped.is_ok(), "slide to ({}, {}) out of range", target.row, target.col);
        self.blank = target;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.grid.size() - 1).to_string().len();

        for row in self.to_rows() {
            let line: Vec<String> = row
                .iter()
                .map(|&value| match value {
                    BLANK => format!("{:>width$}", ".", width = width),
                    value => format!("{:>width$}", value, width = width),
                })
                .collect();

            writeln!(f, "{}", line.join(" "))?;
        }

        Ok(())
    }
}

/// Rejects boards too small to slide anything on.
pub fn check_grid_size(grid_size: usize) -> Result<()> {
    if grid_size < MIN_GRID_SIZE {
        return Err(PuzzleError::GridTooSmall {
            got: grid_size,
            min: MIN_GRID_SIZE,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_layout_puts_blank_last() {
        let board = Board::solved(3).unwrap();

        assert_eq!(board.to_rows(), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 0]]);
        assert_eq!(board.blank(), Cell::new(2, 2));
        assert!(board.is_solved());
        assert!(board.is_solvable());
    }

    #[test]
    fn legal_moves_depend_on_blank_position() {
        let corner = Board::solved(4).unwrap();
        assert_eq!(corner.legal_moves().len(), 2);

        let edge = Board::from_rows(&[vec![1, 2, 3], vec![4, 5, 0], vec![7, 8, 6]]).unwrap();
        assert_eq!(edge.legal_moves().len(), 3);

        let center = Board::from_rows(&[vec![1, 2, 3], vec![4, 0, 5], vec![7, 8, 6]]).unwrap();
        assert_eq!(center.legal_moves().len(), 4);
    }

    #[test]
    fn display_marks_blank() {
        let board = Board::solved(2).unwrap();

        assert_eq!(board.to_string(), "1 2\n3 .\n");
    }

    #[test]
    fn rejects_tiny_grids() {
        assert_eq!(
            Board::solved(1),
            Err(PuzzleError::GridTooSmall { got: 1, min: 2 })
        );
        assert_eq!(check_grid_size(0), Err(PuzzleError::GridTooSmall { got: 0, min: 2 }));
        assert_eq!(check_grid_size(MIN_GRID_SIZE), Ok(()));
    }

    #[test]
    fn slide_swaps_tile_with_blank() {
        let mut board = Board::solved(3).unwrap();

        assert!(board.apply_move(Cell::new(1, 2)));
        assert_eq!(board.to_rows(), vec![vec![1, 2, 3], vec![4, 5, 0], vec![7, 8, 6]]);
        assert_eq!(board.blank(), Cell::new(1, 2));

        assert!(!board.apply_move(Cell::new(3, 2)));
        assert_eq!(board.blank(), Cell::new(1, 2));
    }
}

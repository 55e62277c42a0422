use crate::board::SHUFFLE_MOVES;
use crate::geometry::MAX_DIMENSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub grid_size: usize,
    pub shuffle_moves: usize,
    pub max_dimension: u32,
    /// Fixed shuffle seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    /// Overlay numerals on image tiles.
    pub image_numbers: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: 3,
            shuffle_moves: SHUFFLE_MOVES,
            max_dimension: MAX_DIMENSION,
            seed: None,
            image_numbers: true,
        }
    }
}

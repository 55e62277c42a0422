use thiserror::Error;

pub type Result<T, E = PuzzleError> = std::result::Result<T, E>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("grid size must be at least {min}, got {got}")]
    GridTooSmall { got: usize, min: usize },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// Nothing can be drawn; startup has to abort.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("drawing failed: {0}")]
    Surface(String),

    #[error("failed to load asset: {0}")]
    Asset(String),
}

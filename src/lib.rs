//! Sliding tile puzzle engine.
//!
//! The board, shuffle and solve check live in [`board`]; [`engine::Puzzle`]
//! drives one board through a frame loop against any [`surface::Surface`];
//! [`controller::Controller`] picks between the numbered and the picture
//! variant and routes host events to the live one.

pub mod board;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod surface;
pub mod tile_source;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub mod app;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::{Board, TileValue, BLANK};
pub use config::PuzzleConfig;
pub use controller::{Controller, GameMode};
pub use engine::{ImagePuzzle, LoopState, NumberPuzzle, Puzzle, TickOutcome};
pub use error::PuzzleError;
pub use geometry::{Point, Rect, SurfaceGeometry, Viewport};
pub use grid::Cell;
pub use input::InputEvent;
pub use render::GameEvent;
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};
pub use surface::Surface;
pub use tile_source::{ImageAtlas, ImageTiles, NumberTiles, TileSource};

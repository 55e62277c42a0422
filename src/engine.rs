use log::{debug, info, trace};
use rand::{thread_rng, Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::board::Board;
use crate::config::PuzzleConfig;
use crate::error::{PuzzleError, Result};
use crate::geometry::{SurfaceGeometry, Viewport};
use crate::grid::Cell;
use crate::input::{map_input_to_move, InputEvent};
use crate::render::render_frame;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::Surface;
use crate::tile_source::{ImageTiles, NumberTiles, TileSource};

pub type NumberPuzzle = Puzzle<NumberTiles>;
pub type ImagePuzzle<I> = Puzzle<ImageTiles<I>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frames scheduled.
    Idle,
    Running,
    /// Terminal until the next `init_puzzle`.
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame drawn, successor scheduled.
    Continue,
    /// Frame drawn and the board is solved; nothing further is scheduled.
    Solved,
    /// The handle was cancelled or superseded; nothing happened.
    Stale,
}

/// One playable puzzle: a board, the geometry it is shown at and the frame
/// loop that keeps the surface in sync with it.
pub struct Puzzle<T> {
    source: T,
    config: PuzzleConfig,
    rng: XorShiftRng,
    board: Option<Board>,
    viewport: Viewport,
    geometry: SurfaceGeometry,
    state: LoopState,
    pending: Option<FrameHandle>,
    moves: usize,
}

impl<T> Puzzle<T> {
    pub fn new(source: T, config: PuzzleConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| thread_rng().gen());

        debug!("Using seed: {}", seed);

        Self {
            source,
            rng: XorShiftRng::seed_from_u64(seed),
            board: None,
            viewport: Viewport::default(),
            geometry: SurfaceGeometry::new(Viewport::default(), config.max_dimension, config.grid_size),
            state: LoopState::Idle,
            pending: None,
            moves: 0,
            config,
        }
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Deals a fresh shuffled board, replacing any previous one. A running
    /// loop is cancelled first so two loops never share a board.
    pub fn init_puzzle<F>(&mut self, grid_size: usize, scheduler: &mut F) -> Result<()>
    where
        F: FrameScheduler + ?Sized,
    {
        let board = Board::shuffled(grid_size, self.config.shuffle_moves, &mut self.rng)?;

        self.stop(scheduler);
        self.board = Some(board);
        self.moves = 0;
        self.state = LoopState::Idle;
        self.geometry = SurfaceGeometry::new(self.viewport, self.config.max_dimension, grid_size);

        Ok(())
    }

    /// Schedules the first tick. Any previously issued handle is cancelled.
    pub fn start<F>(&mut self, scheduler: &mut F) -> bool
    where
        F: FrameScheduler + ?Sized,
    {
        if self.board.is_none() {
            debug!("Not starting loop without a board");
            return false;
        }

        self.stop(scheduler);
        self.pending = Some(scheduler.request_frame());
        self.state = LoopState::Running;

        true
    }

    pub fn stop<F>(&mut self, scheduler: &mut F)
    where
        F: FrameScheduler + ?Sized,
    {
        if let Some(handle) = self.pending.take() {
            trace!("Cancelling frame {}", handle.0);
            scheduler.cancel_frame(handle);
        }

        if self.state == LoopState::Running {
            self.state = LoopState::Idle;
        }
    }

    /// Applies the move under `event`, if it is a legal one.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Cell> {
        if self.state == LoopState::Solved {
            return None;
        }

        let board = self.board.as_mut()?;
        let target = map_input_to_move(event, &self.geometry)?;

        if board.apply_move(target) {
            self.moves += 1;
            debug!("Moved ({}, {}), {} moves", target.row, target.col, self.moves);
            Some(target)
        } else {
            debug!("Ignored click on ({}, {})", target.row, target.col);
            None
        }
    }

    // Game state only changes on input; frames just reflect it.
    fn update(&mut self) {}
}

impl<T> Puzzle<T> {
    /// Recomputes the geometry for a new viewport, resizes the surface and
    /// redraws right away.
    pub fn resize<S>(&mut self, viewport: Viewport, surface: &mut S) -> Result<SurfaceGeometry>
    where
        S: Surface,
        T: TileSource<S>,
    {
        let grid_size = self
            .board
            .as_ref()
            .map_or(self.config.grid_size, Board::grid_size);

        self.viewport = viewport;
        self.geometry = SurfaceGeometry::new(viewport, self.config.max_dimension, grid_size);

        let side = self.geometry.side();

        surface.set_size(side, side).map_err(surface_error)?;
        self.render(surface)?;

        Ok(self.geometry)
    }

    pub fn render<S>(&self, surface: &mut S) -> Result<()>
    where
        S: Surface,
        T: TileSource<S>,
    {
        match &self.board {
            Some(board) => {
                render_frame(board, &self.geometry, surface, &self.source).map_err(surface_error)
            }
            None => Ok(()),
        }
    }

    /// Runs one frame of the loop for `handle`. A failed draw still schedules
    /// the successor, so the loop stays `Running` with a live handle.
    pub fn tick<S, F>(&mut self, handle: FrameHandle, surface: &mut S, scheduler: &mut F) -> Result<TickOutcome>
    where
        S: Surface,
        T: TileSource<S>,
        F: FrameScheduler + ?Sized,
    {
        if self.pending != Some(handle) || self.state != LoopState::Running {
            trace!("Dropping stale frame {}", handle.0);
            return Ok(TickOutcome::Stale);
        }

        self.pending = None;
        self.update();

        if let Err(e) = self.render(surface) {
            // Keep the loop alive; the next frame redraws from scratch.
            debug!("Frame {} failed, retrying next frame", handle.0);
            self.pending = Some(scheduler.request_frame());
            return Err(e);
        }

        if self.board.as_ref().is_some_and(Board::is_solved) {
            info!("Puzzle solved in {} moves", self.moves);
            self.state = LoopState::Solved;
            return Ok(TickOutcome::Solved);
        }

        self.pending = Some(scheduler.request_frame());

        Ok(TickOutcome::Continue)
    }
}

fn surface_error<E: std::fmt::Display>(error: E) -> PuzzleError {
    PuzzleError::Surface(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FrameQueue;
    use crate::surface::RecordingSurface;

    fn seeded(seed: u64) -> NumberPuzzle {
        Puzzle::new(
            NumberTiles,
            PuzzleConfig {
                seed: Some(seed),
                ..Default::default()
            },
        )
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut puzzle = seeded(7);
        let mut queue = FrameQueue::new();
        let mut surface = RecordingSurface::new();

        puzzle.init_puzzle(3, &mut queue).unwrap();
        puzzle.start(&mut queue);
        let first = puzzle.pending().unwrap();

        puzzle.start(&mut queue);
        assert_ne!(puzzle.pending(), Some(first));
        assert_eq!(queue.pending(), 1);

        let outcome = puzzle.tick(first, &mut surface, &mut queue).unwrap();
        assert_eq!(outcome, TickOutcome::Stale);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn start_requires_a_board() {
        let mut puzzle = seeded(1);
        let mut queue = FrameQueue::new();

        assert!(!puzzle.start(&mut queue));
        assert_eq!(queue.requested(), 0);
    }
}

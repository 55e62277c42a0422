use core::str::FromStr;
use std::fmt;

use log::{debug, info};

use crate::board::{check_grid_size, Board};
use crate::config::PuzzleConfig;
use crate::engine::{ImagePuzzle, LoopState, NumberPuzzle, Puzzle, TickOutcome};
use crate::error::{PuzzleError, Result};
use crate::geometry::{SurfaceGeometry, Viewport};
use crate::grid::Cell;
use crate::input::InputEvent;
use crate::render::GameEvent;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::Surface;
use crate::tile_source::{ImageAtlas, ImageTiles, NumberTiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    #[default]
    Number,
    Image,
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "number" | "numbers" => Ok(GameMode::Number),
            "1" | "image" | "picture" => Ok(GameMode::Image),
            other => Err(format!("unknown game mode: {}", other)),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Number => write!(f, "number"),
            GameMode::Image => write!(f, "image"),
        }
    }
}

/// Choices made on the start screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub mode: GameMode,
    pub grid_size: Option<usize>,
    /// Latched by the first grid size selection; never cleared.
    started: bool,
}

impl Session {
    pub fn started(&self) -> bool {
        self.started
    }
}

/// The single live engine.
pub enum ActiveEngine<I> {
    Number(NumberPuzzle),
    Image(ImagePuzzle<I>),
}

/// Runs `$body` against whichever puzzle `$engine` holds.
macro_rules! with_puzzle {
    ($engine:expr, $puzzle:ident => $body:expr) => {
        match $engine {
            ActiveEngine::Number($puzzle) => $body,
            ActiveEngine::Image($puzzle) => $body,
        }
    };
}

impl<I> ActiveEngine<I> {
    pub fn mode(&self) -> GameMode {
        match self {
            ActiveEngine::Number(_) => GameMode::Number,
            ActiveEngine::Image(_) => GameMode::Image,
        }
    }

    pub fn moves(&self) -> usize {
        with_puzzle!(self, puzzle => puzzle.moves())
    }

    pub fn board(&self) -> Option<&Board> {
        with_puzzle!(self, puzzle => puzzle.board())
    }

    pub fn geometry(&self) -> &SurfaceGeometry {
        with_puzzle!(self, puzzle => puzzle.geometry())
    }

    pub fn state(&self) -> LoopState {
        with_puzzle!(self, puzzle => puzzle.state())
    }
}

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Owns the session, the atlas and whichever engine the mode selects, and
/// routes host events to it.
pub struct Controller<S: Surface> {
    config: PuzzleConfig,
    session: Session,
    viewport: Viewport,
    atlas: Option<ImageAtlas<S::Image>>,
    awaiting_atlas: bool,
    engine: Option<ActiveEngine<S::Image>>,
    listener: Option<Listener>,
}

impl<S: Surface> Controller<S>
where
    S::Image: Clone,
{
    pub fn new(config: PuzzleConfig) -> Self {
        Self {
            config,
            session: Session::default(),
            viewport: Viewport::default(),
            atlas: None,
            awaiting_atlas: false,
            engine: None,
            listener: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine(&self) -> Option<&ActiveEngine<S::Image>> {
        self.engine.as_ref()
    }

    pub fn active_mode(&self) -> Option<GameMode> {
        self.engine.as_ref().map(ActiveEngine::mode)
    }

    pub fn is_waiting_for_atlas(&self) -> bool {
        self.awaiting_atlas
    }

    /// Hook for start and win notifications.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Picks the variant. Ignored once a game has started.
    pub fn select_mode(&mut self, mode: GameMode) -> bool {
        if self.session.started {
            debug!("Ignoring mode change to {} after start", mode);
            return false;
        }

        self.session.mode = mode;

        true
    }

    /// Picks the board size and starts the game. Image games wait for the
    /// atlas if it has not loaded yet. Ignored once a game has started; a
    /// rejected size leaves the session open for another pick.
    pub fn select_grid_size<F>(&mut self, grid_size: usize, surface: &mut S, scheduler: &mut F) -> Result<bool>
    where
        F: FrameScheduler + ?Sized,
    {
        if self.session.started {
            debug!("Ignoring grid size {} after start", grid_size);
            return Ok(false);
        }

        check_grid_size(grid_size)?;

        self.session.grid_size = Some(grid_size);
        self.session.started = true;

        match self.session.mode {
            GameMode::Image if self.atlas.is_none() => {
                info!("Waiting for image to load before dealing {}x{}", grid_size, grid_size);
                self.awaiting_atlas = true;
            }
            _ => self.init_game(surface, scheduler)?,
        }

        Ok(true)
    }

    /// Load signal of the picture. Starts a pending image game, exactly once.
    pub fn atlas_loaded<F>(&mut self, atlas: ImageAtlas<S::Image>, surface: &mut S, scheduler: &mut F) -> Result<()>
    where
        F: FrameScheduler + ?Sized,
    {
        debug!("Image atlas loaded: {}x{}", atlas.width(), atlas.height());

        self.atlas = Some(atlas);

        if self.awaiting_atlas {
            self.awaiting_atlas = false;
            self.init_game(surface, scheduler)?;
        }

        Ok(())
    }

    /// Deals a new board with the current mode and size.
    pub fn restart<F>(&mut self, surface: &mut S, scheduler: &mut F) -> Result<bool>
    where
        F: FrameScheduler + ?Sized,
    {
        if self.engine.is_none() {
            return Ok(false);
        }

        self.init_game(surface, scheduler)?;

        Ok(true)
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Cell> {
        with_puzzle!(self.engine.as_mut()?, puzzle => puzzle.handle_input(event))
    }

    pub fn resize(&mut self, viewport: Viewport, surface: &mut S) -> Result<SurfaceGeometry> {
        self.viewport = viewport;

        if let Some(engine) = self.engine.as_mut() {
            return with_puzzle!(engine, puzzle => puzzle.resize(viewport, surface));
        }

        let grid_size = self.session.grid_size.unwrap_or(self.config.grid_size);
        let geometry = SurfaceGeometry::new(viewport, self.config.max_dimension, grid_size);

        surface
            .set_size(geometry.side(), geometry.side())
            .map_err(|e| PuzzleError::Surface(e.to_string()))?;

        Ok(geometry)
    }

    pub fn tick<F>(&mut self, handle: FrameHandle, surface: &mut S, scheduler: &mut F) -> Result<TickOutcome>
    where
        F: FrameScheduler + ?Sized,
    {
        let outcome = match self.engine.as_mut() {
            Some(engine) => with_puzzle!(engine, puzzle => puzzle.tick(handle, surface, scheduler)?),
            None => TickOutcome::Stale,
        };

        if outcome == TickOutcome::Solved {
            let moves = self.engine.as_ref().map_or(0, ActiveEngine::moves);

            self.emit(GameEvent::Solved { moves });
        }

        Ok(outcome)
    }

    fn init_game<F>(&mut self, surface: &mut S, scheduler: &mut F) -> Result<()>
    where
        F: FrameScheduler + ?Sized,
    {
        let grid_size = self.session.grid_size.unwrap_or(self.config.grid_size);
        let mode = self.session.mode;

        // A restart reuses the live engine; its init cancels the old loop.
        let mut engine = match (self.engine.take(), &self.atlas) {
            (Some(engine), _) => engine,
            (None, _) if mode == GameMode::Number => {
                ActiveEngine::Number(Puzzle::new(NumberTiles, self.config.clone()))
            }
            (None, Some(atlas)) => ActiveEngine::Image(Puzzle::new(
                ImageTiles::new(atlas.clone(), self.config.image_numbers),
                self.config.clone(),
            )),
            (None, None) => {
                self.awaiting_atlas = true;
                return Ok(());
            }
        };

        let dealt = with_puzzle!(&mut engine, puzzle => {
            puzzle
                .init_puzzle(grid_size, scheduler)
                .and_then(|_| puzzle.resize(self.viewport, surface))
                .map(|_| puzzle.start(scheduler))
        });

        self.engine = Some(engine);
        dealt?;

        info!("Started {} puzzle at {}x{}", mode, grid_size, grid_size);

        self.emit(GameEvent::Started { mode, grid_size });

        Ok(())
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

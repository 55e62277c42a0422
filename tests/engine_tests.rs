use sliding_puzzle::{
    config::PuzzleConfig,
    engine::{LoopState, NumberPuzzle, Puzzle, TickOutcome},
    error::PuzzleError,
    geometry::{Point, Rect, Viewport},
    grid::Cell,
    input::InputEvent,
    scheduler::FrameQueue,
    surface::{Color, DrawCommand, Font, RecordingSurface, Surface},
    tile_source::{ImageAtlas, ImageTiles, NumberTiles},
};

// Fixed seed for deterministic tests
const TEST_SEED: u64 = 42;

// Enough frames for any of the scripted games below to finish.
const MAX_TICKS: usize = 100;

fn config(shuffle_moves: usize) -> PuzzleConfig {
    PuzzleConfig {
        seed: Some(TEST_SEED),
        shuffle_moves,
        ..Default::default()
    }
}

fn number_puzzle(shuffle_moves: usize) -> NumberPuzzle {
    Puzzle::new(NumberTiles, config(shuffle_moves))
}

/// Recording surface whose next clear fails, like a lost canvas context.
#[derive(Default)]
struct FlakySurface {
    inner: RecordingSurface,
    fail_next_clear: bool,
}

impl Surface for FlakySurface {
    type Image = u32;
    type Error = String;

    fn set_size(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.inner.set_size(width, height).map_err(|never| match never {})
    }

    fn size(&self) -> (u32, u32) {
        self.inner.size()
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), String> {
        if std::mem::take(&mut self.fail_next_clear) {
            return Err("lost context".to_string());
        }

        self.inner.clear_rect(rect).map_err(|never| match never {})
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color) -> Result<(), String> {
        self.inner.fill_rect(rect, radius, color).map_err(|never| match never {})
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f64, line_width: f64, color: Color) -> Result<(), String> {
        self.inner.stroke_rect(rect, radius, line_width, color).map_err(|never| match never {})
    }

    fn draw_image(&mut self, image: &u32, src: Rect, dest: Rect) -> Result<(), String> {
        self.inner.draw_image(image, src, dest).map_err(|never| match never {})
    }

    fn fill_text(&mut self, text: &str, center: Point, font: Font, color: Color) -> Result<(), String> {
        self.inner.fill_text(text, center, font, color).map_err(|never| match never {})
    }
}

fn click(cell: Cell, tile_size: f64) -> InputEvent {
    InputEvent::pointer(
        (cell.col as f64 + 0.5) * tile_size,
        (cell.row as f64 + 0.5) * tile_size,
    )
}

#[test]
fn test_double_resize_is_idempotent() {
    let mut puzzle = number_puzzle(1000);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(4, &mut queue).unwrap();

    let first = puzzle.resize(Viewport::new(800, 600), &mut surface).unwrap();
    let first_frame = surface.last_frame().to_vec();
    let second = puzzle.resize(Viewport::new(800, 600), &mut surface).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.side(), 500);
    assert_eq!(first.tile_size(), 125.0);
    assert_eq!(surface.last_frame(), &first_frame[..]);
}

#[test]
fn test_frame_draws_every_numbered_tile() {
    let mut puzzle = number_puzzle(1000);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();

    let frame = surface.last_frame();
    let clears = frame.iter().filter(|c| matches!(c, DrawCommand::Clear(_))).count();
    let fills = frame.iter().filter(|c| matches!(c, DrawCommand::Fill { .. })).count();
    let strokes = frame.iter().filter(|c| matches!(c, DrawCommand::Stroke { .. })).count();
    let mut numbers: Vec<u32> = frame
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, color, .. } => {
                assert_eq!(*color, Color::BURLYWOOD);
                text.parse().ok()
            }
            _ => None,
        })
        .collect();

    numbers.sort_unstable();

    assert_eq!(frame.first(), Some(&DrawCommand::Clear(Rect::new(0.0, 0.0, 300.0, 300.0))));
    assert_eq!(clears, 1);
    assert_eq!(fills, 9);
    assert_eq!(strokes, 9);
    assert_eq!(numbers, (1..9).collect::<Vec<u32>>());
}

#[test]
fn test_image_tiles_blit_their_source_region() {
    let atlas = ImageAtlas::loaded(7u32, 300, 600);
    let mut puzzle = Puzzle::new(ImageTiles::new(atlas, false), config(0));
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();

    let blits: Vec<(Rect, Rect)> = surface
        .last_frame()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Image { image, src, dest } => {
                assert_eq!(*image, 7);
                Some((*src, *dest))
            }
            _ => None,
        })
        .collect();

    assert_eq!(blits.len(), 8);
    assert!(!surface.last_frame().iter().any(|c| matches!(c, DrawCommand::Text { .. })));

    // Unshuffled, so tile 5 sits in the middle.
    assert_eq!(
        blits[4],
        (Rect::new(100.0, 200.0, 100.0, 200.0), Rect::new(100.0, 100.0, 100.0, 100.0))
    );
}

#[test]
fn test_loop_stops_once_solved() {
    let mut puzzle = number_puzzle(0);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();
    assert!(puzzle.start(&mut queue));

    let handle = queue.pop().unwrap();

    assert_eq!(puzzle.tick(handle, &mut surface, &mut queue).unwrap(), TickOutcome::Solved);
    assert_eq!(puzzle.state(), LoopState::Solved);
    assert_eq!(queue.pending(), 0);
    assert_eq!(puzzle.tick(handle, &mut surface, &mut queue).unwrap(), TickOutcome::Stale);
}

#[test]
fn test_bounded_game_terminates() {
    let mut puzzle = number_puzzle(1);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();
    puzzle.start(&mut queue);

    let mut ticks = 0;
    let mut solved_ticks = 0;

    while let Some(handle) = queue.pop() {
        assert!(ticks < MAX_TICKS, "loop did not stop");
        ticks += 1;

        match puzzle.tick(handle, &mut surface, &mut queue).unwrap() {
            TickOutcome::Solved => solved_ticks += 1,
            TickOutcome::Continue => assert_eq!(queue.pending(), 1),
            TickOutcome::Stale => panic!("live handle reported stale"),
        }

        // One shuffle step away: sliding the corner tile back solves it.
        if ticks == 3 {
            assert_eq!(puzzle.handle_input(&click(Cell::new(2, 2), 100.0)), Some(Cell::new(2, 2)));
        }
    }

    assert_eq!(ticks, 4);
    assert_eq!(solved_ticks, 1);
    assert_eq!(puzzle.moves(), 1);
    assert!(puzzle.board().unwrap().is_solved());
}

#[test]
fn test_input_after_solve_is_ignored() {
    let mut puzzle = number_puzzle(0);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();
    puzzle.start(&mut queue);

    let handle = queue.pop().unwrap();
    puzzle.tick(handle, &mut surface, &mut queue).unwrap();

    let before = puzzle.board().cloned();

    assert_eq!(puzzle.handle_input(&click(Cell::new(2, 1), 100.0)), None);
    assert_eq!(puzzle.board().cloned(), before);
    assert_eq!(puzzle.moves(), 0);
}

#[test]
fn test_illegal_clicks_do_not_count() {
    let mut puzzle = number_puzzle(0);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();

    assert_eq!(puzzle.handle_input(&click(Cell::new(0, 0), 100.0)), None);
    assert_eq!(puzzle.handle_input(&InputEvent::pointer(-5.0, 10.0)), None);
    assert_eq!(puzzle.handle_input(&InputEvent::Unsupported), None);
    assert_eq!(puzzle.handle_input(&InputEvent::Touch(vec![Point::new(250.0, 150.0)])), Some(Cell::new(1, 2)));
    assert_eq!(puzzle.moves(), 1);
}

#[test]
fn test_reinit_cancels_running_loop() {
    let mut puzzle = number_puzzle(1000);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.start(&mut queue);
    let stale = puzzle.pending().unwrap();

    puzzle.init_puzzle(4, &mut queue).unwrap();

    assert_eq!(puzzle.state(), LoopState::Idle);
    assert_eq!(queue.pending(), 0);
    assert_eq!(puzzle.board().unwrap().grid_size(), 4);
    assert_eq!(puzzle.tick(stale, &mut surface, &mut queue).unwrap(), TickOutcome::Stale);
}

#[test]
fn test_grid_too_small_is_rejected() {
    let mut puzzle = number_puzzle(1000);
    let mut queue = FrameQueue::new();

    assert!(matches!(
        puzzle.init_puzzle(1, &mut queue),
        Err(PuzzleError::GridTooSmall { got: 1, .. })
    ));
    assert!(puzzle.board().is_none());
    assert_eq!(queue.requested(), 0);
}

#[test]
fn test_failed_frame_keeps_loop_running() {
    let mut puzzle = number_puzzle(0);
    let mut queue = FrameQueue::new();
    let mut surface = FlakySurface::default();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();
    puzzle.start(&mut queue);

    surface.fail_next_clear = true;
    let handle = queue.pop().unwrap();

    assert_eq!(
        puzzle.tick(handle, &mut surface, &mut queue),
        Err(PuzzleError::Surface("lost context".to_string()))
    );
    assert_eq!(puzzle.state(), LoopState::Running);
    assert!(puzzle.pending().is_some());
    assert_eq!(queue.pending(), 1);

    let retry = queue.pop().unwrap();

    assert_eq!(puzzle.tick(retry, &mut surface, &mut queue).unwrap(), TickOutcome::Solved);
    assert_eq!(puzzle.state(), LoopState::Solved);
}

#[test]
fn test_image_numerals_paint_over_border() {
    let atlas = ImageAtlas::loaded(7u32, 300, 300);
    let mut puzzle = Puzzle::new(ImageTiles::new(atlas, true), config(0));
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new();

    puzzle.init_puzzle(3, &mut queue).unwrap();
    puzzle.resize(Viewport::new(300, 300), &mut surface).unwrap();

    let frame = surface.last_frame();
    let numerals: Vec<usize> = frame
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, DrawCommand::Text { .. }))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(numerals.len(), 8);

    for i in numerals {
        assert!(matches!(frame[i - 1], DrawCommand::Stroke { .. }));
        assert!(matches!(frame[i - 2], DrawCommand::Image { .. }));
    }
}

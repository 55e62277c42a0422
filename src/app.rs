use crate::cli::AppConfig;
use crate::controller::{Controller, GameMode};
use crate::geometry::Viewport;
use crate::render::glyphs::{find_system_font, load_font};
use crate::render::image_surface::ImageSurface;
use crate::scheduler::FrameQueue;
use crate::surface::Surface;
use crate::tile_source::ImageAtlas;

#[cfg(feature = "sdl2")]
use crate::{
    engine::TickOutcome, geometry::Point, input::InputEvent, render::sdl_surface::SdlSurface,
    render::GameEvent,
};

use log::{info, warn};
use rusttype::Font;
use std::path::Path;
use std::rc::Rc;

#[cfg(feature = "sdl2")]
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
    mouse::MouseButton,
};
#[cfg(feature = "sdl2")]
use std::{cell::Cell, time::Duration};

/// Mouse id SDL uses for mouse events it synthesizes from touches.
#[cfg(feature = "sdl2")]
const TOUCH_MOUSE_ID: u32 = u32::MAX;

pub struct PuzzleApp {
    config: AppConfig,
}

impl PuzzleApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let font = self.load_font()?;

        if let Some(path) = &self.config.snapshot {
            return self.snapshot(path, font);
        }

        #[cfg(feature = "sdl2")]
        {
            self.run_window(font)
        }

        #[cfg(not(feature = "sdl2"))]
        {
            Err("Built without a window, use --snapshot".into())
        }
    }

    fn load_font(&self) -> Result<Option<Font<'static>>, Box<dyn std::error::Error>> {
        if let Some(path) = &self.config.font {
            return Ok(Some(load_font(path)?));
        }

        let font = find_system_font();

        if font.is_none() {
            warn!("No system font found, pass one with --font");
        }

        Ok(font)
    }

    /// Deals a board and writes its first frame to `path`.
    fn snapshot(&self, path: &Path, font: Option<Font<'static>>) -> Result<(), Box<dyn std::error::Error>> {
        let mut surface = ImageSurface::new(font);
        let mut queue = FrameQueue::new();
        let mut controller: Controller<ImageSurface> = Controller::new(self.config.puzzle.clone());
        let side = self.config.puzzle.max_dimension;

        controller.resize(Viewport::new(side, side), &mut surface)?;
        controller.select_mode(self.config.mode);

        if self.config.mode == GameMode::Image {
            if let Some(image) = &self.config.image {
                let rgba = image.to_rgba8();
                let (width, height) = rgba.dimensions();

                controller.atlas_loaded(ImageAtlas::loaded(Rc::new(rgba), width, height), &mut surface, &mut queue)?;
            }
        }

        controller.select_grid_size(self.config.puzzle.grid_size, &mut surface, &mut queue)?;

        if let Some(handle) = queue.pop() {
            controller.tick(handle, &mut surface, &mut queue)?;
        }

        surface.save(path)?;

        let (width, height) = surface.size();
        info!("Saved {}x{} board to {}", width, height, path.display());

        Ok(())
    }

    #[cfg(feature = "sdl2")]
    fn run_window(&self, font: Option<Font<'static>>) -> Result<(), Box<dyn std::error::Error>> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let side = self.config.puzzle.max_dimension;

        let mut window_builder = video_subsystem.window("Sliding Puzzle", side, side);
        window_builder.position_centered().resizable();

        if self.config.window.fullscreen {
            window_builder.fullscreen_desktop();
        }

        let window = window_builder.build()?;

        let mut canvas_builder = window.into_canvas().accelerated();

        if self.config.window.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }

        let mut surface = SdlSurface::new(canvas_builder.build()?, font);
        let mut queue = FrameQueue::new();
        let mut controller: Controller<SdlSurface> = Controller::new(self.config.puzzle.clone());

        let solved = Rc::new(Cell::new(None));
        let on_solved = Rc::clone(&solved);
        controller.on_event(move |event: &GameEvent| {
            if let GameEvent::Solved { moves } = event {
                on_solved.set(Some(*moves));
            }
        });

        let (width, height) = surface.window_mut().size();
        let mut viewport = Viewport::new(width, height);

        controller.resize(viewport, &mut surface)?;
        controller.select_mode(self.config.mode);

        if self.config.mode == GameMode::Image {
            if let Some(image) = &self.config.image {
                let rgba = image.to_rgba8();
                let texture = surface.load_image(&rgba)?;

                controller.atlas_loaded(
                    ImageAtlas::loaded(texture, rgba.width(), rgba.height()),
                    &mut surface,
                    &mut queue,
                )?;
            }
        }

        controller.select_grid_size(self.config.puzzle.grid_size, &mut surface, &mut queue)?;

        let mut event_pump = sdl_context.event_pump()?;
        let mut dirty = true;

        'running: loop {
            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => break 'running,
                    Event::KeyDown {
                        keycode: Some(Keycode::R),
                        ..
                    } => {
                        surface.window_mut().set_title("Sliding Puzzle")?;
                        controller.restart(&mut surface, &mut queue)?;
                        dirty = true;
                    }
                    Event::MouseButtonDown { which, .. } if which == TOUCH_MOUSE_ID => {}
                    Event::MouseButtonDown {
                        mouse_btn: MouseButton::Left,
                        x,
                        y,
                        ..
                    } => {
                        controller.handle_input(&InputEvent::pointer(x as f64, y as f64));
                    }
                    Event::FingerDown { x, y, .. } => {
                        // Finger positions are normalized to the window.
                        let point = Point::new(
                            x as f64 * viewport.width as f64,
                            y as f64 * viewport.height as f64,
                        );

                        controller.handle_input(&InputEvent::Touch(vec![point]));
                    }
                    Event::Window {
                        win_event: WindowEvent::Resized(width, height) | WindowEvent::SizeChanged(width, height),
                        ..
                    } => {
                        viewport = Viewport::new(width.max(0) as u32, height.max(0) as u32);
                        controller.resize(viewport, &mut surface)?;
                        dirty = true;
                    }
                    Event::Window {
                        win_event: WindowEvent::Exposed,
                        ..
                    } => {
                        controller.resize(viewport, &mut surface)?;
                        dirty = true;
                    }
                    _ => {}
                }
            }

            // Frames requested while ticking belong to the next pass.
            for _ in 0..queue.pending() {
                if let Some(handle) = queue.pop() {
                    let outcome = controller.tick(handle, &mut surface, &mut queue)?;
                    dirty |= outcome != TickOutcome::Stale;
                }
            }

            if let Some(moves) = solved.take() {
                info!("Solved in {} moves", moves);
                surface
                    .window_mut()
                    .set_title(&format!("Sliding Puzzle - solved in {} moves", moves))?;
            }

            if dirty {
                surface.present();
                dirty = false;
            }

            if !self.config.window.vsync {
                std::thread::sleep(Duration::from_millis(16));
            }
        }

        Ok(())
    }
}

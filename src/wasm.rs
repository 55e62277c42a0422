use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::{console, Event, HtmlImageElement, MouseEvent, TouchEvent};

use crate::config::PuzzleConfig;
use crate::controller::{Controller, GameMode};
use crate::geometry::{Point, Viewport};
use crate::input::{client_to_surface, InputEvent};
use crate::render::canvas_surface::CanvasSurface;
use crate::render::GameEvent;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::tile_source::ImageAtlas;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from(format!("[{}] {}", record.target(), record.args()));

        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug | Level::Trace => console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Routes `log` records to the browser console.
#[wasm_bindgen]
pub fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from("No global window exists"))
}

type FrameCallback = Rc<dyn Fn(FrameHandle)>;

/// Frame scheduler over `requestAnimationFrame`.
#[derive(Default)]
struct RafScheduler {
    next: u64,
    ids: HashMap<FrameHandle, i32>,
    on_frame: Option<FrameCallback>,
}

impl RafScheduler {
    fn fired(&mut self, handle: FrameHandle) {
        self.ids.remove(&handle);
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;

        let Some(on_frame) = self.on_frame.clone() else {
            warn!("Frame {} requested before the page was wired up", handle.0);
            return handle;
        };

        let callback = Closure::once_into_js(move |_timestamp: f64| on_frame(handle));
        let requested = window().and_then(|w| w.request_animation_frame(callback.unchecked_ref()));

        match requested {
            Ok(id) => {
                self.ids.insert(handle, id);
            }
            Err(e) => error!("requestAnimationFrame failed: {:?}", e),
        }

        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(id) = self.ids.remove(&handle) {
            if let Ok(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

struct WebState {
    controller: Controller<CanvasSurface>,
    surface: CanvasSurface,
    scheduler: RafScheduler,
}

impl WebState {
    fn frame(&mut self, handle: FrameHandle) {
        self.scheduler.fired(handle);

        if let Err(e) = self.controller.tick(handle, &mut self.surface, &mut self.scheduler) {
            error!("{}", e);
        }
    }

    fn input(&mut self, client: Point, touch: bool) {
        let point = client_to_surface(client, self.surface.bounds());
        let event = if touch {
            InputEvent::Touch(vec![point])
        } else {
            InputEvent::Pointer(point)
        };

        self.controller.handle_input(&event);
    }

    fn resize(&mut self) -> Result<(), JsValue> {
        let window = window()?;
        let width = window.inner_width()?.as_f64().unwrap_or(0.0);
        let height = window.inner_height()?.as_f64().unwrap_or(0.0);

        self.controller
            .resize(Viewport::new(width as u32, height as u32), &mut self.surface)
            .map_err(to_js)?;

        Ok(())
    }
}

fn to_js<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from(error.to_string())
}

#[derive(Default)]
struct Callbacks {
    on_start: Option<js_sys::Function>,
    on_win: Option<js_sys::Function>,
}

/// Controller events, queued while the state is borrowed and delivered to
/// page callbacks once it is released.
#[derive(Clone, Default)]
struct Notifier {
    queue: Rc<RefCell<Vec<GameEvent>>>,
    callbacks: Rc<RefCell<Callbacks>>,
}

impl Notifier {
    fn push(&self, event: &GameEvent) {
        self.queue.borrow_mut().push(event.clone());
    }

    fn dispatch(&self) {
        let pending: Vec<GameEvent> = self.queue.borrow_mut().drain(..).collect();
        let (on_start, on_win) = {
            let callbacks = self.callbacks.borrow();
            (callbacks.on_start.clone(), callbacks.on_win.clone())
        };

        for event in pending {
            let result = match (&event, &on_start, &on_win) {
                (GameEvent::Started { mode, grid_size }, Some(callback), _) => callback.call2(
                    &JsValue::NULL,
                    &JsValue::from(mode.to_string()),
                    &JsValue::from(*grid_size as u32),
                ),
                (GameEvent::Solved { moves }, _, Some(callback)) => {
                    callback.call1(&JsValue::NULL, &JsValue::from(*moves as u32))
                }
                _ => Ok(JsValue::UNDEFINED),
            };

            if let Err(e) = result {
                error!("Page callback failed: {:?}", e);
            }
        }
    }
}

/// Browser front end: one canvas, one puzzle.
#[wasm_bindgen]
pub struct WebPuzzle {
    state: Rc<RefCell<WebState>>,
    notifier: Notifier,
}

#[wasm_bindgen]
impl WebPuzzle {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, seed: Option<u64>) -> Result<WebPuzzle, JsValue> {
        init_panic_hook();

        let surface = CanvasSurface::from_element_id(canvas_id).map_err(to_js)?;
        let config = PuzzleConfig {
            seed,
            ..Default::default()
        };

        let notifier = Notifier::default();
        let mut controller = Controller::new(config);
        let queued = notifier.clone();
        controller.on_event(move |event: &GameEvent| queued.push(event));

        let state = Rc::new(RefCell::new(WebState {
            controller,
            surface,
            scheduler: RafScheduler::default(),
        }));

        let weak: Weak<RefCell<WebState>> = Rc::downgrade(&state);
        let frame_notifier = notifier.clone();
        state.borrow_mut().scheduler.on_frame = Some(Rc::new(move |handle| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().frame(handle);
                frame_notifier.dispatch();
            }
        }));

        state.borrow_mut().resize()?;

        info!("Puzzle attached to #{}", canvas_id);

        Ok(WebPuzzle { state, notifier })
    }

    /// Accepts "0"/"number" or "1"/"image".
    pub fn select_mode(&mut self, mode: &str) -> Result<bool, JsValue> {
        let mode: GameMode = mode.parse().map_err(|e: String| JsValue::from(e))?;

        Ok(self.state.borrow_mut().controller.select_mode(mode))
    }

    pub fn select_grid_size(&mut self, grid_size: usize) -> Result<bool, JsValue> {
        let started = {
            let mut state = self.state.borrow_mut();
            let WebState {
                controller,
                surface,
                scheduler,
            } = &mut *state;

            controller.select_grid_size(grid_size, surface, scheduler).map_err(to_js)?
        };

        self.notifier.dispatch();

        Ok(started)
    }

    /// Starts loading the picture for image mode. A pending image game
    /// begins once the browser reports the image as loaded.
    pub fn load_image(&mut self, url: &str) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        let state = Rc::downgrade(&self.state);
        let loaded = image.clone();
        let notifier = self.notifier.clone();

        let onload = Closure::once_into_js(move || {
            let Some(state) = state.upgrade() else {
                return;
            };

            let atlas = ImageAtlas::loaded(loaded.clone(), loaded.natural_width(), loaded.natural_height());
            let result = {
                let mut state = state.borrow_mut();
                let WebState {
                    controller,
                    surface,
                    scheduler,
                } = &mut *state;

                controller.atlas_loaded(atlas, surface, scheduler)
            };

            if let Err(e) = result {
                error!("{}", e);
            }

            notifier.dispatch();
        });

        image.set_onload(Some(onload.unchecked_ref()));
        image.set_src(url);

        Ok(())
    }

    pub fn restart(&mut self) -> Result<bool, JsValue> {
        let restarted = {
            let mut state = self.state.borrow_mut();
            let WebState {
                controller,
                surface,
                scheduler,
            } = &mut *state;

            controller.restart(surface, scheduler).map_err(to_js)?
        };

        self.notifier.dispatch();

        Ok(restarted)
    }

    pub fn resize(&mut self) -> Result<(), JsValue> {
        self.state.borrow_mut().resize()
    }

    pub fn handle_click(&mut self, event: &MouseEvent) {
        let client = Point::new(event.client_x() as f64, event.client_y() as f64);

        self.state.borrow_mut().input(client, false);
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) {
        event.prevent_default();

        let Some(touch) = event.touches().get(0) else {
            return;
        };
        let client = Point::new(touch.client_x() as f64, touch.client_y() as f64);

        self.state.borrow_mut().input(client, true);
    }

    /// Called with `(mode, gridSize)` whenever a board is dealt.
    pub fn on_start(&mut self, callback: js_sys::Function) {
        self.notifier.callbacks.borrow_mut().on_start = Some(callback);
    }

    /// Called with the move count once the board is solved.
    pub fn on_win(&mut self, callback: js_sys::Function) {
        self.notifier.callbacks.borrow_mut().on_win = Some(callback);
    }

    /// Wires canvas clicks, touches and window resizes to this puzzle.
    pub fn attach_listeners(&self) -> Result<(), JsValue> {
        let canvas = self.state.borrow().surface.canvas().clone();

        let state = Rc::downgrade(&self.state);
        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if let Some(state) = state.upgrade() {
                let client = Point::new(event.client_x() as f64, event.client_y() as f64);
                state.borrow_mut().input(client, false);
            }
        });
        canvas.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        let state = Rc::downgrade(&self.state);
        let on_touch = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            event.prevent_default();

            if let (Some(state), Some(touch)) = (state.upgrade(), event.touches().get(0)) {
                let client = Point::new(touch.client_x() as f64, touch.client_y() as f64);
                state.borrow_mut().input(client, true);
            }
        });
        canvas.add_event_listener_with_callback("touchstart", on_touch.as_ref().unchecked_ref())?;
        on_touch.forget();

        let state = Rc::downgrade(&self.state);
        let on_resize = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Some(state) = state.upgrade() {
                if let Err(e) = state.borrow_mut().resize() {
                    error!("Resize failed: {:?}", e);
                }
            }
        });
        window()?.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();

        Ok(())
    }
}

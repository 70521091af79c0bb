//! Turtle Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use turtle_dodge::Tuning;
    use turtle_dodge::platform::{KeyAction, action_for_key};
    use turtle_dodge::renderer::CanvasRenderer;
    use turtle_dodge::sim::{Command, GameEvent, GameState, TickToken, Viewport, autopilot, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        /// Handle of the queued animation frame
        raf_id: Option<i32>,
        /// Callback for `raf_id`, dropped when the frame is replaced or cancelled
        frame: Option<Closure<dyn FnMut(f64)>>,
        autopilot: bool,
    }

    impl Game {
        fn draw(&self) {
            if let Err(e) = self.renderer.render(&self.state.snapshot()) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Cancel the queued frame and its clock tick
        fn cancel_frame(&mut self) {
            if let Some(id) = self.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            self.frame = None;
            self.state.clock.stop();
        }

        fn resize_to_window(&mut self) {
            let (width, height) = window_size();
            if let Err(e) = self.renderer.resize(width, height) {
                log::warn!("Canvas resize failed: {:?}", e);
            }
            self.state.resize(width, height);
        }
    }

    fn window_size() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (0.0, 0.0);
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width as f32, height as f32)
    }

    /// Tuning override from `<canvas data-tuning='{...}'>`, defaults otherwise
    fn load_tuning(canvas: &HtmlCanvasElement) -> Tuning {
        let Some(json) = canvas.get_attribute("data-tuning") else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Turtle Dodge starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let tuning = load_tuning(&canvas);
        let renderer = CanvasRenderer::new(canvas, window.device_pixel_ratio())?;

        let seed = js_sys::Date::now() as u64;
        let (width, height) = window_size();
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, Viewport::new(width, height), tuning),
            renderer,
            raf_id: None,
            frame: None,
            autopilot: false,
        }));
        game.borrow_mut().resize_to_window();

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_resize_handler(game.clone());
        setup_restart_button(game.clone());

        request_animation_frame(game);

        log::info!("Turtle Dodge running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(action) = action_for_key(&event.key()) else {
                return;
            };
            event.prevent_default();
            match action {
                KeyAction::Sim(Command::Restart) => restart(&game),
                KeyAction::Sim(command) => game.borrow_mut().state.apply_command(command),
                KeyAction::ToggleAutopilot => {
                    let mut g = game.borrow_mut();
                    g.autopilot = !g.autopilot;
                    log::info!("Autopilot: {}", g.autopilot);
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.resize_to_window();
            // Keep the terminal frame visible while no steps run
            if !g.state.clock.is_running() {
                g.draw();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Optional DOM button; Enter/R restart without it
    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                restart(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Cancel any queued frame before resetting so a stale tick cannot run
    fn restart(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.cancel_frame();
            g.state.apply_command(Command::Restart);
            g.draw();
            log::info!("Game restarted");
        }
        request_animation_frame(game.clone());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(token) = game.borrow_mut().state.clock.schedule() else {
            return;
        };
        let frame_game = game.clone();
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            game_loop(frame_game.clone(), token, time);
        });
        let requested = window.request_animation_frame(closure.as_ref().unchecked_ref());
        let mut g = game.borrow_mut();
        match requested {
            Ok(id) => {
                g.raf_id = Some(id);
                // Replacing the previous frame's closure frees it
                g.frame = Some(closure);
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                g.state.clock.stop();
            }
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>, token: TickToken, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.raf_id = None;

            if g.autopilot {
                if let Some(command) = autopilot::steer(&g.state) {
                    g.state.apply_command(command);
                }
            }

            for event in tick(&mut g.state, token, time) {
                match event {
                    GameEvent::Collided { id, score } => {
                        log::info!("Hit by obstacle {} - game over, final score {}", id, score);
                    }
                    GameEvent::Scored { score, .. } => log::debug!("Score: {}", score),
                    GameEvent::Spawned { id, kind } => log::debug!("Spawned {:?} #{}", kind, id),
                }
            }

            g.draw();
        }

        // No-op once the clock has stopped
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Turtle Dodge (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the simulation at a simulated 60 Hz with the autopilot at the keys
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use std::time::{SystemTime, UNIX_EPOCH};
    use turtle_dodge::Tuning;
    use turtle_dodge::sim::{GameEvent, GameState, Viewport, autopilot, tick};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_STEPS: u64 = 60 * 60 * 5;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = GameState::new(seed, Viewport::new(800.0, 600.0), Tuning::default());
    log::info!("Game initialized with seed: {}", seed);

    let mut now = 0.0;
    while let Some(token) = state.clock.schedule() {
        if let Some(command) = autopilot::steer(&state) {
            state.apply_command(command);
        }
        for event in tick(&mut state, token, now) {
            match event {
                GameEvent::Collided { id, score } => {
                    log::info!("Hit by obstacle {} - game over, final score {}", id, score);
                }
                GameEvent::Scored { score, .. } if score % 10 == 0 => {
                    log::info!("Score: {}", score)
                }
                _ => {}
            }
        }
        now += FRAME_MS;
        if state.steps() >= MAX_STEPS {
            log::info!("Step limit reached");
            break;
        }
    }

    log::info!(
        "Demo (seed {}) finished after {} steps: score {}, phase {:?}",
        state.seed(),
        state.steps(),
        state.score,
        state.phase
    );
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => log::info!("Final snapshot:\n{}", json),
        Err(e) => log::error!("Snapshot serialization failed: {}", e),
    }
}

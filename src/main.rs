//! Ring Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use glam::Vec2;
    use ring_runner::assets::PlayerModel;
    use ring_runner::audio::{AudioManager, SoundEffect};
    use ring_runner::consts::*;
    use ring_runner::renderer::{RenderState, scene, vertex::colors};
    use ring_runner::settings::Settings;
    use ring_runner::sim::{
        self, EndCause, GameEvent, GamePhase, RoundState, Steering, TickInput,
    };

    const PICKUP_QUIPS: &[&str] = &[
        "Ring secured!",
        "Clean pass!",
        "Keep the chain going!",
        "Bonus time!",
        "Threaded it!",
    ];

    const CRASH_QUIPS: &[&str] = &[
        "That one had your name on it.",
        "The scenery fought back.",
        "Obstacles: 1, you: 0.",
    ];

    fn random_quip(list: &[&str]) -> String {
        let i = (js_sys::Math::random() * list.len() as f64) as usize;
        list[i.min(list.len() - 1)].to_string()
    }

    /// Held directional keys
    #[derive(Debug, Default, Clone, Copy)]
    struct KeyState {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    }

    impl KeyState {
        fn axis(&self) -> Vec2 {
            let mut axis = Vec2::ZERO;
            if self.left {
                axis.x -= 1.0;
            }
            if self.right {
                axis.x += 1.0;
            }
            if self.down {
                axis.y -= 1.0;
            }
            if self.up {
                axis.y += 1.0;
            }
            axis
        }

        fn any(&self) -> bool {
            self.up || self.down || self.left || self.right
        }
    }

    /// Game instance holding all state
    struct Game {
        state: RoundState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        input: TickInput,
        keys: KeyState,
        /// Normalized pointer position in [-1, 1], y up
        pointer: Vec2,
        pointer_down: bool,
        accumulator: f32,
        last_time: f64,
        /// Active depletion timer, cleared when the round ends
        clock_handle: Option<i32>,
        /// Mesh fetched at startup; frames fall back to the flat marker
        /// until it arrives
        player_model: Option<PlayerModel>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_music_volume(settings.music_volume);
            let input = TickInput {
                reduced_motion: settings.reduced_motion,
                ..TickInput::default()
            };
            Self {
                state: RoundState::new(seed),
                render_state: None,
                audio,
                settings,
                input,
                keys: KeyState::default(),
                pointer: Vec2::ZERO,
                pointer_down: false,
                accumulator: 0.0,
                last_time: 0.0,
                clock_handle: None,
                player_model: None,
            }
        }

        /// Fold keyboard and pointer into one steering input. An active
        /// pointer wins; otherwise held keys steer; otherwise coast.
        fn derive_steering(&mut self) {
            let (axis, engaged) = if self.pointer_down {
                (self.pointer, true)
            } else if self.keys.any() {
                (self.keys.axis(), true)
            } else {
                (Vec2::ZERO, false)
            };
            self.input.steering = Steering {
                axis: axis.clamp(Vec2::splat(-1.0), Vec2::ONE),
                engaged,
            };
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.derive_steering();
                let events = sim::tick(&mut self.state, &self.input);
                self.handle_events(&events);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// React to simulation events: sound, quips, screen changes
        fn handle_events(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::RingCollected => {
                        self.audio.play(SoundEffect::RingChime);
                        show_quip(&random_quip(PICKUP_QUIPS));
                    }
                    GameEvent::ObstacleHit => {
                        self.audio.stop_music();
                        self.audio.play(SoundEffect::Explosion);
                        show_quip(&random_quip(CRASH_QUIPS));
                    }
                    GameEvent::CountdownStarted => {
                        log::info!("Live section countdown started");
                    }
                    GameEvent::WentLive => {
                        self.audio.play(SoundEffect::LiveSwitch);
                        log::info!("Round is live");
                    }
                    GameEvent::RoundOver(cause) => {
                        self.stop_clock();
                        self.audio.stop_music();
                        if *cause == EndCause::TimeExpired {
                            self.audio.play(SoundEffect::TimeUp);
                        }
                        log::info!(
                            "Round over ({:?}): score {} streak {}",
                            cause,
                            self.state.final_score,
                            self.state.final_streak
                        );
                        self.show_game_over();
                    }
                }
            }
        }

        fn start_round(&mut self) {
            self.audio.resume();
            self.state.start_round();
            self.accumulator = 0.0;
            self.audio.start_music();
            show_screen("game-screen");
            log::info!("Round started");
        }

        fn stop_clock(&mut self) {
            if let Some(handle) = self.clock_handle.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
        }

        fn show_game_over(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&self.state.final_score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-streak") {
                el.set_text_content(Some(&self.state.final_streak.to_string()));
            }
            show_screen("game-over-screen");
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };

            let live = self.state.phase == GamePhase::Playing && self.state.tutorial.live;
            render_state.set_clear_color(if live {
                colors::SKY
            } else {
                colors::SKY_TUTORIAL
            });

            let frame = scene::build(
                &self.state,
                render_state.aspect(),
                self.player_model.as_ref(),
            );
            match render_state.render(&frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.0}", self.state.time_left.ceil())));
            }

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document
                .query_selector("#hud-streak .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.streak.to_string()));
            }

            if let Some(el) = document
                .query_selector("#hud-altitude .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&format!("{:.1}", self.state.player.altitude())));
            }

            // Countdown banner during the tutorial window
            if let Some(el) = document.get_element_by_id("countdown") {
                match self.state.countdown_value() {
                    Some(value) => {
                        let _ = el.set_attribute("class", "");
                        el.set_text_content(Some(&value.to_string()));
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("hud-debug") {
                if self.settings.show_debug_hud {
                    let text = match self.state.nearest_obstacle_distance() {
                        Some(d) => format!("nearest obstacle: {d:.1}"),
                        None => "nearest obstacle: -".to_string(),
                    };
                    el.set_text_content(Some(&text));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// Show one screen div, hide the other two
    fn show_screen(id: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for screen in ["splash-screen", "game-screen", "game-over-screen"] {
            if let Some(el) = document.get_element_by_id(screen) {
                let class = if screen == id { "screen" } else { "screen hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    /// Flash a one-line quip over the play field
    fn show_quip(text: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("quip") {
            el.set_text_content(Some(text));
            let _ = el.set_attribute("class", "quip visible");
        }
    }

    /// Start the 100 ms depletion timer. It clears itself the moment the
    /// round leaves Playing, so a finished round costs nothing.
    fn start_clock(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Replace any timer from a previous round
        game.borrow_mut().stop_clock();

        let game_for_timer = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game_for_timer.borrow_mut();
            if g.state.phase != GamePhase::Playing {
                g.stop_clock();
                return;
            }
            let events = sim::clock::fire(&mut g.state);
            g.handle_events(&events);
        });

        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            CLOCK_INTERVAL_MS,
        ) {
            Ok(handle) => game.borrow_mut().clock_handle = Some(handle),
            Err(e) => log::error!("Failed to start round clock: {e:?}"),
        }
        closure.forget();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ring Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut()
            .state
            .set_aspect(width as f32 / height.max(1) as f32);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        // Player model loads alongside the round; a failure degrades to the
        // fallback marker rather than blocking anything
        let game_for_model = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match ring_runner::assets::fetch_player_model("player.json").await {
                Ok(model) => {
                    log::info!("Player model loaded ({} vertices)", model.positions.len());
                    game_for_model.borrow_mut().player_model = Some(model);
                }
                Err(e) => {
                    log::warn!("Player model unavailable, continuing without it: {e:#}");
                }
            }
        });

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_mute(game.clone());

        show_screen("splash-screen");

        // Start game loop
        request_animation_frame(game);

        log::info!("Ring Runner running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard down
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.keys.up = true,
                    "ArrowDown" | "s" | "S" => g.keys.down = true,
                    "ArrowLeft" | "a" | "A" => g.keys.left = true,
                    "ArrowRight" | "d" | "D" => g.keys.right = true,
                    "h" | "H" if !event.repeat() => {
                        g.settings.show_debug_hud = !g.settings.show_debug_hud;
                        g.settings.save();
                    }
                    "r" | "R" if !event.repeat() => {
                        g.settings.reduced_motion = !g.settings.reduced_motion;
                        g.input.reduced_motion = g.settings.reduced_motion;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.keys.up = false,
                    "ArrowDown" | "s" | "S" => g.keys.down = false,
                    "ArrowLeft" | "a" | "A" => g.keys.left = false,
                    "ArrowRight" | "d" | "D" => g.keys.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move: normalized canvas position, y up
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = (event.client_x() as f64 - rect.left()) / rect.width().max(1.0);
                let y = (event.client_y() as f64 - rect.top()) / rect.height().max(1.0);
                let mut g = game.borrow_mut();
                g.pointer = Vec2::new((x * 2.0 - 1.0) as f32, -(y * 2.0 - 1.0) as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down/up toggle pointer steering
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.pointer_down = true;
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().pointer_down = false;
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch steering mirrors the mouse path
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = (touch.client_x() as f64 - rect.left()) / rect.width().max(1.0);
                    let y = (touch.client_y() as f64 - rect.top()) / rect.height().max(1.0);
                    let mut g = game.borrow_mut();
                    g.pointer = Vec2::new((x * 2.0 - 1.0) as f32, -(y * 2.0 - 1.0) as f32);
                    g.pointer_down = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().pointer_down = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize: keep surface and movement bounds in sync with the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else { return };
                let dpr = window.device_pixel_ratio();
                let width = (canvas_clone.client_width() as f64 * dpr) as u32;
                let height = (canvas_clone.client_height() as f64 * dpr) as u32;
                canvas_clone.set_width(width);
                canvas_clone.set_height(height);
                let mut g = game.borrow_mut();
                g.state.set_aspect(width as f32 / height.max(1) as f32);
                if let Some(ref mut rs) = g.render_state {
                    rs.resize(width, height);
                }
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Start and restart both launch a fresh round
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start_round();
                    start_clock(game.clone());
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Back to the splash screen from game over
        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                show_screen("splash-screen");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo round: drives the simulation at full speed and logs the
/// events, which doubles as a smoke test of the sim on native.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ring_runner::consts::*;
    use ring_runner::sim::{self, GameEvent, GamePhase, RoundState, TickInput};
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();
    log::info!("Ring Runner (native) starting headless demo round...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = RoundState::new(seed);
    state.start_round();
    log::info!("Seed: {seed}");

    let input = TickInput::default();
    let mut tick_count: u64 = 0;
    while state.phase == GamePhase::Playing {
        for event in sim::tick(&mut state, &input) {
            match event {
                GameEvent::RingCollected => log::debug!("ring collected, score {}", state.score),
                GameEvent::ObstacleHit => log::info!("obstacle hit at {:.1}s", state.elapsed_secs()),
                GameEvent::CountdownStarted => log::info!("countdown started"),
                GameEvent::WentLive => log::info!("went live, speed {:.2}", state.speed),
                GameEvent::RoundOver(cause) => log::info!("round over: {cause:?}"),
            }
        }
        tick_count += 1;

        // The browser host depletes the clock on a 100 ms timer; at 60 Hz
        // that is every 6th tick
        if tick_count % 6 == 0 {
            for event in sim::clock::fire(&mut state) {
                if let GameEvent::RoundOver(cause) = event {
                    log::info!("round over: {cause:?}");
                }
            }
        }

        if tick_count > 100 * 60 * 60 {
            log::error!("demo round never ended");
            break;
        }
    }

    println!(
        "Demo round finished after {:.1}s: score {} streak {}",
        tick_count as f32 * SIM_DT,
        state.final_score,
        state.final_streak
    );
}

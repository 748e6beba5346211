//! Physics Toys entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use physics_toys::Settings;
    use physics_toys::consts::*;
    use physics_toys::sim::{Category, Key, PhysicsEngine, RapierWorld, Session};

    /// Game instance holding all state
    struct Game {
        session: Session<RapierWorld>,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(settings: &Settings) -> Self {
            let mut session = Session::new(RapierWorld::new(), settings);
            session.populate(settings);
            Self {
                session,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.session.tick(SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let engine = &self.session.scene.engine;

            if let Some(el) = document.get_element_by_id("hud-pellets") {
                el.set_text_content(Some(&engine.count(Category::Pellet).to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-ghosts") {
                el.set_text_content(Some(&engine.count(Category::Ghost).to_string()));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Physics Toys starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(&settings)));
        match serde_json::to_string_pretty(&settings.control_values()) {
            Ok(json) => log::info!("Control values: {}", json),
            Err(e) => log::warn!("Failed to encode control values: {}", e),
        }

        setup_input_handlers(&window, game.clone());
        setup_auto_release(&window, &document, game.clone());

        request_animation_frame(game);
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = Key::from_dom_key(&event.key());
                if !matches!(key, Key::Other(_)) {
                    event.prevent_default();
                }
                game.borrow_mut().session.key_down(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = Key::from_dom_key(&event.key());
                game.borrow_mut().session.key_up(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Key-up events are lost while the page is unfocused
    fn setup_auto_release(
        window: &web_sys::Window,
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
    ) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.release_all_keys();
                    log::info!("Keys released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.release_all_keys();
                log::info!("Keys released (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Physics Toys (native) starting...");
    log::info!("Native mode runs a scripted headless session; use the web build to play");

    run_headless();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive pac through a fixed key script and report what is left
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() {
    use physics_toys::Settings;
    use physics_toys::consts::SIM_DT;
    use physics_toys::sim::{Category, Key, PhysicsEngine, RapierWorld, Session};

    let settings = Settings::load();
    match serde_json::to_string_pretty(&settings.control_values()) {
        Ok(json) => log::info!("Control values: {}", json),
        Err(e) => log::warn!("Failed to encode control values: {}", e),
    }

    let mut session = Session::new(RapierWorld::new(), &settings);
    session.populate(&settings);

    // (held key, ticks)
    let script = [
        (Key::Right, 90),
        (Key::Up, 60),
        (Key::Left, 45),
        (Key::Stop, 1),
        (Key::Down, 60),
    ];

    for (key, ticks) in script {
        log::info!("Holding {:?} for {} ticks", key, ticks);
        session.key_down(key.clone());
        for _ in 0..ticks {
            session.tick(SIM_DT);
        }
        session.key_up(&key);
    }

    // Let everything coast to a stop so the last motion episode is charted
    for _ in 0..240 {
        session.tick(SIM_DT);
    }

    let engine = &session.scene.engine;
    log::info!(
        "Done after {} ticks: {} pellets, {} ghosts remaining",
        session.time_ticks,
        engine.count(Category::Pellet),
        engine.count(Category::Ghost)
    );
}

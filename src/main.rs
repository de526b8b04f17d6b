//! Page Invaders entry point
//!
//! On wasm32 this binds the page's trigger button and runs a session per
//! click. Natively it plays a short headless game and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlImageElement;

    use page_invaders::audio::AudioManager;
    use page_invaders::input::InputEvent;
    use page_invaders::platform::Host;
    use page_invaders::platform::web::{
        self, CanvasSurface, DomTargets, InputSubscription, LocalStorage, TriggerButton,
        WebRhythmTimer,
    };
    use page_invaders::renderer::{Canvas2d, Renderer};
    use page_invaders::{HighScores, Session, Settings, Tuning};

    /// Mosaic image sampled by the enemy grid
    const IMAGE_SRC: &str = "images/profile-1.jpg";
    /// Longest frame the simulation will step in one go (seconds)
    const MAX_FRAME_DT: f32 = 0.1;

    /// Everything owned by the page for the lifetime of the module
    struct App {
        session: Session,
        image: HtmlImageElement,
        // Per-run resources, dropped when the session ends
        surface: Option<CanvasSurface>,
        renderer: Option<Renderer<Canvas2d>>,
        input: Option<InputSubscription>,
        last_time: f64,
    }

    impl App {
        fn new(weak: &Weak<RefCell<App>>, image: HtmlImageElement) -> Self {
            let on_beat = weak.clone();
            let timer = WebRhythmTimer::new(move || {
                if let Some(app) = on_beat.upgrade() {
                    app.borrow_mut().session.on_rhythm_tick();
                }
            });
            let host = Host {
                targets: Box::new(DomTargets::new()),
                trigger: Box::new(TriggerButton),
                audio: Box::new(AudioManager::new()),
                timer: Box::new(timer),
            };

            let high_scores = HighScores::load(Box::new(LocalStorage));
            let seed = js_sys::Date::now() as u64;
            let mut session =
                Session::new(host, high_scores, Settings::default(), Tuning::default(), seed)
                    .with_settings_store(Box::new(LocalStorage));
            if let Some(window) = web_sys::window() {
                session.set_touch_device(web::is_touch_device(&window));
            }

            Self {
                session,
                image,
                surface: None,
                renderer: None,
                input: None,
                last_time: 0.0,
            }
        }

        fn release(&mut self) {
            self.input = None;
            self.renderer = None;
            self.surface = None;
        }

        fn on_resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = web::viewport(&window);
            self.session.resize(viewport);
            if let Some(surface) = &self.surface {
                surface.resize(viewport);
            }
            if let Some(renderer) = &mut self.renderer {
                renderer.canvas().on_resize();
                renderer.invalidate();
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(MAX_FRAME_DT)
            } else {
                0.0
            };
            self.last_time = time;

            self.session.frame(dt);
            if let Some(renderer) = &mut self.renderer {
                renderer.draw(&self.session.scene());
            }
        }
    }

    /// Acquire the page and start a run
    fn launch(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let mut a = app.borrow_mut();
        if a.session.is_active() {
            log::debug!("Trigger ignored: session already running");
            return Ok(());
        }

        // A previous run whose frame loop has not noticed the stop yet
        a.release();

        let viewport = web::viewport(&window);
        let surface = CanvasSurface::acquire(&document, viewport)?;
        let canvas = Canvas2d::new(surface.canvas(), a.image.clone())
            .ok_or("canvas 2d context unavailable")?;
        a.renderer = Some(Renderer::new(canvas));
        a.surface = Some(surface);
        a.input = Some(subscribe(app, &window)?);
        a.last_time = 0.0;
        a.session.start(viewport);
        let run_id = a.session.run_id();
        drop(a);

        request_animation_frame(app.clone(), run_id);
        Ok(())
    }

    fn subscribe(
        app: &Rc<RefCell<App>>,
        window: &web_sys::Window,
    ) -> Result<InputSubscription, JsValue> {
        let weak = Rc::downgrade(app);
        let on_input = Rc::new(move |event: InputEvent| {
            weak.upgrade()
                .is_some_and(|app| app.borrow_mut().session.handle_input(event))
        });
        let weak = Rc::downgrade(app);
        let on_resize = Rc::new(move || {
            if let Some(app) = weak.upgrade() {
                app.borrow_mut().on_resize();
            }
        });
        InputSubscription::attach(window, on_input, on_resize)
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, run_id: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move |time: f64| game_loop(app, run_id, time));
        let _ = window.request_animation_frame(callback.unchecked_ref());
    }

    fn game_loop(app: Rc<RefCell<App>>, run_id: u64, time: f64) {
        {
            let mut a = app.borrow_mut();
            // Each run gets its own loop; an older one just stops
            if a.session.run_id() != run_id {
                log::debug!("Frame loop for run {run_id} superseded");
                return;
            }
            if !a.session.is_active() {
                a.release();
                log::info!("Page restored");
                return;
            }
            a.frame(time);
        }
        request_animation_frame(app, run_id);
    }

    fn load_image(app: &Rc<RefCell<App>>) {
        let image = app.borrow().image.clone();
        let weak = Rc::downgrade(app);
        let loaded = image.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            let size = Vec2::new(loaded.natural_width() as f32, loaded.natural_height() as f32);
            if let Some(app) = weak.upgrade() {
                app.borrow_mut().session.on_image_ready(size);
            }
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
        image.set_src(IMAGE_SRC);
    }

    fn bind_trigger(app: &Rc<RefCell<App>>) {
        let Some(button) = TriggerButton::element() else {
            log::warn!("Trigger #{} not found; game disabled", web::TRIGGER_ID);
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Err(e) = launch(&app) {
                log::warn!("Could not start game: {e:?}");
                let mut a = app.borrow_mut();
                a.session.stop();
                a.release();
            }
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Image element unavailable: {e:?}");
                return;
            }
        };
        let app = Rc::new_cyclic(|weak| RefCell::new(App::new(weak, image)));
        load_image(&app);
        bind_trigger(&app);

        log::info!("Page Invaders armed");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Page Invaders (native) - headless demo run");
    demo::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use page_invaders::input::{InputEvent, Key};
    use page_invaders::persistence::MemoryStore;
    use page_invaders::platform::Host;
    use page_invaders::sim::{GamePhase, Viewport};
    use page_invaders::{HighScores, Session, Settings, Tuning};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Ten minutes of frames
    const MAX_FRAMES: u32 = 60 * 600;

    /// Sweep the ship across the screen firing every few frames until the
    /// grid wins, then sign the table.
    pub fn run() {
        let scores = HighScores::load(Box::new(MemoryStore::new()));
        let mut session = Session::new(
            Host::headless(),
            scores,
            Settings::default(),
            Tuning::default(),
            0x5eed,
        );
        session.start(Viewport::new(800.0, 600.0));
        session.handle_input(InputEvent::KeyDown {
            key: Key::Fire,
            repeat: false,
        });

        let mut frames = 0;
        let mut heading = Key::Left;
        while session.phase() == GamePhase::Playing && frames < MAX_FRAMES {
            if frames % 90 == 0 {
                session.handle_input(InputEvent::KeyUp { key: heading });
                heading = if heading == Key::Left { Key::Right } else { Key::Left };
                session.handle_input(InputEvent::KeyDown {
                    key: heading,
                    repeat: false,
                });
            }
            if frames % 12 == 0 {
                session.handle_input(InputEvent::KeyUp { key: Key::Fire });
                session.handle_input(InputEvent::KeyDown {
                    key: Key::Fire,
                    repeat: false,
                });
            }
            session.frame(FRAME_DT);
            frames += 1;
        }

        let state = session.state();
        log::info!(
            "Run over after {:.1}s: score {}, level {}",
            frames as f32 * FRAME_DT,
            state.score,
            state.level
        );

        if session.phase() == GamePhase::NameEntry {
            session.handle_input(InputEvent::KeyDown {
                key: Key::Confirm,
                repeat: false,
            });
        }
        for (rank, entry) in session.high_scores().entries().iter().enumerate() {
            log::info!("{}. {} {}", rank + 1, entry.name, entry.score);
        }
        session.stop();
    }
}

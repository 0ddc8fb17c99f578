//! Club Arcade entry point
//!
//! In the browser this binds the page canvas, input listeners and the frame
//! loop. Natively it plays a short scripted session against every game and
//! prints the resulting stats.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Result, anyhow};
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use club_arcade::Game;
    use club_arcade::manager::{Arcade, GameManager};
    use club_arcade::persistence::{LocalStorage, MemoryStore, Store};
    use club_arcade::platform::{
        FrameClock, LoopHandle, hud, map_key, pointer_to_canvas, should_prevent_default,
    };
    use club_arcade::renderer::{DrawList, RenderState};
    use club_arcade::settings::Difficulty;
    use club_arcade::sim::{InputEvent, Key};

    const CANVAS_ID: &str = "game-canvas";
    const HUD_ID: &str = "hud";
    const DEFAULT_CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    /// Everything the page callbacks share
    struct Host {
        arcade: Arcade,
        render_state: Option<RenderState>,
        list: DrawList,
        clock: FrameClock,
        canvas: Option<HtmlCanvasElement>,
        hud: Option<Element>,
    }

    thread_local! {
        static HOST: RefCell<Option<Rc<RefCell<Host>>>> = const { RefCell::new(None) };
    }

    fn host() -> Option<Rc<RefCell<Host>>> {
        HOST.with(|h| h.borrow().clone())
    }

    impl Host {
        fn frame(&mut self, time: f64) {
            let ticks = self.clock.advance(time);
            for _ in 0..ticks {
                self.arcade.tick();
            }
            self.arcade.render(&mut self.list);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.list) {
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
            self.update_hud();
        }

        /// Match the canvas backing size to the running game
        fn fit_canvas(&mut self) {
            let size = self
                .arcade
                .manager()
                .and_then(|m| m.current().map(|g| g.canvas_size()))
                .unwrap_or(DEFAULT_CANVAS);
            let (w, h) = (size.x as u32, size.y as u32);
            if let Some(ref canvas) = self.canvas {
                canvas.set_width(w);
                canvas.set_height(h);
            }
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(w, h);
            }
            self.list.reset(size.x, size.y);
        }

        fn update_hud(&self) {
            let (Some(hud), Some(canvas)) = (&self.hud, &self.canvas) else {
                return;
            };
            let scale = if canvas.width() > 0 {
                canvas.client_width() as f32 / canvas.width() as f32
            } else {
                1.0
            };
            hud.set_inner_html(&hud::markup(self.list.texts(), scale));
        }

        fn clear_hud(&mut self) {
            self.list.reset(self.list.width(), self.list.height());
            if let Some(ref hud) = self.hud {
                hud.set_inner_html("");
            }
        }

        fn has_game(&mut self) -> bool {
            self.arcade
                .manager()
                .is_some_and(|m| m.current().is_some())
        }
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn find_canvas() -> Result<HtmlCanvasElement> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow!("No document"))?;
        document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| anyhow!("Missing #{CANVAS_ID} element"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| anyhow!("#{CANVAS_ID} is not a canvas"))
    }

    async fn init_surface(canvas: &HtmlCanvasElement) -> Result<RenderState> {
        let (w, h) = (DEFAULT_CANVAS.x as u32, DEFAULT_CANVAS.y as u32);
        canvas.set_width(w);
        canvas.set_height(h);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| anyhow!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("No suitable GPU adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, w, h).await
    }

    fn open_store() -> Box<dyn Store> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{e:#}; progress will not be saved");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Club Arcade starting...");

        let seed = js_sys::Date::now() as u64;
        let canvas = find_canvas();
        let surface = match &canvas {
            Ok(canvas) => init_surface(canvas).await,
            Err(e) => Err(anyhow!("{e:#}")),
        };

        let (arcade, render_state) = match surface {
            Ok(render_state) => (
                Arcade::Live(GameManager::new(open_store(), seed)),
                Some(render_state),
            ),
            Err(e) => {
                alert("The arcade is unavailable: this browser could not provide a drawing surface.");
                (Arcade::disabled(format!("{e:#}")), None)
            }
        };

        let hud = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(HUD_ID));
        let canvas = canvas.ok();

        let host = Rc::new(RefCell::new(Host {
            arcade,
            render_state,
            list: DrawList::new(DEFAULT_CANVAS.x, DEFAULT_CANVAS.y),
            clock: FrameClock::new(),
            canvas: canvas.clone(),
            hud,
        }));

        if let Some(ref canvas) = canvas {
            setup_input_handlers(canvas, host.clone());
        }
        HOST.with(|h| *h.borrow_mut() = Some(host));

        log::info!("Club Arcade ready (seed {seed})");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Keyboard
        {
            let host = host.clone();
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = map_key(&event.key()) else {
                    return;
                };
                let mut h = host.borrow_mut();
                if !h.has_game() {
                    return;
                }
                if should_prevent_default(key) {
                    event.prevent_default();
                }
                h.arcade.handle_input(&InputEvent::KeyDown(key));
                if key == Key::Escape {
                    h.clear_hud();
                }
            });
            if let Err(e) = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref()) {
                log::warn!("Failed to register keydown listener: {e:?}");
            }
            closure.forget();
        }

        {
            let host = host.clone();
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = map_key(&event.key()) {
                    host.borrow_mut()
                        .arcade
                        .handle_input(&InputEvent::KeyUp(key));
                }
            });
            if let Err(e) = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref()) {
                log::warn!("Failed to register keyup listener: {e:?}");
            }
            closure.forget();
        }

        // Pointer position in canvas pixels
        fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
            let rect = canvas.get_bounding_client_rect();
            pointer_to_canvas(
                Vec2::new(event.client_x() as f32, event.client_y() as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
                Vec2::new(rect.width() as f32, rect.height() as f32),
                Vec2::new(canvas.width() as f32, canvas.height() as f32),
            )
        }

        // Mouse move
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = canvas_point(&canvas_clone, &event);
                host.borrow_mut()
                    .arcade
                    .handle_input(&InputEvent::PointerMove(p));
            });
            if let Err(e) = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref()) {
                log::warn!("Failed to register mousemove listener: {e:?}");
            }
            closure.forget();
        }

        // Click
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = canvas_point(&canvas_clone, &event);
                host.borrow_mut().arcade.handle_input(&InputEvent::Click(p));
            });
            if let Err(e) = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref()) {
                log::warn!("Failed to register mousedown listener: {e:?}");
            }
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>, handle: LoopHandle) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, handle, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("Failed to schedule frame: {e:?}");
        }
        closure.forget();
    }

    /// Runs while the handle is live; a cancelled handle ends the chain
    fn game_loop(host: Rc<RefCell<Host>>, handle: LoopHandle, time: f64) {
        if handle.is_cancelled() {
            log::debug!("Frame loop stopped");
            return;
        }
        host.borrow_mut().frame(time);
        request_animation_frame(host, handle);
    }

    #[wasm_bindgen(js_name = loadGame)]
    pub fn load_game(game_type: &str) -> bool {
        let Some(host) = host() else {
            log::error!("loadGame called before the arcade started");
            return false;
        };
        let handle = {
            let mut h = host.borrow_mut();
            let Some(handle) = h.arcade.load_game(game_type) else {
                return false;
            };
            h.clock.reset();
            h.fit_canvas();
            handle
        };
        request_animation_frame(host, handle);
        true
    }

    #[wasm_bindgen(js_name = closeGame)]
    pub fn close_game() {
        if let Some(host) = host() {
            let mut h = host.borrow_mut();
            h.arcade.close_game();
            h.clear_hud();
        }
    }

    /// Stats summary as JSON
    #[wasm_bindgen(js_name = getGameStats)]
    pub fn get_game_stats() -> String {
        let Some(host) = host() else {
            return "{}".to_string();
        };
        let summary = host.borrow().arcade.get_game_stats();
        serde_json::to_string(&summary).unwrap_or_else(|e| {
            log::warn!("Failed to encode stats: {e}");
            "{}".to_string()
        })
    }

    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(level: &str) -> bool {
        let Some(difficulty) = Difficulty::from_str(level) else {
            log::error!("Unknown difficulty: {level:?}");
            return false;
        };
        let Some(host) = host() else {
            return false;
        };
        let mut h = host.borrow_mut();
        match h.arcade.manager() {
            Some(manager) => {
                manager.set_difficulty(difficulty);
                true
            }
            None => false,
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_host::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result, bail};
    use glam::Vec2;

    use club_arcade::persistence::{FileStore, MemoryStore, Store};
    use club_arcade::renderer::DrawList;
    use club_arcade::sim::{InputEvent, Key};
    use club_arcade::{Game, GameKind, GameManager};

    /// Command-line options
    struct Options {
        store_dir: Option<String>,
        seed: u64,
        ticks: u32,
    }

    impl Options {
        fn parse() -> Result<Self> {
            let mut options = Options {
                store_dir: None,
                seed: 1,
                ticks: 3600,
            };
            let mut args = std::env::args().skip(1);
            while let Some(arg) = args.next() {
                let mut value = || args.next().with_context(|| format!("{arg} needs a value"));
                match arg.as_str() {
                    "--store" => options.store_dir = Some(value()?),
                    "--seed" => options.seed = value()?.parse().context("--seed must be a number")?,
                    "--ticks" => {
                        options.ticks = value()?.parse().context("--ticks must be a number")?
                    }
                    other => bail!("Unknown argument {other:?} (expected --store, --seed, --ticks)"),
                }
            }
            Ok(options)
        }
    }

    const KEYS: [Key; 4] = [Key::Right, Key::Down, Key::Left, Key::Up];

    /// Deterministic stand-in for a player: turns, pointer sweeps, clicks
    fn scripted_input(tick: u32, canvas: Vec2) -> Option<InputEvent> {
        let key = KEYS[(tick / 20) as usize % KEYS.len()];
        match tick % 20 {
            0 => Some(InputEvent::KeyDown(key)),
            5 => {
                let x = ((tick as f32 * 0.05).sin() * 0.5 + 0.5) * canvas.x;
                Some(InputEvent::PointerMove(Vec2::new(x, canvas.y * 0.9)))
            }
            10 => Some(InputEvent::Click(Vec2::new(
                sweep(tick, 37, canvas.x),
                sweep(tick, 53, canvas.y),
            ))),
            15 => Some(InputEvent::KeyUp(key)),
            _ => None,
        }
    }

    /// `tick * stride` wrapped into `0..extent`, in u64 so long runs cannot overflow
    fn sweep(tick: u32, stride: u64, extent: f32) -> f32 {
        (tick as u64 * stride % (extent as u64).max(1)) as f32
    }

    pub fn run() -> Result<()> {
        let options = Options::parse()?;
        let store: Box<dyn Store> = match &options.store_dir {
            Some(dir) => Box::new(FileStore::open(dir)?),
            None => Box::new(MemoryStore::new()),
        };
        let mut manager = GameManager::new(store, options.seed);
        let mut list = DrawList::new(1.0, 1.0);

        for kind in GameKind::ALL {
            let handle = manager
                .load_game(kind.as_str())
                .with_context(|| format!("Failed to load {}", kind.as_str()))?;
            let canvas = manager
                .current()
                .map(|g| g.canvas_size())
                .unwrap_or(Vec2::new(800.0, 600.0));
            manager.handle_input(&InputEvent::KeyDown(Key::Enter));

            for tick in 0..options.ticks {
                if handle.is_cancelled() {
                    break;
                }
                if let Some(event) = scripted_input(tick, canvas) {
                    manager.handle_input(&event);
                }
                manager.tick();
                manager.render(&mut list);
            }

            if let Some(game) = manager.current() {
                log::info!(
                    "{}: {} with score {}",
                    kind.title(),
                    game.game_state().as_str(),
                    game.current_score()
                );
            }
            manager.close_game();
        }

        println!("{}", serde_json::to_string_pretty(&manager.get_game_stats())?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_clicks_stay_on_canvas_for_huge_tick_counts() {
            let canvas = Vec2::new(800.0, 600.0);
            for tick in [10, 81_000_010, u32::MAX - 5] {
                if let Some(InputEvent::Click(p)) = scripted_input(tick, canvas) {
                    assert!(p.x >= 0.0 && p.x < canvas.x);
                    assert!(p.y >= 0.0 && p.y < canvas.y);
                } else {
                    panic!("tick {tick} should click");
                }
            }
        }

        #[test]
        fn test_sweep_wraps() {
            assert_eq!(sweep(3, 37, 100.0), 11.0);
            assert_eq!(sweep(u32::MAX, 53, 600.0), (u32::MAX as u64 * 53 % 600) as f32);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Club Arcade (native) starting headless session...");

    if let Err(e) = headless::run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

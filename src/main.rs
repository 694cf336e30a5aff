//! Sand Sandbox entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_sandbox {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use sand_sandbox::pointer_to_cell;
    use sand_sandbox::renderer::RenderState;
    use sand_sandbox::settings::Settings;
    use sand_sandbox::sim::{FrameInput, Material, Simulation};

    /// Sandbox instance holding all state
    struct Sandbox {
        sim: Simulation,
        settings: Settings,
        render_state: Option<RenderState>,
        last_time: f64,
        input: FrameInput,
        /// Grid pixels per CSS pixel, per axis
        canvas_scale: (f32, f32),
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Sandbox {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                sim: Simulation::new(&settings, seed),
                settings,
                render_state: None,
                last_time: 0.0,
                input: FrameInput::default(),
                canvas_scale: (1.0, 1.0),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn set_canvas_size(&mut self, client_w: f32, client_h: f32) {
            let (world_w, world_h) = self.settings.window_size();
            if client_w > 0.0 && client_h > 0.0 {
                self.canvas_scale = (world_w as f32 / client_w, world_h as f32 / client_h);
            }
        }

        /// Record the pointer from canvas-relative CSS pixels
        fn set_pointer(&mut self, x: f32, y: f32) {
            let pos = Vec2::new(x * self.canvas_scale.0, y * self.canvas_scale.1);
            self.input.pointer = Some(pointer_to_cell(pos, self.settings.cell_size));
        }

        /// Paint, then run at most one physics tick
        fn update(&mut self, dt: f32, time: f64) {
            self.sim.frame(dt, &self.input);

            // Clear one-shot inputs after processing
            self.input.select = None;
            self.input.clear = false;

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.sim.grid) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM (each one optional)
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            if let Some(el) = document.query_selector("#hud-material .hud-value").ok().flatten() {
                el.set_text_content(Some(self.sim.selected.name()));
            }

            if let Some(el) = document.query_selector("#hud-ticks .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.sim.ticks.to_string()));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sand Sandbox starting...");

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

        let settings = Settings::load();

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = ((client_w as f64 * dpr) as u32).max(1);
        let height = ((client_h as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let cell_size = settings.cell_size as f32;
        let sandbox = Rc::new(RefCell::new(Sandbox::new(settings, seed)));
        sandbox
            .borrow_mut()
            .set_canvas_size(client_w as f32, client_h as f32);

        log::info!("Sandbox initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, cell_size).await;
        sandbox.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, &canvas, sandbox.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(sandbox);

        log::info!("Sand Sandbox running!");
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        sandbox: Rc<RefCell<Sandbox>>,
    ) {
        // Mouse move - track the cell under the pointer
        {
            let sandbox = sandbox.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = sandbox.borrow_mut();
                let w = canvas_clone.client_width() as f32;
                let h = canvas_clone.client_height() as f32;
                s.set_canvas_size(w, h);
                s.set_pointer(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - left paints the selection, right paints the secondary material
        {
            let sandbox = sandbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = sandbox.borrow_mut();
                s.set_pointer(event.offset_x() as f32, event.offset_y() as f32);
                match event.button() {
                    0 => s.input.paint_primary = true,
                    2 => s.input.paint_secondary = true,
                    _ => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up anywhere releases the button
        {
            let sandbox = sandbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = sandbox.borrow_mut();
                match event.button() {
                    0 => s.input.paint_primary = false,
                    2 => s.input.paint_secondary = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Right click paints, so keep the context menu away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start/move paint the selected material
        for name in ["touchstart", "touchmove"] {
            let sandbox = sandbox.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut s = sandbox.borrow_mut();
                    let w = canvas_clone.client_width() as f32;
                    let h = canvas_clone.client_height() as f32;
                    s.set_canvas_size(w, h);
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    s.set_pointer(x, y);
                    s.input.paint_primary = true;
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let sandbox = sandbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    sandbox.borrow_mut().input.paint_primary = false;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let sandbox = sandbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut s = sandbox.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    "c" | "C" => s.input.clear = true,
                    _ => {
                        let mut chars = key.chars();
                        if let (Some(c), None) = (chars.next(), chars.next()) {
                            if let Some(material) = Material::from_digit(c) {
                                s.input.select = Some(material);
                                if s.settings.initial_material != material {
                                    s.settings.initial_material = material;
                                    s.settings.save();
                                }
                            }
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Losing focus drops held buttons
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut s = sandbox.borrow_mut();
                s.input.paint_primary = false;
                s.input.paint_secondary = false;
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(sandbox: Rc<RefCell<Sandbox>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(sandbox, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(sandbox: Rc<RefCell<Sandbox>>, time: f64) {
        {
            let mut s = sandbox.borrow_mut();

            // Calculate delta time
            let dt = if s.last_time > 0.0 {
                ((time - s.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            s.last_time = time;

            s.update(dt, time);
            s.render();
            s.update_hud();
        }

        request_animation_frame(sandbox);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_sandbox::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sand Sandbox (native) starting...");
    log::info!("Native mode runs a headless pour - run with `trunk serve` for the interactive version");

    let settings = sand_sandbox::Settings::load();
    // Leave a file behind for the user to edit
    if !std::path::Path::new(sand_sandbox::Settings::FILE_NAME).exists() {
        settings.save();
    }
    headless::run(&settings);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::IVec2;
    use sand_sandbox::consts::TARGET_FPS;
    use sand_sandbox::settings::Settings;
    use sand_sandbox::sim::{FrameInput, Material, Simulation};

    /// Frames to simulate (10 seconds at the target rate)
    const FRAMES: u32 = 10 * TARGET_FPS;
    /// Frames during which the brushes pour
    const POUR_FRAMES: u32 = 2 * TARGET_FPS;

    /// Pour sand and water onto a stone ledge, then print the settled grid
    pub fn run(settings: &Settings) {
        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        log::info!("Seed: {}", seed);

        let mut sim = Simulation::new(settings, seed);
        let w = sim.grid.width();
        let h = sim.grid.height();

        // Stone ledge across the left half, two thirds down
        let ledge_y = h * 2 / 3;
        for x in (w / 8..w / 2).step_by(sim.brush_size.max(1) as usize) {
            sim.paint_at(IVec2::new(x, ledge_y), Material::Stone);
        }

        let sand_at = IVec2::new(w / 3, h / 8);
        let water_at = IVec2::new(w * 2 / 3, h / 8);
        let dt = 1.0 / TARGET_FPS as f32;

        for frame in 0..FRAMES {
            let pouring = frame < POUR_FRAMES;
            // Alternate the two brushes so each keeps its own spot
            let input = FrameInput {
                pointer: Some(if frame % 2 == 0 { sand_at } else { water_at }),
                paint_primary: pouring && frame % 2 == 0,
                paint_secondary: pouring && frame % 2 == 1,
                ..Default::default()
            };
            sim.frame(dt, &input);
        }

        print!("{}", sim.grid);
        log::info!(
            "{} frames, {} ticks: sand={} water={} stone={}",
            FRAMES,
            sim.ticks,
            sim.grid.count(Material::Sand),
            sim.grid.count(Material::Water),
            sim.grid.count(Material::Stone)
        );
    }
}

//! Ball Pit entry point
//!
//! Wires the simulation to the DOM: spawns ball divs, routes pointer events
//! into the world and drives the frame loop with requestAnimationFrame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent, TouchEvent};

    use ball_pit::settings::Tuning;
    use ball_pit::sim::{Ball, Bounds, LoopPhase, World, advance};

    /// Absolutely-positioned div standing in for one ball.
    ///
    /// Created once at spawn; afterwards only its transform changes.
    struct BallView {
        el: HtmlElement,
    }

    impl BallView {
        fn create(document: &Document, container: &Element, ball: &Ball) -> Result<Self, JsValue> {
            let el: HtmlElement = document.create_element("div")?.dyn_into()?;
            el.set_class_name("ball");
            el.set_attribute("data-ball", &ball.id.to_string())?;

            let diameter = format!("{}px", ball.radius * 2.0);
            let style = el.style();
            style.set_property("width", &diameter)?;
            style.set_property("height", &diameter)?;
            style.set_property("background-color", &ball.color_css())?;

            container.append_child(&el)?;
            let view = Self { el };
            view.set_position(ball.pos);
            Ok(view)
        }

        /// Move the div to the ball's top-left anchor.
        fn set_position(&self, pos: Vec2) {
            let _ = self
                .el
                .style()
                .set_property("transform", &format!("translate({}px, {}px)", pos.x, pos.y));
        }
    }

    /// App instance holding the world and its DOM mirror
    struct App {
        world: World,
        /// One view per ball, in the same insertion order as `world.balls`.
        views: Vec<BallView>,
        document: Document,
        container: Element,
        footer: Option<Element>,
        /// Pending requestAnimationFrame handle, if a frame is scheduled
        raf_id: Option<i32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(world: World, document: Document, container: Element, footer: Option<Element>) -> Self {
            Self {
                world,
                views: Vec::new(),
                document,
                container,
                footer,
                raf_id: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Read the clamp bounds from the live layout.
        ///
        /// Queried every frame so window resizes and footer reflows take
        /// effect immediately.
        fn bounds(&self) -> Bounds {
            let window = web_sys::window().unwrap();
            let vw = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
            let vh = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
            let footer_h = self.footer.as_ref().map_or(0.0, |f| f.client_height() as f32);
            Bounds::from_viewport(
                Vec2::new(vw, vh),
                footer_h,
                self.world.tuning.floor_clearance,
            )
        }

        /// Spawn a ball centered on the pointer and mirror it into the DOM.
        fn spawn_at(&mut self, pointer: Vec2) {
            if self.world.spawn_at_pointer(pointer).is_none() {
                // At capacity; the press does nothing.
                return;
            }
            let ball = self.world.balls[self.world.ball_count() - 1];
            match BallView::create(&self.document, &self.container, &ball) {
                Ok(view) => self.views.push(view),
                Err(e) => log::error!("Failed to create ball element: {:?}", e),
            }
        }

        /// Follow the pointer with the dragged ball, updating its view
        /// directly since no frame runs during a drag.
        fn drag_to(&mut self, pointer: Vec2) {
            let Some(idx) = self.world.dragged_index() else {
                return;
            };
            if let Some(anchor) = self.world.drag_to(pointer) {
                if let Some(view) = self.views.get(idx) {
                    view.set_position(anchor);
                }
            }
        }

        /// Run one simulation frame and push the results into the DOM.
        fn frame(&mut self, time: f64) {
            let bounds = self.bounds();
            advance(&mut self.world, &bounds);
            self.sync_views();
            self.track_fps(time);
            self.update_hud();
        }

        fn sync_views(&self) {
            for (ball, view) in self.world.balls.iter().zip(&self.views) {
                view.set_position(ball.pos);
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_idx = self.frame_index;
            let oldest_time = self.frame_times[oldest_idx];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            // Update ball count
            if let Some(el) = self
                .document
                .query_selector("#hud-count .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.world.ball_count().to_string()));
            }

            // Update FPS (hidden when disabled in tuning)
            if let Some(el) = self.document.get_element_by_id("hud-fps") {
                if self.world.tuning.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = self
                        .document
                        .query_selector("#hud-fps .hud-value")
                        .ok()
                        .flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    /// Extract the ball id from a press landing on a ball div, walking up
    /// from the event target.
    fn pressed_ball_id(target: Option<web_sys::EventTarget>) -> Option<u32> {
        target
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("[data-ball]").ok().flatten())
            .and_then(|el| el.get_attribute("data-ball"))
            .and_then(|id| id.parse().ok())
    }

    /// Pointer position in container coordinates.
    fn pointer_from(container: &Element, client_x: i32, client_y: i32) -> Vec2 {
        let rect = container.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    /// Route a press: grab the ball under the pointer, or spawn a new one.
    fn handle_press(app: &Rc<RefCell<App>>, pressed: Option<u32>, pointer: Vec2) {
        match pressed {
            Some(id) => {
                let grabbed = app.borrow_mut().world.begin_drag(id, pointer);
                if grabbed {
                    cancel_frame(app);
                }
            }
            None => {
                app.borrow_mut().spawn_at(pointer);
                ensure_running(app);
            }
        }
    }

    fn setup_input_handlers(container: &Element, app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Mouse press - grab or spawn
        {
            let app = app.clone();
            let container_clone = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let pointer = pointer_from(&container_clone, event.client_x(), event.client_y());
                handle_press(&app, pressed_ball_id(event.target()), pointer);
            });
            let _ = container
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - follow the pointer while dragging
        {
            let app = app.clone();
            let container_clone = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.world.dragged_id().is_none() {
                    return;
                }
                let pointer = pointer_from(&container_clone, event.client_x(), event.client_y());
                a.drag_to(pointer);
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release ends the drag wherever the pointer is
        on_release(&document, "mouseup", app.clone());

        // Touch press
        {
            let app = app.clone();
            let container_clone = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pointer =
                        pointer_from(&container_clone, touch.client_x(), touch.client_y());
                    handle_press(&app, pressed_ball_id(event.target()), pointer);
                }
            });
            let _ = container
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let container_clone = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    if a.world.dragged_id().is_none() {
                        return;
                    }
                    let pointer =
                        pointer_from(&container_clone, touch.client_x(), touch.client_y());
                    a.drag_to(pointer);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        on_release(&document, "touchend", app.clone());
        on_release(&document, "touchcancel", app);
    }

    /// Register a drag-release handler; resumes the loop if a drag ended.
    fn on_release(document: &Document, event_name: &str, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let released = app.borrow_mut().world.end_drag();
            if released.is_some() {
                ensure_running(&app);
            }
        });
        let _ = document.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule the next frame if the loop should run and none is pending.
    fn ensure_running(app: &Rc<RefCell<App>>) {
        let should_schedule = {
            let a = app.borrow();
            a.world.phase == LoopPhase::Running && a.raf_id.is_none()
        };
        if should_schedule {
            schedule_frame(app.clone());
        }
    }

    /// Cancel the pending frame, if any.
    fn cancel_frame(app: &Rc<RefCell<App>>) {
        let id = app.borrow_mut().raf_id.take();
        if let Some(id) = id {
            let window = web_sys::window().unwrap();
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn schedule_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let app_for_frame = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app_for_frame, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => app.borrow_mut().raf_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_running = {
            let mut a = app.borrow_mut();
            a.raf_id = None;
            if a.world.phase == LoopPhase::Running {
                a.frame(time);
            }
            a.world.phase == LoopPhase::Running
        };
        if keep_running {
            schedule_frame(app);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ball Pit starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let container = document.get_element_by_id("pit").expect("no #pit container");
        let footer = document.query_selector("footer").ok().flatten();

        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let app = Rc::new(RefCell::new(App::new(
            World::new(seed, tuning),
            document,
            container.clone(),
            footer,
        )));

        log::info!("World initialized with seed: {}", seed);

        setup_input_handlers(&container, app.clone());
        app.borrow().update_hud();

        // No frame is scheduled yet; the loop starts on the first spawn.
        log::info!("Ball Pit ready - click to drop a ball");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Pit (native) starting...");
    log::info!("The playground is web-only - run with `trunk serve` for the interactive version");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drop a few balls into a fixed-size pit and print where they end up.
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use ball_pit::settings::Tuning;
    use ball_pit::sim::{Bounds, World, advance};
    use glam::Vec2;

    let tuning = Tuning::load();
    let floor_clearance = tuning.floor_clearance;
    let mut world = World::new(42, tuning);
    let bounds = Bounds::from_viewport(Vec2::new(1280.0, 720.0), 40.0, floor_clearance);

    world.spawn_at_pointer(Vec2::new(320.0, 180.0));
    world.spawn_at_pointer(Vec2::new(640.0, 120.0));
    world.spawn_at_pointer(Vec2::new(960.0, 240.0));

    println!("\nDropping {} balls into a 1280x720 pit...", world.ball_count());
    for frame in 1..=240 {
        advance(&mut world, &bounds);
        if frame % 60 == 0 {
            for ball in &world.balls {
                println!(
                    "  frame {:3} ball {}: pos=({:7.2}, {:7.2}) vel=({:5.2}, {:5.2})",
                    frame, ball.id, ball.pos.x, ball.pos.y, ball.vel.x, ball.vel.y
                );
            }
        }
    }
    println!("Done.");
}

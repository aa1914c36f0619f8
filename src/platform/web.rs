//! Browser host
//!
//! `InkBackground` is the JS-facing handle. While mounted it owns three
//! browser callbacks (animation frame, spawn interval, window resize), each
//! held in a guard whose `Drop` cancels it. Callbacks only hold weak
//! references to the host, so dropping the guards is enough to stop them.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::HostClock;
use crate::config::InkConfig;
use crate::engine::{Engine, FrameSink};
use crate::error::MountError;
use crate::renderer::{InkRenderState, Viewport};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (page re-import) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

/// `performance.now()`, falling back to wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceClock;

impl HostClock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

// ============================================================================
// CALLBACK GUARDS
// ============================================================================

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop
struct AnimationFrame {
    window: Window,
    handle: Rc<Cell<i32>>,
    slot: FrameSlot,
}

impl AnimationFrame {
    fn start(window: &Window, host: Weak<RefCell<Host>>) -> Result<Self, JsValue> {
        let handle = Rc::new(Cell::new(0));
        let slot: FrameSlot = Rc::new(RefCell::new(None));

        let weak_slot = Rc::downgrade(&slot);
        let next_handle = handle.clone();
        let win = window.clone();
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(host) = host.upgrade() else {
                return;
            };
            host.borrow_mut().engine.frame(time);

            if let Some(slot) = weak_slot.upgrade()
                && let Some(cb) = slot.borrow().as_ref()
                && let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref())
            {
                next_handle.set(id);
            }
        });

        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        handle.set(id);
        *slot.borrow_mut() = Some(closure);

        Ok(Self {
            window: window.clone(),
            handle,
            slot,
        })
    }
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        let _ = self.window.cancel_animation_frame(self.handle.get());
        self.slot.borrow_mut().take();
    }
}

/// `setInterval` spawn timer
struct Interval {
    window: Window,
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    fn start(window: &Window, interval_ms: i32, host: Weak<RefCell<Host>>) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(host) = host.upgrade() {
                host.borrow_mut().engine.spawn(PerformanceClock.now_ms());
            }
        });
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms,
        )?;
        Ok(Self {
            window: window.clone(),
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.handle);
    }
}

/// Window `resize` listener
struct ResizeListener {
    window: Window,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl ResizeListener {
    fn start(window: &Window, host: Weak<RefCell<Host>>) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(host) = host.upgrade() {
                host.borrow_mut().fit_canvas();
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        Ok(Self {
            window: window.clone(),
            closure,
        })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref());
    }
}

struct Callbacks {
    _frame: AnimationFrame,
    _spawn: Interval,
    _resize: ResizeListener,
}

// ============================================================================
// HOST
// ============================================================================

struct Host {
    engine: Engine<InkRenderState>,
    canvas: Option<HtmlCanvasElement>,
    callbacks: Option<Callbacks>,
    /// Bumped by every mount/unmount; a pending mount that sees a different
    /// value after its awaits is stale and discards its surface
    generation: u64,
}

impl Host {
    /// Backing size for the canvas at the current device pixel ratio
    fn canvas_viewport(&self, window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
        Viewport::from_css(
            f64::from(canvas.client_width()),
            f64::from(canvas.client_height()),
            window.device_pixel_ratio(),
            self.engine.config().max_pixel_ratio,
        )
    }

    fn fit_canvas(&mut self) {
        let (Some(window), Some(canvas)) = (web_sys::window(), self.canvas.as_ref()) else {
            return;
        };
        let mut vp = self.canvas_viewport(&window, canvas);
        if let Some(sink) = self.engine.sink() {
            vp = vp.fit_within(sink.max_dimension());
        }
        if canvas.width() != vp.width || canvas.height() != vp.height {
            canvas.set_width(vp.width);
            canvas.set_height(vp.height);
        }
        self.engine.resize(vp.width, vp.height);
    }

    fn stop(&mut self) {
        self.generation += 1;
        // Cancel callbacks before the surface goes away
        self.callbacks = None;
        self.canvas = None;
        self.engine.unmount();
    }
}

/// Let the page's layout decide the canvas size
///
/// Without a CSS size an unstyled canvas reports its own backing size as its
/// client size, and every fit would grow it by the pixel ratio again.
fn fill_parent(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let style = canvas.style();
    style.set_property("display", "block")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    Ok(())
}

async fn create_render_state(canvas: &HtmlCanvasElement, viewport: Viewport) -> Result<InkRenderState, MountError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });

    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await?;

    log::info!("Using adapter: {:?}", adapter.get_info().name);

    InkRenderState::new(surface, &adapter, viewport.width, viewport.height).await
}

async fn mount_into(host: Rc<RefCell<Host>>, canvas: HtmlCanvasElement) -> Result<(), MountError> {
    let window = web_sys::window().ok_or(MountError::NoWindow)?;

    let (generation, viewport) = {
        let mut h = host.borrow_mut();
        if h.engine.is_running() || h.canvas.is_some() {
            log::warn!("Ink background already mounted");
            return Ok(());
        }
        if let Err(e) = fill_parent(&canvas) {
            log::warn!("Failed to style canvas: {:?}", e);
        }
        h.generation += 1;
        h.canvas = Some(canvas.clone());
        (h.generation, h.canvas_viewport(&window, &canvas))
    };

    let render_state = create_render_state(&canvas, viewport).await;

    let mut h = host.borrow_mut();
    if h.generation != generation {
        log::info!("Mount superseded, discarding surface");
        return Ok(());
    }
    let render_state = match render_state {
        Ok(state) => state,
        Err(e) => {
            h.canvas = None;
            return Err(e);
        }
    };

    // The device may not accept the full backing size
    let (width, height) = render_state.size();
    canvas.set_width(width);
    canvas.set_height(height);

    let interval_ms = (h.engine.config().spawn_interval * 1000.0).round() as i32;
    h.engine.mount(render_state, PerformanceClock.now_ms());

    let weak = Rc::downgrade(&host);
    let callbacks = AnimationFrame::start(&window, weak.clone()).and_then(|frame| {
        Ok(Callbacks {
            _frame: frame,
            _spawn: Interval::start(&window, interval_ms, weak.clone())?,
            _resize: ResizeListener::start(&window, weak)?,
        })
    });
    match callbacks {
        Ok(callbacks) => h.callbacks = Some(callbacks),
        Err(e) => {
            log::warn!("Failed to install browser callbacks: {:?}", e);
            h.stop();
        }
    }
    Ok(())
}

/// Animated ink background bound to a canvas
#[wasm_bindgen]
pub struct InkBackground {
    host: Rc<RefCell<Host>>,
}

#[wasm_bindgen]
impl InkBackground {
    /// Default tuning. `seed` is truncated to an integer.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> InkBackground {
        Self::from_config(InkConfig::default(), seed)
    }

    /// Tuning from a JSON object; missing fields keep their defaults
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(seed: f64, json: &str) -> Result<InkBackground, JsError> {
        let config = InkConfig::from_json(json)?;
        Ok(Self::from_config(config, seed))
    }

    /// Start animating on `canvas`
    ///
    /// The canvas is styled to fill its parent (`display: block`, 100% width
    /// and height) and its backing store follows that CSS box times the
    /// capped device pixel ratio, scaled down if the GPU limits require it.
    /// Resolves once the GPU surface is ready. If no surface can be created
    /// the failure is logged and the background stays idle.
    pub fn mount(&self, canvas: HtmlCanvasElement) -> js_sys::Promise {
        let host = self.host.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            if let Err(e) = mount_into(host, canvas).await {
                log::warn!("Ink background unavailable: {e}");
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Stop animating and release the surface
    pub fn unmount(&self) {
        self.host.borrow_mut().stop();
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.host.borrow().engine.is_running()
    }
}

impl InkBackground {
    fn from_config(config: InkConfig, seed: f64) -> Self {
        let seed = seed.max(0.0) as u64;
        log::info!("Ink background created with seed: {}", seed);
        Self {
            host: Rc::new(RefCell::new(Host {
                engine: Engine::new(config, seed),
                canvas: None,
                callbacks: None,
                generation: 0,
            })),
        }
    }
}

impl Drop for InkBackground {
    fn drop(&mut self) {
        if let Ok(mut host) = self.host.try_borrow_mut() {
            host.stop();
        }
    }
}

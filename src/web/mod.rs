// web/ - Browser host binding
//
// `AquaBackground` is the object the page constructs. It owns the engine
// behind `Rc<RefCell<..>>` so the animation-frame and resize callbacks can
// reach it; both callbacks hold only weak references, so dropping the
// handle tears everything down.

mod canvas;

pub use canvas::CanvasSurface;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::rngs::SmallRng;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use crate::config::ConfigOverride;
use crate::driver::FrameScheduler;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::random;
use crate::render::Surface;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type WebEngine = Engine<CanvasSurface, SmallRng, AnimationFrameScheduler>;

/// Schedules frames with `requestAnimationFrame`.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request(&mut self) -> Result<u32, EngineError> {
        let slot = self.callback.borrow();
        let cb = slot
            .as_ref()
            .ok_or_else(|| EngineError::Schedule("frame callback detached".into()))?;
        let id = self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|err| EngineError::Schedule(format!("{err:?}")))?;
        Ok(id as u32)
    }

    fn cancel(&mut self, handle: u32) {
        if let Err(err) = self.window.cancel_animation_frame(handle as i32) {
            warn!(?err, handle, "cancel_animation_frame failed");
        }
    }
}

fn to_js(err: EngineError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn report(err: &EngineError) {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
}

/// Current viewport size in CSS pixels.
fn viewport(window: &Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32;
    (dim(window.inner_width()), dim(window.inner_height()))
}

#[wasm_bindgen]
pub struct AquaBackground {
    engine: Rc<RefCell<WebEngine>>,
    window: Window,
    frame: FrameCallback,
    resize: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl AquaBackground {
    /// Fit `canvas` to the window, merge `config_json` (a JSON object of
    /// overrides) over the defaults and populate the scene. Call `start` to
    /// animate.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<AquaBackground, JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let overrides = match config_json.as_deref() {
            Some(json) => ConfigOverride::from_json(json).map_err(to_js)?,
            None => ConfigOverride::default(),
        };

        let mut surface = CanvasSurface::new(canvas).map_err(to_js)?;
        let (w, h) = viewport(&window);
        surface.resize(w, h).map_err(to_js)?;

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrameScheduler { window: window.clone(), callback: frame.clone() };
        let engine = Rc::new(RefCell::new(Engine::create(surface, overrides, random::ambient(), scheduler)));

        *frame.borrow_mut() = Some(frame_closure(Rc::downgrade(&engine)));

        let resize = resize_closure(Rc::downgrade(&engine), window.clone());
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;

        Ok(Self { engine, window, frame, resize })
    }

    /// Begin animating. Calling it again while running does nothing.
    pub fn start(&self) -> Result<(), JsValue> {
        self.engine.borrow_mut().start().map_err(to_js)
    }

    /// Stop animating after the current frame. Idempotent.
    pub fn stop(&self) {
        self.engine.borrow_mut().stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.engine.borrow().is_running()
    }

    pub fn width(&self) -> u32 {
        self.engine.borrow().surface().size().0
    }

    pub fn height(&self) -> u32 {
        self.engine.borrow().surface().size().1
    }
}

impl Drop for AquaBackground {
    fn drop(&mut self) {
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            engine.stop();
        }
        let listener = self.resize.as_ref().unchecked_ref();
        if let Err(err) = self.window.remove_event_listener_with_callback("resize", listener) {
            warn!(?err, "failed to detach resize listener");
        }
        self.frame.borrow_mut().take();
    }
}

fn frame_closure(engine: Weak<RefCell<WebEngine>>) -> Closure<dyn FnMut(f64)> {
    Closure::wrap(Box::new(move |timestamp: f64| {
        let Some(engine) = engine.upgrade() else {
            return;
        };
        let Ok(mut engine) = engine.try_borrow_mut() else {
            return;
        };
        if let Err(err) = engine.frame(timestamp) {
            report(&err);
        }
    }) as Box<dyn FnMut(f64)>)
}

fn resize_closure(engine: Weak<RefCell<WebEngine>>, window: Window) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let Some(engine) = engine.upgrade() else {
            return;
        };
        let (w, h) = viewport(&window);
        let Ok(mut engine) = engine.try_borrow_mut() else {
            return;
        };
        if let Err(err) = engine.resize(w, h) {
            report(&err);
        }
    }) as Box<dyn FnMut()>)
}

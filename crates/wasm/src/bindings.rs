//! `#[wasm_bindgen]` exports: the `start()` entry point and its handle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use particle_field_core::{Backdrop, Xorshift64};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::{parse_config, to_js, CanvasSurface, FrameSlot, Shared, WindowViewport, DEFAULT_CANVAS_ID};

/// Handle to a running backdrop. Dropping it does not stop the animation;
/// call [`FieldHandle::stop`].
#[wasm_bindgen]
pub struct FieldHandle {
    backdrop: Shared,
    frame: FrameSlot,
    scheduled: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl FieldHandle {
    /// Stops after the current frame.
    pub fn stop(&self) {
        self.backdrop.borrow_mut().stop();
    }

    /// Resumes a stopped backdrop.
    pub fn start(&self) -> Result<bool, JsValue> {
        if !self.backdrop.borrow_mut().start() {
            return Ok(false);
        }
        if !self.scheduled.get() {
            schedule(&self.frame, &self.scheduled)?;
        }
        Ok(true)
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.backdrop.borrow().is_running()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.backdrop.borrow().field().len()
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn schedule(frame: &FrameSlot, scheduled: &Cell<bool>) -> Result<(), JsValue> {
    if let Some(callback) = frame.borrow().as_ref() {
        window()?.request_animation_frame(callback.as_ref().unchecked_ref())?;
        scheduled.set(true);
    }
    Ok(())
}

/// Starts the backdrop on the canvas with id `canvas_id` (default
/// `particles-canvas`), applying optional JSON overrides.
///
/// Returns `Ok(None)` when the page has no such canvas or it has no 2D
/// context.
#[wasm_bindgen]
pub fn start(canvas_id: Option<String>, params: Option<String>) -> Result<Option<FieldHandle>, JsValue> {
    console_error_panic_hook::set_once();

    let config = parse_config(params.as_deref()).map_err(to_js)?;
    let window = window()?;
    let id = canvas_id.as_deref().unwrap_or(DEFAULT_CANVAS_ID);
    let canvas = window
        .document()
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
    let surface = match canvas {
        Some(canvas) => CanvasSurface::from_canvas(canvas)?,
        None => None,
    };
    let seed = Xorshift64::from_unit(js_sys::Math::random()).next_u64();
    let Some(backdrop) = Backdrop::attach(surface, &WindowViewport(&window), config, seed) else {
        return Ok(None);
    };
    let backdrop: Shared = Rc::new(RefCell::new(backdrop));

    let on_resize = {
        let backdrop = backdrop.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(window) = web_sys::window() {
                backdrop.borrow_mut().resize(&WindowViewport(&window));
            }
        })
    };
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    let frame: FrameSlot = Rc::new(RefCell::new(None));
    let scheduled = Rc::new(Cell::new(false));
    {
        let backdrop = backdrop.clone();
        let next = frame.clone();
        let flag = scheduled.clone();
        *frame.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            flag.set(false);
            if backdrop.borrow_mut().frame().is_none() {
                return;
            }
            if let Err(err) = schedule(&next, &flag) {
                tracing::warn!(?err, "could not schedule the next frame");
            }
        }));
    }
    schedule(&frame, &scheduled)?;

    Ok(Some(FieldHandle {
        backdrop,
        frame,
        scheduled,
    }))
}

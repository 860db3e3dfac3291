//! Browser binding for the particle-field backdrop.
//!
//! `start()` finds the canvas, sizes it to the window, rebuilds the field on
//! every `resize` event and drives it from `requestAnimationFrame`. A page
//! without the canvas gets `None` back and nothing else happens.
#![deny(unsafe_code)]

// `#[wasm_bindgen]` expands to unsafe glue.
#[allow(unsafe_code)]
mod bindings;
mod canvas;

use std::cell::RefCell;
use std::rc::Rc;

use particle_field_core::{Backdrop, Bounds, FieldConfig, FieldError, Viewport};
use wasm_bindgen::prelude::*;
use web_sys::Window;

pub use bindings::{start, FieldHandle};
pub use canvas::CanvasSurface;

/// Element id the site gives its backdrop canvas.
pub const DEFAULT_CANVAS_ID: &str = "particles-canvas";

type Shared = Rc<RefCell<Backdrop<CanvasSurface>>>;
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct WindowViewport<'a>(&'a Window);

impl Viewport for WindowViewport<'_> {
    fn viewport_size(&self) -> Bounds {
        let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Bounds::new(extent(self.0.inner_width()), extent(self.0.inner_height()))
    }
}

/// Parses the optional JSON override string handed in from JavaScript.
fn parse_config(params: Option<&str>) -> Result<FieldConfig, FieldError> {
    match params {
        None => Ok(FieldConfig::default()),
        Some(text) => {
            let value: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| FieldError::config("params", e.to_string()))?;
            FieldConfig::from_json(&value)
        }
    }
}

fn to_js(err: FieldError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

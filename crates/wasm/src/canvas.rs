//! [`Surface`] over a browser `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use glam::DVec2;
use particle_field_core::{Bounds, GradientStop, Rgb, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wraps `canvas`, or returns `Ok(None)` if it has no 2D context.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Option<Self>, JsValue> {
        let Some(ctx) = canvas.get_context("2d")? else {
            return Ok(None);
        };
        let ctx = ctx.dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Some(Self { canvas, ctx }))
    }

    /// Fills a circle with whatever fill style is current, at `alpha`.
    fn fill_disc(&self, center: DVec2, radius: f64, alpha: f64) -> Result<(), JsValue> {
        self.ctx.set_global_alpha(alpha);
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }

    fn draw_glow(&self, center: DVec2, radius: f64, stops: &[GradientStop], alpha: f64) -> Result<(), JsValue> {
        let gradient = self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)?;
        for stop in stops {
            gradient.add_color_stop(stop.offset as f32, &stop.color.css_rgba(stop.alpha))?;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.fill_disc(center, radius, alpha)
    }
}

/// Canvas calls only fail on invalid geometry; a failed draw skips that
/// shape and the frame carries on.
fn report(result: Result<(), JsValue>, what: &str) {
    if let Err(err) = result {
        tracing::warn!(?err, "canvas {what} failed");
    }
}

impl Surface for CanvasSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.canvas.set_width(bounds.width as u32);
        self.canvas.set_height(bounds.height as u32);
    }

    fn clear(&mut self) {
        let b = self.bounds();
        self.ctx.clear_rect(0.0, 0.0, b.width, b.height);
    }

    fn fill_glow(&mut self, center: DVec2, radius: f64, stops: &[GradientStop], alpha: f64) {
        self.ctx.save();
        report(self.draw_glow(center, radius, stops, alpha), "glow");
        self.ctx.restore();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgb, alpha: f64) {
        self.ctx.save();
        self.ctx.set_fill_style_str(&color.to_hex());
        report(self.fill_disc(center, radius, alpha), "circle");
        self.ctx.restore();
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgb, width: f64, alpha: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha);
        self.ctx.set_stroke_style_str(&color.to_hex());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        self.ctx.restore();
    }
}

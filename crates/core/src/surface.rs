//! Drawing-surface abstraction and the surface manager that sizes it.
//!
//! A [`Surface`] is the handful of 2D-canvas operations the particle field
//! needs: clear, radial glow, filled circle and stroked line, each with a
//! per-call global alpha. The browser binding implements it over a
//! `CanvasRenderingContext2d`, the raster crate over an RGBA buffer, and
//! [`crate::record::RecordingSurface`] by logging draw calls.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Drawable width and height of a surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Builds bounds, mapping negative, NaN or infinite extents to zero.
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64| if v > 0.0 && v.is_finite() { v } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One color stop of a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the radius, 0 at the center and 1 at the rim.
    pub offset: f64,
    pub color: Rgb,
    pub alpha: f64,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Rgb, alpha: f64) -> Self {
        Self {
            offset,
            color,
            alpha,
        }
    }
}

/// The 2D drawing operations the particle field issues each frame.
///
/// Every drawing call carries its own `alpha`, applied on top of the color's
/// own alpha exactly like a canvas `globalAlpha` set for that call.
pub trait Surface {
    /// Current drawable size.
    fn bounds(&self) -> Bounds;

    /// Resizes the drawable area. Contents after a resize are unspecified.
    fn set_bounds(&mut self, bounds: Bounds);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Fills a disc with a radial gradient running through `stops`.
    fn fill_glow(&mut self, center: DVec2, radius: f64, stops: &[GradientStop], alpha: f64);

    /// Fills a solid disc.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgb, alpha: f64);

    /// Strokes a straight line segment.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgb, width: f64, alpha: f64);
}

/// Read-only source of the host's current viewport size.
pub trait Viewport {
    fn viewport_size(&self) -> Bounds;
}

impl Viewport for Bounds {
    fn viewport_size(&self) -> Bounds {
        *self
    }
}

/// Owns the drawing surface and keeps it the size of the viewport.
#[derive(Debug)]
pub struct SurfaceManager<S> {
    surface: S,
}

impl<S: Surface> SurfaceManager<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Matches the surface to the viewport and returns the surface's new
    /// bounds.
    ///
    /// Called once at startup and on every viewport resize. Surfaces may
    /// round or clamp the requested size, so the result is read back from the
    /// surface. Any field drawing into this surface must be rebuilt against
    /// the returned bounds.
    pub fn resize(&mut self, viewport: &dyn Viewport) -> Bounds {
        let requested = viewport.viewport_size();
        self.surface.set_bounds(requested);
        let bounds = self.surface.bounds();
        tracing::debug!(width = bounds.width, height = bounds.height, "surface resized");
        bounds
    }

    pub fn bounds(&self) -> Bounds {
        self.surface.bounds()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

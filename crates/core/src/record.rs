//! A [`Surface`] that records draw calls instead of producing pixels.
//!
//! Used to drive the field deterministically in tests and to count what a
//! frame would draw without rasterizing it.

use glam::DVec2;

use crate::color::Rgb;
use crate::surface::{Bounds, GradientStop, Surface};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Glow {
        center: DVec2,
        radius: f64,
        stops: Vec<GradientStop>,
        alpha: f64,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgb,
        alpha: f64,
    },
    Line {
        from: DVec2,
        to: DVec2,
        color: Rgb,
        width: f64,
        alpha: f64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    bounds: Bounds,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            calls: Vec::new(),
        }
    }

    /// Every call recorded since the last [`RecordingSurface::take`].
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drains the recorded calls.
    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Recorded calls since the most recent `Clear`, i.e. the last frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear))
            .map_or(0, |i| i + 1);
        &self.calls[start..]
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> + '_ {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
    }
}

impl Surface for RecordingSurface {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_glow(&mut self, center: DVec2, radius: f64, stops: &[GradientStop], alpha: f64) {
        self.calls.push(DrawCall::Glow {
            center,
            radius,
            stops: stops.to_vec(),
            alpha,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgb, alpha: f64) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgb, width: f64, alpha: f64) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            color,
            width,
            alpha,
        });
    }
}

//! Wires a surface manager and a particle field into one decorative backdrop.
//!
//! Hosts forward three events: startup, viewport resize and animation frame.
//! Everything else (sizing the surface, rebuilding particles, honoring the
//! run state) happens here so every host behaves the same.

use tracing::debug;

use crate::config::FieldConfig;
use crate::field::{ParticleField, TickStats};
use crate::surface::{Bounds, Surface, SurfaceManager, Viewport};

#[derive(Debug)]
pub struct Backdrop<S> {
    manager: SurfaceManager<S>,
    field: ParticleField,
}

impl<S: Surface> Backdrop<S> {
    /// Attaches to `surface` and builds the field for the current viewport.
    pub fn new(surface: S, viewport: &dyn Viewport, config: FieldConfig, seed: u64) -> Self {
        let mut backdrop = Self {
            manager: SurfaceManager::new(surface),
            field: ParticleField::new(config, seed),
        };
        backdrop.resize(viewport);
        backdrop
    }

    /// Like [`Backdrop::new`], but a missing surface yields `None` instead of
    /// a backdrop. The page keeps working without the decoration.
    pub fn attach(
        surface: Option<S>,
        viewport: &dyn Viewport,
        config: FieldConfig,
        seed: u64,
    ) -> Option<Self> {
        match surface {
            Some(surface) => Some(Self::new(surface, viewport, config, seed)),
            None => {
                debug!("no drawing surface; particle backdrop disabled");
                None
            }
        }
    }

    /// Resizes the surface to the viewport and rebuilds the particles for the
    /// size the surface actually took.
    pub fn resize(&mut self, viewport: &dyn Viewport) -> Bounds {
        let bounds = self.manager.resize(viewport);
        self.field.rebuild(bounds);
        bounds
    }

    /// Draws one frame if the field is running.
    ///
    /// Returns `None` when stopped; hosts should not schedule another frame.
    pub fn frame(&mut self) -> Option<TickStats> {
        if !self.field.is_running() {
            return None;
        }
        Some(self.field.tick(self.manager.surface_mut()))
    }

    pub fn start(&mut self) -> bool {
        self.field.start()
    }

    pub fn stop(&mut self) {
        self.field.stop();
    }

    pub fn is_running(&self) -> bool {
        self.field.is_running()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        self.manager.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.manager.surface_mut()
    }
}

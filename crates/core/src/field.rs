//! The field coordinator: owns the live particles and runs the per-frame
//! advance, draw and connect cycle.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::FieldConfig;
use crate::particle::{self, Particle};
use crate::prng::Xorshift64;
use crate::surface::{Bounds, Surface};

/// Run state of a [`ParticleField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No rebuild has happened yet; there is nothing to animate.
    Uninitialized,
    Running,
    Stopped,
}

/// What a single tick drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TickStats {
    pub particles: usize,
    pub edges: usize,
}

/// Number of particles for a surface: one per `density_divisor` pixels of
/// area, capped at `max_particles`.
///
/// The cap bounds the quadratic connect pass; at the default 80 particles a
/// frame checks at most 3160 pairs.
pub fn target_count(bounds: Bounds, config: &FieldConfig) -> usize {
    let by_area = (bounds.area() / config.density_divisor).floor();
    if by_area.is_nan() || by_area <= 0.0 {
        return 0;
    }
    if by_area >= config.max_particles as f64 {
        config.max_particles
    } else {
        by_area as usize
    }
}

/// Opacity of the line joining two particles `distance` apart, or `None`
/// when they are not close enough to connect.
pub fn edge_alpha(distance: f64, config: &FieldConfig) -> Option<f64> {
    let max = config.connect_distance;
    (distance < max).then(|| (max - distance) / max * config.style.line_opacity)
}

/// Owns the particle collection and drives it frame by frame.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    rng: Xorshift64,
    bounds: Bounds,
    particles: Vec<Particle>,
    phase: Phase,
    frames: u64,
}

impl ParticleField {
    /// Creates an empty, uninitialized field. Call [`ParticleField::rebuild`]
    /// before ticking.
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Xorshift64::new(seed),
            bounds: Bounds::default(),
            particles: Vec::new(),
            phase: Phase::Uninitialized,
            frames: 0,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Bounds the current particle set was built for.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks run since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Discards every particle and scatters a fresh batch sized for `bounds`.
    ///
    /// A stopped field stays stopped; an uninitialized one becomes running.
    pub fn rebuild(&mut self, bounds: Bounds) {
        let count = target_count(bounds, &self.config);
        self.bounds = bounds;
        self.particles.clear();
        let (rng, config) = (&mut self.rng, &self.config);
        self.particles
            .extend((0..count).map(|_| particle::spawn(rng, bounds, config)));
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Running;
        }
        debug!(
            width = bounds.width,
            height = bounds.height,
            count,
            "particle field rebuilt"
        );
    }

    /// Resumes ticking. Returns `false` if the field was never built.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Uninitialized => false,
            Phase::Running => true,
            Phase::Stopped => {
                self.phase = Phase::Running;
                debug!("particle field started");
                true
            }
        }
    }

    /// Stops the field; hosts stop scheduling frames once this returns.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Stopped;
            debug!("particle field stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Runs one frame: clear, advance and draw every particle, then draw
    /// proximity lines between every close pair.
    ///
    /// Ticking does not check the run state so tests and offline renders can
    /// step a field directly.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> TickStats {
        surface.clear();
        let bounds = self.bounds;
        for p in &mut self.particles {
            *p = particle::advance(*p, bounds, &self.config);
            particle::render(p, surface, &self.config);
        }
        let edges = self.connect(surface);
        self.frames += 1;
        let stats = TickStats {
            particles: self.particles.len(),
            edges,
        };
        trace!(frame = self.frames, ?stats, "tick");
        stats
    }

    /// Strokes a line for every unordered pair closer than the connect
    /// distance, using post-advance positions.
    fn connect(&self, surface: &mut dyn Surface) -> usize {
        let style = &self.config.style;
        let mut edges = 0;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let d = a.position.distance(b.position);
                if let Some(alpha) = edge_alpha(d, &self.config) {
                    surface.stroke_line(a.position, b.position, style.accent, style.line_width, alpha);
                    edges += 1;
                }
            }
        }
        edges
    }
}

#![deny(unsafe_code)]
//! Core of the particle-field backdrop: softly glowing particles that drift
//! across a full-viewport surface, pulse in opacity, wrap at the edges and
//! draw fading lines to their neighbours.
//!
//! Provides the [`Particle`] value and its `spawn`/`advance`/`render`
//! functions, the [`ParticleField`] coordinator, the [`Surface`] drawing
//! abstraction with its [`SurfaceManager`], the [`Backdrop`] host glue,
//! [`FieldConfig`] with its style presets, and the seedable [`Xorshift64`].

pub mod backdrop;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod params;
pub mod particle;
pub mod prng;
pub mod record;
pub mod surface;

pub use backdrop::Backdrop;
pub use color::Rgb;
pub use config::{FieldConfig, FieldStyle};
pub use error::FieldError;
pub use field::{target_count, ParticleField, Phase, TickStats};
pub use particle::Particle;
pub use prng::Xorshift64;
pub use record::{DrawCall, RecordingSurface};
pub use surface::{Bounds, GradientStop, Surface, SurfaceManager, Viewport};

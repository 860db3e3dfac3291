#![deny(unsafe_code)]
//! CPU rendering for the particle-field backdrop.
//!
//! [`pixel::PixelSurface`] implements the core `Surface` trait over an RGBA
//! buffer so a field can be ticked without a browser; [`snapshot`] writes the
//! result as PNG.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::PixelSurface;

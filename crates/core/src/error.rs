//! Error types for the particle-field core.

use thiserror::Error;

/// Errors produced while configuring or rendering a particle field.
///
/// The animation itself never fails: advancing, rendering and connecting
/// particles are closed-form. Errors only come from configuration input and
/// from the surfaces a host plugs in.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A configuration value was out of range or inconsistent.
    #[error("invalid config for '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },

    /// A style preset name was not recognized.
    #[error("unknown style: {0}")]
    UnknownStyle(String),

    /// The host has no drawing surface to render into.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Surface dimensions could not be represented by the backing store.
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// An I/O failure while exporting a frame.
    #[error("i/o error: {0}")]
    Io(String),
}

impl FieldError {
    /// Shorthand for [`FieldError::InvalidConfig`].
    pub fn config(name: &str, reason: impl Into<String>) -> Self {
        FieldError::InvalidConfig {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

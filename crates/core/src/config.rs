//! Tunables for the particle field and its two visual presets.
//!
//! The backdrop comes in two looks that differ only in how opaque the glow's
//! outer edge stays and how strongly proximity lines are drawn. Both are
//! [`FieldStyle`] presets; integrators pick one by name.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::Rgb;
use crate::error::FieldError;
use crate::params::{param_f64, param_range, param_string, param_usize};
use crate::surface::GradientStop;

pub const DEFAULT_MAX_PARTICLES: usize = 80;
/// Surface pixels per particle before the cap applies.
pub const DEFAULT_DENSITY_DIVISOR: f64 = 12_000.0;
pub const DEFAULT_CONNECT_DISTANCE: f64 = 120.0;
pub const DEFAULT_VELOCITY_RANGE: Range<f64> = -0.5..0.5;
pub const DEFAULT_SIZE_RANGE: Range<f64> = 1.0..4.0;
pub const DEFAULT_OPACITY_RANGE: Range<f64> = 0.2..1.0;
pub const DEFAULT_PULSE_SPEED_RANGE: Range<f64> = 0.01..0.03;
/// Peak deviation of the pulsing opacity around the base opacity.
pub const DEFAULT_PULSE_AMPLITUDE: f64 = 0.3;
/// Opacity floor applied after pulsing.
pub const DEFAULT_MIN_OPACITY: f64 = 0.1;
/// Glow radius as a multiple of the core radius.
pub const DEFAULT_GLOW_SCALE: f64 = 3.0;

const STYLE_NAMES: &[&str] = &["primary", "subtle"];

/// Colors and opacities used when drawing the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStyle {
    pub accent: Rgb,
    /// Glow opacity halfway out from the core.
    pub glow_mid_alpha: f64,
    /// Glow opacity at its outer radius.
    pub glow_edge_alpha: f64,
    /// Multiplier `k` in the line opacity `(d_max - d) / d_max * k`.
    pub line_opacity: f64,
    pub line_width: f64,
}

impl FieldStyle {
    /// Bright variant: glow edge stays half opaque, lines at 0.6.
    pub const PRIMARY: FieldStyle = FieldStyle {
        accent: Rgb::ACCENT,
        glow_mid_alpha: 1.0,
        glow_edge_alpha: 0.5,
        line_opacity: 0.6,
        line_width: 1.0,
    };

    /// Muted variant: glow fades to transparent, lines at 0.3.
    pub const SUBTLE: FieldStyle = FieldStyle {
        accent: Rgb::ACCENT,
        glow_mid_alpha: 1.0,
        glow_edge_alpha: 0.0,
        line_opacity: 0.3,
        line_width: 1.0,
    };

    /// Looks up a preset by name (`"primary"` or `"subtle"`).
    pub fn from_name(name: &str) -> Result<FieldStyle, FieldError> {
        match name {
            "primary" => Ok(Self::PRIMARY),
            "subtle" => Ok(Self::SUBTLE),
            _ => Err(FieldError::UnknownStyle(name.to_string())),
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        STYLE_NAMES
    }

    /// Radial gradient stops for a particle's glow, center outwards.
    pub fn glow_stops(&self) -> [GradientStop; 3] {
        [
            GradientStop::new(0.0, self.accent, 1.0),
            GradientStop::new(0.5, self.accent, self.glow_mid_alpha),
            GradientStop::new(1.0, self.accent, self.glow_edge_alpha),
        ]
    }
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self::PRIMARY
    }
}

/// All numeric tunables of a particle field.
///
/// [`Default`] reproduces the live site. Use [`FieldConfig::from_json`] to
/// apply partial overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub max_particles: usize,
    pub density_divisor: f64,
    pub connect_distance: f64,
    pub velocity_range: Range<f64>,
    pub size_range: Range<f64>,
    pub opacity_range: Range<f64>,
    pub pulse_speed_range: Range<f64>,
    pub pulse_amplitude: f64,
    pub min_opacity: f64,
    pub glow_scale: f64,
    pub style: FieldStyle,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            density_divisor: DEFAULT_DENSITY_DIVISOR,
            connect_distance: DEFAULT_CONNECT_DISTANCE,
            velocity_range: DEFAULT_VELOCITY_RANGE,
            size_range: DEFAULT_SIZE_RANGE,
            opacity_range: DEFAULT_OPACITY_RANGE,
            pulse_speed_range: DEFAULT_PULSE_SPEED_RANGE,
            pulse_amplitude: DEFAULT_PULSE_AMPLITUDE,
            min_opacity: DEFAULT_MIN_OPACITY,
            glow_scale: DEFAULT_GLOW_SCALE,
            style: FieldStyle::PRIMARY,
        }
    }
}

impl FieldConfig {
    /// Default tunables with the given style preset.
    pub fn with_style(style: FieldStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Builds a config from a JSON override object, then validates it.
    ///
    /// `style` selects the preset; `accent`, `line_opacity` and
    /// `glow_edge_alpha` then override individual style fields. Every other
    /// key maps to the field of the same name.
    pub fn from_json(params: &Value) -> Result<Self, FieldError> {
        let mut style = FieldStyle::from_name(&param_string(params, "style", "primary"))?;
        if let Some(hex) = params.get("accent").and_then(Value::as_str) {
            style.accent = Rgb::from_hex(hex)?;
        }
        style.line_opacity = param_f64(params, "line_opacity", style.line_opacity);
        style.glow_edge_alpha = param_f64(params, "glow_edge_alpha", style.glow_edge_alpha);

        let config = Self {
            max_particles: param_usize(params, "max_particles", DEFAULT_MAX_PARTICLES),
            density_divisor: param_f64(params, "density_divisor", DEFAULT_DENSITY_DIVISOR),
            connect_distance: param_f64(params, "connect_distance", DEFAULT_CONNECT_DISTANCE),
            velocity_range: param_range(params, "velocity_range", DEFAULT_VELOCITY_RANGE),
            size_range: param_range(params, "size_range", DEFAULT_SIZE_RANGE),
            opacity_range: param_range(params, "opacity_range", DEFAULT_OPACITY_RANGE),
            pulse_speed_range: param_range(params, "pulse_speed_range", DEFAULT_PULSE_SPEED_RANGE),
            pulse_amplitude: param_f64(params, "pulse_amplitude", DEFAULT_PULSE_AMPLITUDE),
            min_opacity: param_f64(params, "min_opacity", DEFAULT_MIN_OPACITY),
            glow_scale: param_f64(params, "glow_scale", DEFAULT_GLOW_SCALE),
            style,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every tunable, reporting the first one out of range.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.density_divisor.is_finite() && self.density_divisor > 0.0) {
            return Err(FieldError::config(
                "density_divisor",
                "must be a positive number",
            ));
        }
        non_negative("connect_distance", self.connect_distance)?;
        non_negative("pulse_amplitude", self.pulse_amplitude)?;
        non_negative("glow_scale", self.glow_scale)?;
        ordered("velocity_range", &self.velocity_range)?;
        ordered("size_range", &self.size_range)?;
        ordered("pulse_speed_range", &self.pulse_speed_range)?;
        ordered("opacity_range", &self.opacity_range)?;
        if self.size_range.start < 0.0 {
            return Err(FieldError::config("size_range", "radius cannot be negative"));
        }
        unit("opacity_range", self.opacity_range.start)?;
        unit("opacity_range", self.opacity_range.end)?;
        unit("min_opacity", self.min_opacity)?;
        unit("line_opacity", self.style.line_opacity)?;
        unit("glow_mid_alpha", self.style.glow_mid_alpha)?;
        unit("glow_edge_alpha", self.style.glow_edge_alpha)?;
        non_negative("line_width", self.style.line_width)?;
        Ok(())
    }

    /// Describes every override key with its type and default.
    pub fn param_schema() -> Value {
        let d = Self::default();
        json!({
            "style": {"type": "string", "default": "primary", "options": STYLE_NAMES},
            "accent": {"type": "color", "default": d.style.accent.to_hex()},
            "line_opacity": {"type": "f64", "min": 0.0, "max": 1.0, "default": d.style.line_opacity},
            "glow_edge_alpha": {"type": "f64", "min": 0.0, "max": 1.0, "default": d.style.glow_edge_alpha},
            "max_particles": {"type": "usize", "default": d.max_particles},
            "density_divisor": {"type": "f64", "default": d.density_divisor},
            "connect_distance": {"type": "f64", "default": d.connect_distance},
            "velocity_range": {"type": "range", "default": [d.velocity_range.start, d.velocity_range.end]},
            "size_range": {"type": "range", "default": [d.size_range.start, d.size_range.end]},
            "opacity_range": {"type": "range", "default": [d.opacity_range.start, d.opacity_range.end]},
            "pulse_speed_range": {"type": "range", "default": [d.pulse_speed_range.start, d.pulse_speed_range.end]},
            "pulse_amplitude": {"type": "f64", "default": d.pulse_amplitude},
            "min_opacity": {"type": "f64", "min": 0.0, "max": 1.0, "default": d.min_opacity},
            "glow_scale": {"type": "f64", "default": d.glow_scale},
        })
    }
}

fn non_negative(name: &str, v: f64) -> Result<(), FieldError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(FieldError::config(name, format!("expected a finite value >= 0, got {v}")))
    }
}

fn unit(name: &str, v: f64) -> Result<(), FieldError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(FieldError::config(name, format!("expected a value in [0, 1], got {v}")))
    }
}

fn ordered(name: &str, r: &Range<f64>) -> Result<(), FieldError> {
    if r.start.is_finite() && r.end.is_finite() && r.start <= r.end {
        Ok(())
    } else {
        Err(FieldError::config(
            name,
            format!("expected start <= end, got [{}, {}]", r.start, r.end),
        ))
    }
}

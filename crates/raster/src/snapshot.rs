//! PNG export of a [`PixelSurface`].
//!
//! Feature-gated behind `png` (default on) so hosts that only need the pixel
//! buffer do not pull in the `image` crate.

use std::path::Path;

use particle_field_core::{FieldError, Rgb};

use crate::pixel::PixelSurface;

/// Writes the surface as an opaque PNG, flattened over `background`.
///
/// Returns `FieldError::InvalidDimensions` for an empty surface and
/// `FieldError::Io` on write failure.
pub fn write_png(surface: &PixelSurface, background: Rgb, path: &Path) -> Result<(), FieldError> {
    let invalid = || FieldError::InvalidDimensions {
        width: surface.width() as f64,
        height: surface.height() as f64,
    };
    if surface.width() == 0 || surface.height() == 0 {
        return Err(invalid());
    }
    let w = u32::try_from(surface.width()).map_err(|_| invalid())?;
    let h = u32::try_from(surface.height()).map_err(|_| invalid())?;
    let img = image::RgbaImage::from_raw(w, h, surface.to_rgba8(background))
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    tracing::debug!(path = %path.display(), width = w, height = h, "snapshot written");
    Ok(())
}

//! Software [`Surface`] backed by a premultiplied RGBA buffer.
//!
//! Mirrors what a 2D canvas does with the particle field's calls closely
//! enough for offline snapshots: anti-aliased discs, radial gradients with
//! linear stop interpolation, one-pixel lines, and source-over compositing
//! with a per-call global alpha.

use glam::DVec2;
use particle_field_core::{Bounds, FieldError, GradientStop, Rgb, Surface};

/// Largest width or height the surface will allocate.
pub const MAX_SIDE: usize = 16_384;

/// RGBA pixel surface, premultiplied alpha, row-major.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<[f64; 4]>,
}

impl PixelSurface {
    /// Creates a transparent surface.
    ///
    /// Returns `FieldError::InvalidDimensions` if either side exceeds
    /// [`MAX_SIDE`].
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(FieldError::InvalidDimensions {
                width: width as f64,
                height: height as f64,
            });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Premultiplied RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f64; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Flattens the surface over an opaque `background` into RGBA8.
    pub fn to_rgba8(&self, background: Rgb) -> Vec<u8> {
        let bg = [background.r, background.g, background.b];
        self.pixels
            .iter()
            .flat_map(|&[r, g, b, a]| {
                let over = |c: f64, base: f64| quantize(c + base * (1.0 - a));
                [over(r, bg[0]), over(g, bg[1]), over(b, bg[2]), 255u8]
            })
            .collect()
    }

    /// RGBA8 with straight (non-premultiplied) alpha, keeping transparency.
    pub fn to_rgba8_transparent(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b, a]| {
                if a <= 0.0 {
                    [0, 0, 0, 0]
                } else {
                    [quantize(r / a), quantize(g / a), quantize(b / a), quantize(a)]
                }
            })
            .collect()
    }

    /// Source-over blend of `color` at `alpha` into one pixel.
    fn blend(&mut self, x: usize, y: usize, color: Rgb, alpha: f64) {
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let px = &mut self.pixels[y * self.width + x];
        let keep = 1.0 - a;
        px[0] = color.r * a + px[0] * keep;
        px[1] = color.g * a + px[1] * keep;
        px[2] = color.b * a + px[2] * keep;
        px[3] = a + px[3] * keep;
    }

    /// Pixel index ranges covering `[min, max]` in surface space.
    fn span(&self, min: DVec2, max: DVec2) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let clamp = |v: f64, len: usize| v.floor().clamp(0.0, len as f64) as usize;
        let xs = clamp(min.x, self.width)..clamp(max.x + 1.0, self.width);
        let ys = clamp(min.y, self.height)..clamp(max.y + 1.0, self.height);
        (!xs.is_empty() && !ys.is_empty()).then_some((xs, ys))
    }

    /// Visits every pixel whose center lies within `reach` of `center`,
    /// passing the pixel and its center's distance.
    fn for_each_near(&mut self, center: DVec2, reach: f64, mut f: impl FnMut(&mut Self, usize, usize, f64)) {
        let Some((xs, ys)) = self.span(center - DVec2::splat(reach), center + DVec2::splat(reach)) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let d = pixel_center(x, y).distance(center);
                if d <= reach {
                    f(&mut *self, x, y, d);
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f64, self.height as f64)
    }

    /// Canvas semantics: sizes truncate to whole pixels and resizing clears.
    fn set_bounds(&mut self, bounds: Bounds) {
        let side = |v: f64| (v.floor() as usize).min(MAX_SIDE);
        self.width = side(bounds.width);
        self.height = side(bounds.height);
        self.pixels = vec![[0.0; 4]; self.width * self.height];
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill_glow(&mut self, center: DVec2, radius: f64, stops: &[GradientStop], alpha: f64) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        self.for_each_near(center, radius, |s, x, y, d| {
            let (color, stop_alpha) = sample_stops(stops, d / radius);
            s.blend(x, y, color, stop_alpha * alpha);
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgb, alpha: f64) {
        if radius <= 0.0 {
            return;
        }
        self.for_each_near(center, radius + 0.5, |s, x, y, d| {
            let coverage = (radius - d + 0.5).clamp(0.0, 1.0);
            s.blend(x, y, color, coverage * alpha);
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgb, width: f64, alpha: f64) {
        let half = width.max(0.0) / 2.0;
        let reach = half + 0.5;
        let Some((xs, ys)) = self.span(from.min(to) - DVec2::splat(reach), from.max(to) + DVec2::splat(reach)) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let d = distance_to_segment(pixel_center(x, y), from, to);
                let coverage = (half - d + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage * alpha);
                }
            }
        }
    }
}

fn pixel_center(x: usize, y: usize) -> DVec2 {
    DVec2::new(x as f64 + 0.5, y as f64 + 0.5)
}

fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Color and alpha of a gradient at `t` in [0, 1], interpolated linearly
/// between the surrounding stops. `stops` must be sorted by offset.
pub fn sample_stops(stops: &[GradientStop], t: f64) -> (Rgb, f64) {
    let t = t.clamp(0.0, 1.0);
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return (Rgb::BLACK, 0.0),
    };
    if t <= first.offset {
        return (first.color, first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            let lerp = |x: f64, y: f64| x + (y - x) * f;
            let color = Rgb {
                r: lerp(a.color.r, b.color.r),
                g: lerp(a.color.g, b.color.g),
                b: lerp(a.color.b, b.color.b),
            };
            return (color, lerp(a.alpha, b.alpha));
        }
    }
    (last.color, last.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_field_core::{Backdrop, FieldConfig, FieldStyle, ParticleField};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn new_is_transparent_with_requested_size() {
        let s = PixelSurface::new(8, 4).unwrap();
        assert_eq!(s.bounds(), Bounds::new(8.0, 4.0));
        assert_eq!(s.pixel(7, 3), Some([0.0; 4]));
        assert_eq!(s.pixel(8, 0), None);
    }

    #[test]
    fn new_rejects_oversized_surface() {
        assert!(matches!(
            PixelSurface::new(MAX_SIDE + 1, 10),
            Err(FieldError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn set_bounds_truncates_and_reallocates() {
        let mut s = PixelSurface::new(4, 4).unwrap();
        s.set_bounds(Bounds::new(10.9, 3.2));
        assert_eq!((s.width(), s.height()), (10, 3));
        assert_eq!(s.to_rgba8(Rgb::BLACK).len(), 10 * 3 * 4);
    }

    #[test]
    fn backdrop_field_follows_the_truncated_surface_size() {
        let surface = PixelSurface::new(10, 10).unwrap();
        let mut backdrop = Backdrop::new(surface, &Bounds::new(640.9, 480.5), FieldConfig::default(), 3);
        assert_eq!(backdrop.surface().bounds(), Bounds::new(640.0, 480.0));
        assert_eq!(backdrop.field().bounds(), backdrop.surface().bounds());
        for _ in 0..200 {
            backdrop.frame();
        }
        for p in backdrop.field().particles() {
            assert!((0.0..640.0).contains(&p.position.x), "x = {}", p.position.x);
            assert!((0.0..480.0).contains(&p.position.y), "y = {}", p.position.y);
        }
    }

    #[test]
    fn fill_circle_covers_center_and_skips_far_pixels() {
        let mut s = PixelSurface::new(20, 20).unwrap();
        s.fill_circle(DVec2::new(10.0, 10.0), 3.0, Rgb::ACCENT, 1.0);
        let center = s.pixel(10, 10).unwrap();
        assert!(approx(center[3], 1.0));
        assert!(approx(center[1], Rgb::ACCENT.g));
        assert_eq!(s.pixel(0, 0), Some([0.0; 4]));
        assert_eq!(s.pixel(10, 16), Some([0.0; 4]));
    }

    #[test]
    fn fill_circle_respects_global_alpha() {
        let mut s = PixelSurface::new(10, 10).unwrap();
        s.fill_circle(DVec2::new(5.0, 5.0), 2.0, Rgb::ACCENT, 0.25);
        assert!(approx(s.pixel(5, 5).unwrap()[3], 0.25));
    }

    #[test]
    fn blending_is_source_over() {
        let mut s = PixelSurface::new(4, 4).unwrap();
        s.fill_circle(DVec2::new(2.0, 2.0), 2.0, Rgb::ACCENT, 0.5);
        s.fill_circle(DVec2::new(2.0, 2.0), 2.0, Rgb::ACCENT, 0.5);
        assert!(approx(s.pixel(2, 2).unwrap()[3], 0.75));
    }

    #[test]
    fn clear_resets_every_pixel() {
        let mut s = PixelSurface::new(6, 6).unwrap();
        s.fill_circle(DVec2::new(3.0, 3.0), 3.0, Rgb::ACCENT, 1.0);
        s.clear();
        assert!(s.to_rgba8_transparent().iter().all(|&b| b == 0));
    }

    #[test]
    fn glow_fades_toward_edge_alpha() {
        let stops = FieldStyle::SUBTLE.glow_stops();
        let mut s = PixelSurface::new(40, 40).unwrap();
        s.fill_glow(DVec2::new(20.0, 20.0), 12.0, &stops, 1.0);
        let core = s.pixel(20, 20).unwrap()[3];
        let outer = s.pixel(31, 20).unwrap()[3];
        assert!(core > 0.99, "core alpha {core}");
        assert!(outer < 0.2, "outer alpha {outer}");
        assert_eq!(s.pixel(20, 33), Some([0.0; 4]));
    }

    #[test]
    fn line_marks_pixels_along_segment_only() {
        let mut s = PixelSurface::new(20, 10).unwrap();
        s.stroke_line(DVec2::new(2.0, 5.0), DVec2::new(18.0, 5.0), Rgb::ACCENT, 1.0, 1.0);
        assert!(s.pixel(10, 4).unwrap()[3] > 0.4);
        assert!(s.pixel(10, 5).unwrap()[3] > 0.4);
        assert_eq!(s.pixel(10, 0), Some([0.0; 4]));
        assert_eq!(s.pixel(0, 5), Some([0.0; 4]));
    }

    #[test]
    fn drawing_off_surface_is_ignored() {
        let mut s = PixelSurface::new(10, 10).unwrap();
        s.fill_circle(DVec2::new(-50.0, -50.0), 3.0, Rgb::ACCENT, 1.0);
        s.stroke_line(DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0), Rgb::ACCENT, 1.0, 1.0);
        assert!(s.to_rgba8_transparent().iter().all(|&b| b == 0));
    }

    #[test]
    fn to_rgba8_composites_over_background() {
        let s = PixelSurface::new(2, 1).unwrap();
        let bg = Rgb::from_hex("#102030").unwrap();
        assert_eq!(s.to_rgba8(bg), vec![0x10, 0x20, 0x30, 255, 0x10, 0x20, 0x30, 255]);
    }

    #[test]
    fn sample_stops_interpolates_alpha() {
        let stops = FieldStyle::PRIMARY.glow_stops();
        assert!(approx(sample_stops(&stops, 0.0).1, 1.0));
        assert!(approx(sample_stops(&stops, 0.5).1, 1.0));
        assert!(approx(sample_stops(&stops, 0.75).1, 0.75));
        assert!(approx(sample_stops(&stops, 1.0).1, 0.5));
        assert!(approx(sample_stops(&stops, 7.0).1, 0.5));
    }

    #[test]
    fn sample_stops_empty_is_transparent() {
        assert_eq!(sample_stops(&[], 0.3).1, 0.0);
    }

    #[test]
    fn ticking_a_field_paints_accent_pixels() {
        let mut surface = PixelSurface::new(320, 240).unwrap();
        let mut field = ParticleField::new(FieldConfig::default(), 8);
        field.rebuild(surface.bounds());
        assert_eq!(field.len(), 6);
        field.tick(&mut surface);
        let painted = surface
            .to_rgba8_transparent()
            .chunks(4)
            .filter(|px| px[3] > 0)
            .count();
        assert!(painted > 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn alpha_stays_in_unit_interval(
                cx in -20.0_f64..60.0,
                cy in -20.0_f64..60.0,
                r in 0.0_f64..15.0,
                alpha in 0.0_f64..1.0,
                repeats in 1_usize..5,
            ) {
                let mut s = PixelSurface::new(40, 40).unwrap();
                for _ in 0..repeats {
                    s.fill_circle(DVec2::new(cx, cy), r, Rgb::ACCENT, alpha);
                    s.fill_glow(DVec2::new(cy, cx), r * 3.0, &FieldStyle::PRIMARY.glow_stops(), alpha);
                }
                for y in 0..40 {
                    for x in 0..40 {
                        let a = s.pixel(x, y).unwrap()[3];
                        prop_assert!((0.0..=1.0 + 1e-12).contains(&a));
                    }
                }
            }
        }
    }
}

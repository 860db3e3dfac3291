//! A single drifting, pulsing particle and the free functions that move and
//! draw it.
//!
//! [`Particle`] is a plain `Copy` value so a field can keep its particles in
//! one contiguous `Vec` and rebuild it without per-particle allocation.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::prng::Xorshift64;
use crate::surface::{Bounds, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: DVec2,
    /// Pixels per frame, fixed at creation.
    pub velocity: DVec2,
    /// Core radius; the glow extends to `radius * glow_scale`.
    pub radius: f64,
    pub base_opacity: f64,
    /// Radians, advanced by `pulse_speed` each frame.
    pub pulse_phase: f64,
    pub pulse_speed: f64,
    /// Opacity used for the current frame, never below the configured floor.
    pub current_opacity: f64,
}

/// Creates a particle with every attribute drawn uniformly from `config`'s
/// ranges and a position anywhere inside `bounds`.
pub fn spawn(rng: &mut Xorshift64, bounds: Bounds, config: &FieldConfig) -> Particle {
    let position = DVec2::new(rng.next_below(bounds.width), rng.next_below(bounds.height));
    let radius = rng.next_in(&config.size_range);
    let velocity = DVec2::new(
        rng.next_in(&config.velocity_range),
        rng.next_in(&config.velocity_range),
    );
    let base_opacity = rng.next_in(&config.opacity_range);
    let pulse_speed = rng.next_in(&config.pulse_speed_range);
    let pulse_phase = rng.next_below(TAU);
    Particle {
        position,
        velocity,
        radius,
        base_opacity,
        pulse_phase,
        pulse_speed,
        current_opacity: base_opacity.max(config.min_opacity),
    }
}

/// Moves the particle one frame and recomputes its pulsing opacity.
///
/// A coordinate leaving the surface is reset to the opposite edge rather than
/// wrapped by the overshoot, so the result always lies in
/// `[0, width) x [0, height)`.
pub fn advance(particle: Particle, bounds: Bounds, config: &FieldConfig) -> Particle {
    let moved = particle.position + particle.velocity;
    let position = DVec2::new(wrap(moved.x, bounds.width), wrap(moved.y, bounds.height));
    let pulse_phase = particle.pulse_phase + particle.pulse_speed;
    let current_opacity = (particle.base_opacity + pulse_phase.sin() * config.pulse_amplitude)
        .max(config.min_opacity);
    Particle {
        position,
        pulse_phase,
        current_opacity,
        ..particle
    }
}

/// Draws the particle's soft glow and then its solid core.
pub fn render(particle: &Particle, surface: &mut dyn Surface, config: &FieldConfig) {
    let style = &config.style;
    surface.fill_glow(
        particle.position,
        particle.radius * config.glow_scale,
        &style.glow_stops(),
        particle.current_opacity,
    );
    surface.fill_circle(
        particle.position,
        particle.radius,
        style.accent,
        particle.current_opacity,
    );
}

fn wrap(v: f64, extent: f64) -> f64 {
    if extent <= 0.0 || v >= extent {
        0.0
    } else if v < 0.0 {
        just_below(extent)
    } else {
        v
    }
}

/// Largest f64 strictly less than a positive `extent`.
fn just_below(extent: f64) -> f64 {
    f64::from_bits(extent.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DrawCall, RecordingSurface};

    fn still(position: DVec2) -> Particle {
        Particle {
            position,
            velocity: DVec2::ZERO,
            radius: 2.0,
            base_opacity: 0.5,
            pulse_phase: 0.0,
            pulse_speed: 0.02,
            current_opacity: 0.5,
        }
    }

    #[test]
    fn spawn_draws_every_attribute_from_its_range() {
        let config = FieldConfig::default();
        let bounds = Bounds::new(1200.0, 800.0);
        let mut rng = Xorshift64::new(7);
        for _ in 0..2000 {
            let p = spawn(&mut rng, bounds, &config);
            assert!((0.0..1200.0).contains(&p.position.x));
            assert!((0.0..800.0).contains(&p.position.y));
            assert!((-0.5..0.5).contains(&p.velocity.x));
            assert!((-0.5..0.5).contains(&p.velocity.y));
            assert!((1.0..4.0).contains(&p.radius));
            assert!((0.2..1.0).contains(&p.base_opacity));
            assert!((0.0..TAU).contains(&p.pulse_phase));
            assert!((0.01..0.03).contains(&p.pulse_speed));
            assert_eq!(p.current_opacity, p.base_opacity);
        }
    }

    #[test]
    fn spawn_on_infinite_viewport_stays_finite() {
        let config = FieldConfig::default();
        let bounds = Bounds::new(f64::INFINITY, 300.0);
        let mut rng = Xorshift64::new(5);
        for _ in 0..100 {
            let p = spawn(&mut rng, bounds, &config);
            assert_eq!(p.position.x, 0.0);
            assert!((0.0..300.0).contains(&p.position.y));
        }
    }

    #[test]
    fn spawn_is_deterministic_per_seed() {
        let config = FieldConfig::default();
        let bounds = Bounds::new(640.0, 480.0);
        let a = spawn(&mut Xorshift64::new(99), bounds, &config);
        let b = spawn(&mut Xorshift64::new(99), bounds, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn advance_moves_by_velocity() {
        let config = FieldConfig::default();
        let p = Particle {
            velocity: DVec2::new(0.25, -0.5),
            ..still(DVec2::new(10.0, 10.0))
        };
        let next = advance(p, Bounds::new(100.0, 100.0), &config);
        assert_eq!(next.position, DVec2::new(10.25, 9.5));
        assert_eq!(next.velocity, p.velocity);
    }

    #[test]
    fn advance_resets_past_right_edge_to_zero() {
        let config = FieldConfig::default();
        let p = Particle {
            velocity: DVec2::new(0.5, 0.0),
            ..still(DVec2::new(99.8, 50.0))
        };
        let next = advance(p, Bounds::new(100.0, 100.0), &config);
        assert_eq!(next.position.x, 0.0);
        assert_eq!(next.position.y, 50.0);
    }

    #[test]
    fn advance_resets_past_left_edge_to_opposite_side() {
        let config = FieldConfig::default();
        let p = Particle {
            velocity: DVec2::new(-0.5, -0.5),
            ..still(DVec2::new(0.2, 0.1))
        };
        let next = advance(p, Bounds::new(100.0, 60.0), &config);
        assert!(next.position.x < 100.0 && next.position.x > 99.999);
        assert!(next.position.y < 60.0 && next.position.y > 59.999);
    }

    #[test]
    fn advance_is_a_hard_reset_not_a_modulo() {
        // A particle far outside (e.g. after a shrink) lands on the edge, not
        // at its overshoot.
        let config = FieldConfig::default();
        let p = still(DVec2::new(350.0, 20.0));
        let next = advance(p, Bounds::new(100.0, 100.0), &config);
        assert_eq!(next.position.x, 0.0);
    }

    #[test]
    fn advance_pulses_opacity_around_base() {
        let config = FieldConfig::default();
        let p = Particle {
            pulse_phase: std::f64::consts::FRAC_PI_2 - 0.02,
            ..still(DVec2::new(5.0, 5.0))
        };
        let next = advance(p, Bounds::new(10.0, 10.0), &config);
        assert!((next.pulse_phase - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((next.current_opacity - 0.8).abs() < 1e-9);
    }

    #[test]
    fn advance_floors_opacity() {
        let config = FieldConfig::default();
        let p = Particle {
            base_opacity: 0.2,
            pulse_phase: -std::f64::consts::FRAC_PI_2 - 0.02,
            ..still(DVec2::new(5.0, 5.0))
        };
        let next = advance(p, Bounds::new(10.0, 10.0), &config);
        assert_eq!(next.current_opacity, 0.1);
    }

    #[test]
    fn advance_on_empty_bounds_pins_to_origin() {
        let config = FieldConfig::default();
        let next = advance(still(DVec2::new(3.0, 3.0)), Bounds::default(), &config);
        assert_eq!(next.position, DVec2::ZERO);
    }

    #[test]
    fn render_draws_glow_then_core_at_current_opacity() {
        let config = FieldConfig::default();
        let p = Particle {
            current_opacity: 0.42,
            ..still(DVec2::new(30.0, 40.0))
        };
        let mut surface = RecordingSurface::new(Bounds::new(100.0, 100.0));
        render(&p, &mut surface, &config);
        match surface.calls() {
            [DrawCall::Glow {
                center,
                radius,
                stops,
                alpha,
            }, DrawCall::Circle {
                center: core_center,
                radius: core_radius,
                color,
                alpha: core_alpha,
            }] => {
                assert_eq!(*center, p.position);
                assert_eq!(*radius, 6.0);
                assert_eq!(stops.len(), 3);
                assert_eq!(stops[2].alpha, 0.5);
                assert_eq!(*alpha, 0.42);
                assert_eq!(*core_center, p.position);
                assert_eq!(*core_radius, 2.0);
                assert_eq!(*color, config.style.accent);
                assert_eq!(*core_alpha, 0.42);
            }
            other => panic!("unexpected draw calls: {other:?}"),
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn advance_keeps_position_inside_bounds(
                seed: u64,
                width in 1.0_f64..4000.0,
                height in 1.0_f64..4000.0,
                frames in 1_usize..400,
            ) {
                let config = FieldConfig::default();
                let bounds = Bounds::new(width, height);
                let mut rng = Xorshift64::new(seed);
                let mut p = spawn(&mut rng, bounds, &config);
                for _ in 0..frames {
                    p = advance(p, bounds, &config);
                    prop_assert!(p.position.x >= 0.0 && p.position.x < width, "x = {}", p.position.x);
                    prop_assert!(p.position.y >= 0.0 && p.position.y < height, "y = {}", p.position.y);
                }
            }

            #[test]
            fn opacity_never_drops_below_floor(seed: u64, frames in 1_usize..2000) {
                let config = FieldConfig::default();
                let bounds = Bounds::new(300.0, 200.0);
                let mut rng = Xorshift64::new(seed);
                let mut p = spawn(&mut rng, bounds, &config);
                for _ in 0..frames {
                    p = advance(p, bounds, &config);
                    prop_assert!(p.current_opacity >= 0.1);
                }
            }

            #[test]
            fn tiny_surfaces_still_wrap_inside(
                x in -10.0_f64..10.0,
                y in -10.0_f64..10.0,
                extent in 0.001_f64..1.0,
            ) {
                let config = FieldConfig::default();
                let bounds = Bounds::new(extent, extent);
                let p = advance(still(DVec2::new(x, y)), bounds, &config);
                prop_assert!(p.position.x >= 0.0 && p.position.x < extent);
                prop_assert!(p.position.y >= 0.0 && p.position.y < extent);
            }
        }
    }
}

//! Seedable Xorshift64 generator used to scatter particles.
//!
//! Every randomized particle attribute is drawn from this generator, so a
//! field rebuilt from the same seed and bounds is bit-identical. Browser hosts
//! seed it from `Math.random`; tests and the CLI pass fixed seeds.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG with shifts (13, 7, 17).
///
/// A seed of 0 is a fixed point of xorshift and is replaced with a
/// non-zero fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a generator from `seed`, substituting the fallback for 0.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Creates a generator from a unit-interval float such as `Math.random()`.
    ///
    /// The float's full mantissa is spread across the 64-bit seed.
    pub fn from_unit(entropy: f64) -> Self {
        let scaled = (entropy.clamp(0.0, 1.0) * (1u64 << 53) as f64) as u64;
        Self::new(scaled.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in `range.start..range.end`.
    ///
    /// An empty or inverted range yields `range.start`.
    pub fn next_in(&mut self, range: &Range<f64>) -> f64 {
        let span = range.end - range.start;
        if span <= 0.0 {
            return range.start;
        }
        let v = range.start + self.next_f64() * span;
        // Rounding can land exactly on `end` for wide spans.
        if v >= range.end {
            range.start
        } else {
            v
        }
    }

    /// Uniform f64 in [0, `extent`), or 0 for a non-positive extent.
    pub fn next_below(&mut self, extent: f64) -> f64 {
        self.next_in(&(0.0..extent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Changing this value changes every seeded field layout.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        assert!((0..3).all(|_| rng.next_u64() != 0));
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut a = Xorshift64::new(1234);
        let mut b = Xorshift64::new(1234);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at index {i}");
        }
    }

    #[test]
    fn from_unit_accepts_the_whole_unit_interval() {
        for entropy in [0.0, 1e-9, 0.5, 0.999_999, 1.0] {
            let mut rng = Xorshift64::from_unit(entropy);
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "entropy {entropy} gave {v}");
        }
    }

    #[test]
    fn from_unit_distinguishes_nearby_entropy() {
        let mut a = Xorshift64::from_unit(0.25);
        let mut b = Xorshift64::from_unit(0.2500001);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_in_handles_empty_range() {
        let mut rng = Xorshift64::new(5);
        assert_eq!(rng.next_in(&(3.0..3.0)), 3.0);
        assert_eq!(rng.next_in(&(4.0..1.0)), 4.0);
    }

    #[test]
    fn next_below_zero_extent_is_zero() {
        let mut rng = Xorshift64::new(5);
        assert_eq!(rng.next_below(0.0), 0.0);
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64(), "diverged at {i}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_in_stays_in_half_open_range(
                seed: u64,
                start in -1e6_f64..1e6,
                span in 1e-6_f64..1e6,
            ) {
                let mut rng = Xorshift64::new(seed);
                let range = start..start + span;
                for _ in 0..100 {
                    let v = rng.next_in(&range);
                    prop_assert!(range.contains(&v), "{v} outside {range:?}");
                }
            }

            #[test]
            fn next_f64_is_roughly_uniform(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                let mut buckets = [0u32; 10];
                for _ in 0..10_000 {
                    let idx = (rng.next_f64() * 10.0).min(9.0) as usize;
                    buckets[idx] += 1;
                }
                for (i, &count) in buckets.iter().enumerate() {
                    prop_assert!(count >= 500, "bucket {i} has only {count}");
                }
            }
        }
    }
}

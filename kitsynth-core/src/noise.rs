//! Deterministic white-noise source.
//!
//! A 32-bit linear congruential generator (Numerical Recipes constants). The
//! sequence is part of the observable output of every noisy voice, so the
//! constants, the bit width and the float scaling are fixed.

/// Seed used by a fresh [`SynthContext`](crate::context::SynthContext).
pub const DEFAULT_SEED: u32 = 0x1357_9BDF;

const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// 2^-30: maps the signed upper 31 bits onto [-1, 1).
const SCALE: f32 = 1.0 / 1_073_741_824.0;

/// Seeded white-noise generator. Cheap to copy; one draw advances the state once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NoiseSource {
    state: u32,
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl NoiseSource {
    #[inline]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state (the seed for the next draw).
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    pub fn reseed(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Draw the next sample in [-1, 1). The top few integers round up to
    /// exactly `1.0` in `f32`, so the upper bound is inclusive in practice.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        // Reinterpret as signed, then arithmetic shift keeps the top 31 bits.
        #[allow(clippy::cast_possible_wrap)]
        let bits = (self.state as i32) >> 1;
        #[allow(clippy::cast_precision_loss)]
        let x = bits as f32;
        x * SCALE
    }

    /// Same draw widened to `f64` for the synthesis math.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_f32())
    }
}

#[cfg(test)]
#[allow(clippy::excessive_precision)]
mod tests {
    use super::*;

    #[test]
    fn first_draws_match_reference() {
        let mut n = NoiseSource::default();
        assert_eq!(n.next_f32(), 0.693_472_802_639_007_6_f32);
        assert_eq!(n.state(), 0x58C3_B7B2);
        assert_eq!(n.next_f32(), -0.672_296_106_815_338_1_f32);
        assert_eq!(n.state(), 0xA9F2_3369);
        assert_eq!(n.next_f32(), 0.777_111_709_117_889_4_f32);
        assert_eq!(n.state(), 0x6378_65B4);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = NoiseSource::new(42);
        let mut b = NoiseSource::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn output_stays_in_unit_range() {
        let mut n = NoiseSource::new(7);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for _ in 0..100_000 {
            let x = n.next_f32();
            assert!((-1.0..=1.0).contains(&x), "x={x}");
            min = min.min(x);
            max = max.max(x);
        }
        // Both halves of the range get exercised.
        assert!(min < -0.99 && max > 0.99, "min={min} max={max}");
    }

    #[test]
    fn reseed_restarts_sequence() {
        let mut n = NoiseSource::new(5);
        let first = n.next_f32();
        n.next_f32();
        n.reseed(5);
        assert_eq!(n.next_f32(), first);
    }
}

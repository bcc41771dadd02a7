//! Filters: a resonant biquad low-pass and an RC-style one-pole high-pass.
//!
//! Goals
//! - `no_std`-friendly, allocation free
//! - Stable at any requested parameter (inputs are clamped, never rejected)
//! - Per-render state: build one at the start of a render, drop it at the end
//!
//! Contents
//! - `Biquad`    : two-pole/two-zero low-pass (RBJ cookbook), DF-II transposed
//! - `OnePoleHP` : first-order difference high-pass, `α = rc / (rc + dt)`
//!
//! Notes
//! - State is order dependent; feed samples strictly in sequence.
//! - Coefficients and state are `f64`; the biquad takes and returns `f32`
//!   samples so its rounding matches the buffer format.

use crate::dsp::{clamp, cos, sin, PI, TAU};

/// Lowest cutoff the biquad accepts (Hz).
pub const MIN_CUTOFF_HZ: f64 = 10.0;
/// Highest cutoff as a fraction of Nyquist.
pub const MAX_CUTOFF_NYQUIST: f64 = 0.99;
pub const MIN_Q: f64 = 0.1;
pub const MAX_Q: f64 = 20.0;

/// Resonant low-pass biquad.
///
/// Coefficients are normalized by `a0`. A default-constructed filter is an
/// identity (`b0 = 1`, everything else zero).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    // states
    z1: f64,
    z2: f64,
}

impl Default for Biquad {
    fn default() -> Self {
        Self { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0, z1: 0.0, z2: 0.0 }
    }
}

impl Biquad {
    /// Convenience: a low-pass already configured for `cutoff_hz`/`q` at `sr`.
    #[inline]
    pub fn lowpass(cutoff_hz: f64, q: f64, sr: f64) -> Self {
        let mut f = Self::default();
        f.configure_lowpass(cutoff_hz, q, sr);
        f
    }

    /// Derive low-pass coefficients and reset the delay line.
    ///
    /// Cutoff is clamped to `[10 Hz, 0.99 × nyquist]`, `q` to `[0.1, 20]`.
    pub fn configure_lowpass(&mut self, cutoff_hz: f64, q: f64, sr: f64) {
        let nyquist = sr * 0.5;
        let fc = clamp(cutoff_hz, MIN_CUTOFF_HZ, nyquist * MAX_CUTOFF_NYQUIST);
        let resonance = clamp(q, MIN_Q, MAX_Q);

        let omega = TAU * fc / sr;
        let sin_omega = sin(omega);
        let cos_omega = cos(omega);
        let alpha = sin_omega / (2.0 * resonance);

        let b1_raw = 1.0 - cos_omega;
        let b0_raw = b1_raw * 0.5;
        let a0_raw = 1.0 + alpha;
        let a1_raw = -2.0 * cos_omega;
        let a2_raw = 1.0 - alpha;

        self.b0 = b0_raw / a0_raw;
        self.b1 = b1_raw / a0_raw;
        self.b2 = b0_raw / a0_raw;
        self.a1 = a1_raw / a0_raw;
        self.a2 = a2_raw / a0_raw;
        self.reset();
    }

    #[inline]
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    /// `(b0, b1, b2, a1, a2)`
    #[inline]
    pub fn coefficients(&self) -> (f64, f64, f64, f64, f64) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let x = f64::from(x);
        let y = x * self.b0 + self.z1;
        self.z1 = x * self.b1 + self.z2 - self.a1 * y;
        self.z2 = x * self.b2 - self.a2 * y;
        #[allow(clippy::cast_possible_truncation)]
        let out = y as f32;
        out
    }
}

/// One-pole high-pass, discretized RC network:
///
/// `y[n] = α · (y[n-1] + x[n] − x[n-1])`, `α = rc / (rc + dt)`, `rc = 1 / (2π fc)`.
///
/// No clamping happens here; callers clamp the cutoff to their own range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OnePoleHP {
    alpha: f64,
    x1: f64,
    y1: f64,
}

impl OnePoleHP {
    #[inline]
    pub fn new(cut_hz: f64, sr: f64) -> Self {
        Self { alpha: Self::alpha_for(cut_hz, sr), x1: 0.0, y1: 0.0 }
    }

    #[inline]
    pub fn alpha_for(cut_hz: f64, sr: f64) -> f64 {
        let rc = 1.0 / (2.0 * PI * cut_hz);
        let dt = 1.0 / sr;
        rc / (rc + dt)
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.alpha * (self.y1 + x - self.x1);
        self.x1 = x;
        self.y1 = y;
        y
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_biquad_is_identity() {
        let mut f = Biquad::default();
        for x in [0.5_f32, -0.25, 1.0, 0.0] {
            assert_eq!(f.process(x), x);
        }
    }

    #[test]
    fn lowpass_has_unity_dc_gain() {
        let sr = 44_100.0;
        let mut f = Biquad::lowpass(1000.0, 0.707, sr);
        let mut y = 0.0;
        for _ in 0..(sr as usize) {
            y = f.process(1.0);
        }
        assert!((y - 1.0).abs() < 1e-3, "y={y}");
    }

    #[test]
    fn lowpass_attenuates_nyquist() {
        let sr = 44_100.0;
        let mut f = Biquad::lowpass(500.0, 0.707, sr);
        let mut peak = 0.0_f32;
        for i in 0..4096 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let y = f.process(x);
            if i > 2048 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.01, "peak={peak}");
    }

    #[test]
    fn configure_resets_state() {
        let mut f = Biquad::lowpass(1000.0, 1.0, 48_000.0);
        for _ in 0..64 {
            f.process(1.0);
        }
        f.configure_lowpass(1000.0, 1.0, 48_000.0);
        let fresh = Biquad::lowpass(1000.0, 1.0, 48_000.0);
        assert_eq!(f, fresh);
    }

    #[test]
    fn cutoff_near_nyquist_stays_bounded() {
        let sr = 44_100.0;
        // Request well above Nyquist and with extreme Q; clamps keep it stable.
        let mut f = Biquad::lowpass(sr, 1_000.0, sr);
        let mut n = crate::noise::NoiseSource::default();
        for _ in 0..(sr as usize) {
            let y = f.process(n.next_f32());
            assert!(y.is_finite() && y.abs() < 100.0, "y={y}");
        }
        // Exactly 0.99 × Nyquist too.
        let mut g = Biquad::lowpass(sr * 0.5 * 0.99, 20.0, sr);
        for _ in 0..(sr as usize) {
            let y = g.process(n.next_f32());
            assert!(y.is_finite() && y.abs() < 100.0, "y={y}");
        }
    }

    #[test]
    fn zero_or_negative_params_do_not_blow_up() {
        let mut f = Biquad::lowpass(0.0, 0.0, 44_100.0);
        let (b0, _, _, a1, a2) = f.coefficients();
        assert!(b0.is_finite() && a1.is_finite() && a2.is_finite());
        for _ in 0..1000 {
            assert!(f.process(1.0).is_finite());
        }
    }

    #[test]
    fn one_pole_hp_blocks_dc() {
        let sr = 48_000.0;
        let mut hp = OnePoleHP::new(400.0, sr);
        let mut y = 1.0;
        for _ in 0..(sr as usize) {
            y = hp.process(1.0);
        }
        assert!(y.abs() < 1e-6, "y={y}");
    }

    #[test]
    fn one_pole_hp_passes_highs() {
        let sr = 44_100.0;
        let mut hp = OnePoleHP::new(1200.0, sr);
        let mut peak = 0.0_f64;
        for i in 0..2048 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let y = hp.process(x);
            if i > 1024 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak > 0.8, "peak={peak}");
    }

    #[test]
    fn one_pole_alpha_matches_rc_formula() {
        let a = OnePoleHP::alpha_for(1200.0, 44_100.0);
        let rc = 1.0 / (2.0 * PI * 1200.0);
        assert!((a - rc / (rc + 1.0 / 44_100.0)).abs() < 1e-15);
        assert!(a > 0.0 && a < 1.0);
    }
}

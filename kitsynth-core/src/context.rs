//! Render context: the timebase plus the shared noise state.
//!
//! Every voice takes a `&mut SynthContext`. Voices rendered through the same
//! context share one noise sequence, so render order changes the exact noise
//! content of each voice. Build a fresh context per voice when independent,
//! reproducible streams are wanted.

use crate::noise::{NoiseSource, DEFAULT_SEED};

/// Sample rate used at start-up and whenever an invalid rate is supplied.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SynthContext {
    sample_rate: f64,
    noise: NoiseSource,
}

impl Default for SynthContext {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SAMPLE_RATE, DEFAULT_SEED)
    }
}

impl SynthContext {
    /// Start-up state (44.1 kHz, default seed), usable in a `static`.
    pub const INITIAL: Self = Self {
        sample_rate: DEFAULT_SAMPLE_RATE,
        noise: NoiseSource::new(DEFAULT_SEED),
    };

    /// Context at `sample_rate` Hz with the default noise seed.
    #[inline]
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, DEFAULT_SEED)
    }

    #[inline]
    pub fn with_seed(sample_rate: f64, seed: u32) -> Self {
        Self {
            sample_rate: sanitize_rate(sample_rate),
            noise: NoiseSource::new(seed),
        }
    }

    /// Set the sample rate. Non-positive (or non-finite) input silently falls
    /// back to [`DEFAULT_SAMPLE_RATE`].
    #[inline]
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        let sr = sanitize_rate(sample_rate);
        if sr != sample_rate {
            log::debug!("invalid sample rate {sample_rate}, using {sr}");
        }
        self.sample_rate = sr;
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Sample period in seconds.
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// `seconds × sample_rate`, unrounded.
    #[inline]
    pub fn seconds_to_samples(&self, seconds: f64) -> f64 {
        seconds * self.sample_rate
    }

    #[inline]
    pub fn noise(&self) -> &NoiseSource {
        &self.noise
    }

    #[inline]
    pub fn noise_mut(&mut self) -> &mut NoiseSource {
        &mut self.noise
    }

    /// Draw one noise sample, advancing the shared sequence.
    #[inline]
    pub fn next_noise(&mut self) -> f64 {
        self.noise.next_f64()
    }

    #[inline]
    pub fn reseed(&mut self, seed: u32) {
        self.noise.reseed(seed);
    }
}

#[inline]
fn sanitize_rate(sample_rate: f64) -> f64 {
    if sample_rate > 0.0 && sample_rate.is_finite() {
        sample_rate
    } else {
        DEFAULT_SAMPLE_RATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_44k1() {
        let ctx = SynthContext::default();
        assert_eq!(ctx.sample_rate(), 44_100.0);
        assert_eq!(ctx.noise().state(), DEFAULT_SEED);
    }

    #[test]
    fn invalid_rates_fall_back() {
        let mut ctx = SynthContext::new(48_000.0);
        assert_eq!(ctx.sample_rate(), 48_000.0);
        ctx.set_sample_rate(0.0);
        assert_eq!(ctx.sample_rate(), DEFAULT_SAMPLE_RATE);
        ctx.set_sample_rate(22_050.0);
        ctx.set_sample_rate(-5.0);
        assert_eq!(ctx.sample_rate(), DEFAULT_SAMPLE_RATE);
        ctx.set_sample_rate(f64::NAN);
        assert_eq!(ctx.sample_rate(), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn time_conversions() {
        let ctx = SynthContext::new(48_000.0);
        assert_eq!(ctx.seconds_to_samples(0.5), 24_000.0);
        assert!((ctx.dt() * 48_000.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn shared_noise_advances() {
        let mut ctx = SynthContext::default();
        let a = ctx.next_noise();
        let b = ctx.next_noise();
        assert_ne!(a, b);
        ctx.reseed(DEFAULT_SEED);
        assert_eq!(ctx.next_noise(), a);
    }
}

//! Noise voice - low-passed white noise under the four-phase envelope.
//!
//! The pitched counterpart of the hat: the semitone offset moves the low-pass
//! cutoff instead of an oscillator, so the voice can be played from a keyboard.
//! Sustain is held for a fixed 0.3 s.

use kitsynth_core::context::SynthContext;
use kitsynth_core::dsp::{clamp, clamp_buffer, semitone_ratio};
use kitsynth_core::envelopes::Adsr;
use kitsynth_core::filters::Biquad;

use crate::duration::estimate_noise_samples;

pub const SUSTAIN_HOLD_S: f64 = 0.3;
/// Lowest cutoff; the ceiling is `0.49 × sample_rate`.
pub const MIN_CUTOFF_HZ: f64 = 40.0;

const GAIN_MAX: f64 = 2.0;
const VELOCITY_MAX: f64 = 2.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NoiseParams {
    pub cutoff: f64,
    pub q: f64,
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
    pub gain: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            cutoff: 4000.0,
            q: 0.8,
            attack: 0.01,
            decay: 0.2,
            sustain: 0.3,
            release: 0.2,
            gain: 0.8,
        }
    }
}

impl NoiseParams {
    #[inline]
    pub fn estimate_samples(&self, ctx: &SynthContext) -> usize {
        estimate_noise_samples(ctx, self.attack, self.decay, self.release)
    }
}

/// Render one noise voice into `out`. Draws one noise sample per output sample.
pub fn render_noise(
    ctx: &mut SynthContext,
    out: &mut [f32],
    params: &NoiseParams,
    velocity: f64,
    semitone_offset: i32,
) {
    if out.is_empty() {
        return;
    }
    log::trace!("noise: {} samples, cutoff {} Hz", out.len(), params.cutoff);

    let sr = ctx.sample_rate();
    let dt = ctx.dt();
    let env = Adsr::new(params.attack, params.decay, clamp(params.sustain, 0.0, 1.0), params.release);
    let amp = clamp(params.gain, 0.0, GAIN_MAX) * clamp(velocity, 0.0, VELOCITY_MAX);
    let ceiling = sr * 0.49;
    let base_cutoff = clamp(params.cutoff, MIN_CUTOFF_HZ, ceiling);
    let cutoff = clamp(base_cutoff * semitone_ratio(f64::from(semitone_offset)), MIN_CUTOFF_HZ, ceiling);
    let mut lpf = Biquad::lowpass(cutoff, params.q, sr);

    for (i, y) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 * dt;
        let gain = env.value_at(t, SUSTAIN_HOLD_S);
        let s = lpf.process(ctx.noise_mut().next_f32());
        #[allow(clippy::cast_possible_truncation)]
        {
            *y = (f64::from(s) * gain * amp) as f32;
        }
    }
    clamp_buffer(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_after_envelope_ends() {
        let mut ctx = SynthContext::default();
        let p = NoiseParams::default();
        let mut out = vec![0.0; p.estimate_samples(&ctx)];
        render_noise(&mut ctx, &mut out, &p, 1.0, 0);
        let total = Adsr::new(p.attack, p.decay, p.sustain, p.release).total_time(SUSTAIN_HOLD_S);
        let end = (total * 44_100.0) as usize + 2;
        assert!(out[end..].iter().all(|&s| s == 0.0));
        assert!(out[..end].iter().any(|&s| s.abs() > 0.01));
    }

    #[test]
    fn lower_cutoff_means_less_energy_change_per_sample() {
        // A darker filter produces a smoother signal: smaller sample-to-sample steps.
        let flat = NoiseParams { attack: 0.0, decay: 0.0, sustain: 1.0, ..NoiseParams::default() };
        let mut bright = vec![0.0; 8000];
        let mut dark = vec![0.0; 8000];
        render_noise(&mut SynthContext::default(), &mut bright, &flat, 1.0, 0);
        render_noise(&mut SynthContext::default(), &mut dark, &flat, 1.0, -36);
        let roughness = |xs: &[f32]| xs.windows(2).map(|w| f64::from((w[1] - w[0]).abs())).sum::<f64>();
        assert!(roughness(&dark) < roughness(&bright) * 0.5);
    }

    #[test]
    fn bounded_for_hot_settings() {
        let mut ctx = SynthContext::default();
        let p = NoiseParams { q: 20.0, gain: 10.0, ..NoiseParams::default() };
        let mut out = vec![0.0; 10_000];
        render_noise(&mut ctx, &mut out, &p, 10.0, 60);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}

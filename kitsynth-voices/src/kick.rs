//! Kick voice - pitch-swept sine with a noise click.
//!
//! # How It Works
//!
//! 1. Sine whose frequency starts at 3.5× the base and falls back to the base
//!    with `exp(-t / pitch_decay)` (sweep depth is 2.5× base)
//! 2. Amplitude follows `exp(-t / amp_decay)`
//! 3. During the first 10 ms a noise click is added, fading linearly to zero
//! 4. Everything scales with velocity, then hard clip
//!
//! The click is the only part of the kick that draws from the shared noise.

use kitsynth_core::context::SynthContext;
use kitsynth_core::dsp::{clamp, clamp_buffer, sin, TAU};
use kitsynth_core::envelopes::exp_decay;

use crate::duration::estimate_kick_samples;
use crate::oscillator::Phasor;

pub const FREQ_RANGE: (f64, f64) = (20.0, 200.0);
pub const PITCH_DECAY_RANGE: (f64, f64) = (0.001, 1.0);
pub const AMP_DECAY_RANGE: (f64, f64) = (0.05, 2.0);
/// Length of the click transient (seconds).
pub const CLICK_WINDOW_S: f64 = 0.01;

/// Pitch sweep depth relative to the base frequency.
const SWEEP_DEPTH: f64 = 2.5;
const VELOCITY_MAX: f64 = 2.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KickParams {
    pub freq: f64,
    pub pitch_decay: f64,
    pub amp_decay: f64,
    pub click: f64,
}

impl Default for KickParams {
    fn default() -> Self {
        Self { freq: 55.0, pitch_decay: 0.08, amp_decay: 0.45, click: 0.12 }
    }
}

impl KickParams {
    #[inline]
    pub fn estimate_samples(&self, ctx: &SynthContext) -> usize {
        estimate_kick_samples(ctx, self.amp_decay)
    }
}

/// Render one kick into `out`, overwriting every sample.
pub fn render_kick(ctx: &mut SynthContext, out: &mut [f32], params: &KickParams, velocity: f64) {
    if out.is_empty() {
        return;
    }
    log::trace!("kick: {} samples, {} Hz", out.len(), params.freq);

    let dt = ctx.dt();
    let base_freq = clamp(params.freq, FREQ_RANGE.0, FREQ_RANGE.1);
    let pitch_decay = clamp(params.pitch_decay, PITCH_DECAY_RANGE.0, PITCH_DECAY_RANGE.1);
    let amp_decay = clamp(params.amp_decay, AMP_DECAY_RANGE.0, AMP_DECAY_RANGE.1);
    let click = clamp(params.click, 0.0, 1.0);
    let vel = clamp(velocity, 0.0, VELOCITY_MAX);

    let mut phasor = Phasor::new();
    for (i, y) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 * dt;
        let freq = base_freq + base_freq * SWEEP_DEPTH * exp_decay(t, pitch_decay);
        let phase = phasor.next(freq, dt);
        let env = exp_decay(t, amp_decay);
        let mut sample = sin(phase * TAU) * env * vel;
        if t < CLICK_WINDOW_S && click > 0.0 {
            sample += ctx.next_noise() * click * (1.0 - t / CLICK_WINDOW_S) * vel;
        }
        #[allow(clippy::cast_possible_truncation)]
        {
            *y = sample as f32;
        }
    }
    clamp_buffer(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_draws_only_inside_window() {
        let mut ctx = SynthContext::new(1000.0);
        let mut out = vec![0.0; 500];
        render_kick(&mut ctx, &mut out, &KickParams { click: 1.0, ..KickParams::default() }, 1.0);
        // 10 ms at 1 kHz = samples 0..10
        let mut reference = SynthContext::new(1000.0);
        for _ in 0..10 {
            reference.next_noise();
        }
        assert_eq!(ctx.noise(), reference.noise());
    }

    #[test]
    fn no_click_no_noise() {
        let mut ctx = SynthContext::default();
        let before = *ctx.noise();
        let mut out = vec![0.0; 4096];
        render_kick(&mut ctx, &mut out, &KickParams { click: 0.0, ..KickParams::default() }, 1.0);
        assert_eq!(*ctx.noise(), before);
        // Without click the first sample is just the sine one step past zero phase.
        assert!(out[0].abs() < 0.05, "first={}", out[0]);
    }

    #[test]
    fn decays_under_amp_envelope() {
        let mut ctx = SynthContext::default();
        let p = KickParams { freq: 55.0, pitch_decay: 0.05, amp_decay: 0.3, click: 0.5 };
        let mut out = vec![0.0; p.estimate_samples(&ctx)];
        render_kick(&mut ctx, &mut out, &p, 1.0);
        let dt = 1.0 / 44_100.0;
        for (i, s) in out.iter().enumerate().skip(441) {
            let bound = exp_decay(i as f64 * dt, 0.3) + 1e-6;
            assert!(f64::from(s.abs()) <= bound, "i={i} s={s} bound={bound}");
        }
    }

    #[test]
    fn high_velocity_clips() {
        let mut ctx = SynthContext::default();
        let mut out = vec![0.0; 8192];
        render_kick(&mut ctx, &mut out, &KickParams::default(), 50.0);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(out.iter().any(|&s| s == 1.0 || s == -1.0));
    }
}

//! Clap voice - a burst train of decaying noise, band-limited afterwards.
//!
//! # How It Works
//!
//! 1. `bursts` noise bursts start `spread` seconds apart; each decays with
//!    `exp(-t / tail)` and is summed into the buffer until its gain drops
//!    below 1e-4
//! 2. The sum is high-passed (one-pole, 400 Hz) and then low-passed
//!    (biquad, 3500 Hz, Q 0.7), which leaves the "crack" band
//! 3. Scaled by `velocity × 0.5`, then hard clip
//!
//! Bursts are rendered one after another, so burst `n` consumes its noise
//! draws before burst `n + 1` starts drawing.

use kitsynth_core::context::SynthContext;
use kitsynth_core::dsp::{clamp, clamp_buffer, round};
use kitsynth_core::envelopes::exp_decay;
use kitsynth_core::filters::{Biquad, OnePoleHP};

use crate::duration::estimate_clap_samples;

pub const SPREAD_RANGE: (f64, f64) = (0.001, 0.1);
pub const TAIL_RANGE: (f64, f64) = (0.02, 2.0);
pub const HIGHPASS_HZ: f64 = 400.0;
pub const LOWPASS_HZ: f64 = 3500.0;
pub const LOWPASS_Q: f64 = 0.7;

/// A burst stops contributing once its envelope falls below this.
const BURST_FLOOR: f64 = 1e-4;
const VELOCITY_MAX: f64 = 2.0;
const OUTPUT_GAIN: f64 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClapParams {
    pub bursts: u32,
    pub spread: f64,
    pub tail: f64,
}

impl Default for ClapParams {
    fn default() -> Self {
        Self { bursts: 3, spread: 0.02, tail: 0.1 }
    }
}

impl ClapParams {
    #[inline]
    pub fn estimate_samples(&self, ctx: &SynthContext) -> usize {
        estimate_clap_samples(ctx, self.tail, self.spread, self.bursts)
    }
}

/// Render one clap into `out`, overwriting every sample.
pub fn render_clap(ctx: &mut SynthContext, out: &mut [f32], params: &ClapParams, velocity: f64) {
    if out.is_empty() {
        return;
    }
    out.fill(0.0);

    let bursts = params.bursts.max(1);
    log::trace!("clap: {} samples, {} bursts", out.len(), bursts);

    let sr = ctx.sample_rate();
    let dt = ctx.dt();
    let spacing = clamp(params.spread, SPREAD_RANGE.0, SPREAD_RANGE.1);
    let tail = clamp(params.tail, TAIL_RANGE.0, TAIL_RANGE.1);
    let vel = clamp(velocity, 0.0, VELOCITY_MAX);

    for b in 0..bursts {
        let start = round(ctx.seconds_to_samples(f64::from(b) * spacing));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let start = start as usize;
        if start >= out.len() {
            break;
        }
        for (k, y) in out[start..].iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let env = exp_decay(k as f64 * dt, tail);
            if env < BURST_FLOOR {
                break;
            }
            #[allow(clippy::cast_possible_truncation)]
            {
                *y += ctx.noise_mut().next_f32() * env as f32;
            }
        }
    }

    let mut hp = OnePoleHP::new(HIGHPASS_HZ, sr);
    let mut lpf = Biquad::lowpass(LOWPASS_HZ, LOWPASS_Q, sr);
    #[allow(clippy::cast_possible_truncation)]
    let gain = (vel * OUTPUT_GAIN) as f32;
    for y in out.iter_mut() {
        let band = hp.process(f64::from(*y));
        #[allow(clippy::cast_possible_truncation)]
        let shaped = lpf.process(band as f32);
        *y = shaped * gain;
    }
    clamp_buffer(out);
}

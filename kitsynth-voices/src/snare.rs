//! Snare voice - sine body plus high-passed noise.
//!
//! A fixed 0.3 mix of a sine at `tone` Hz sits under white noise run through a
//! 1200 Hz one-pole high-pass. Both share one exponential decay.

use kitsynth_core::context::SynthContext;
use kitsynth_core::dsp::{clamp, clamp_buffer, sin, TAU};
use kitsynth_core::envelopes::exp_decay;
use kitsynth_core::filters::OnePoleHP;

use crate::duration::estimate_snare_samples;
use crate::oscillator::Phasor;

pub const TONE_RANGE: (f64, f64) = (60.0, 2000.0);
pub const NOISE_RANGE: (f64, f64) = (0.0, 1.5);
pub const DECAY_RANGE: (f64, f64) = (0.01, 2.0);
pub const NOISE_HIGHPASS_HZ: f64 = 1200.0;

const TONE_MIX: f64 = 0.3;
const VELOCITY_MAX: f64 = 2.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnareParams {
    pub tone: f64,
    pub noise: f64,
    pub decay: f64,
}

impl Default for SnareParams {
    fn default() -> Self {
        Self { tone: 180.0, noise: 0.6, decay: 0.22 }
    }
}

impl SnareParams {
    #[inline]
    pub fn estimate_samples(&self, ctx: &SynthContext) -> usize {
        estimate_snare_samples(ctx, self.decay)
    }
}

/// Render one snare into `out`. Draws one noise sample per output sample.
pub fn render_snare(ctx: &mut SynthContext, out: &mut [f32], params: &SnareParams, velocity: f64) {
    if out.is_empty() {
        return;
    }
    log::trace!("snare: {} samples, tone {} Hz", out.len(), params.tone);

    let dt = ctx.dt();
    let tone_hz = clamp(params.tone, TONE_RANGE.0, TONE_RANGE.1);
    let noise_amt = clamp(params.noise, NOISE_RANGE.0, NOISE_RANGE.1);
    let decay = clamp(params.decay, DECAY_RANGE.0, DECAY_RANGE.1);
    let vel = clamp(velocity, 0.0, VELOCITY_MAX);

    let mut phasor = Phasor::new();
    let mut hp = OnePoleHP::new(NOISE_HIGHPASS_HZ, ctx.sample_rate());

    for (i, y) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 * dt;
        let env = exp_decay(t, decay);

        let tone = sin(phasor.next(tone_hz, dt) * TAU) * TONE_MIX * vel;
        let noise = hp.process(ctx.next_noise()) * noise_amt * vel;

        #[allow(clippy::cast_possible_truncation)]
        {
            *y = ((tone + noise) * env) as f32;
        }
    }
    clamp_buffer(out);
}

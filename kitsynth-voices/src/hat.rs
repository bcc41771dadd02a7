//! Hi-hat voice - high-passed white noise with an exponential decay.

use kitsynth_core::context::SynthContext;
use kitsynth_core::dsp::{clamp, clamp_buffer};
use kitsynth_core::envelopes::exp_decay;
use kitsynth_core::filters::OnePoleHP;

use crate::duration::estimate_hat_samples;

pub const DECAY_RANGE: (f64, f64) = (0.01, 1.0);
/// Lowest high-pass cutoff; the ceiling is `0.49 × sample_rate`.
pub const MIN_HIGHPASS_HZ: f64 = 2000.0;

const MIX: f64 = 0.6;
const VELOCITY_MAX: f64 = 2.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HatParams {
    pub decay: f64,
    pub highpass_hz: f64,
}

impl Default for HatParams {
    fn default() -> Self {
        Self { decay: 0.06, highpass_hz: 8000.0 }
    }
}

impl HatParams {
    #[inline]
    pub fn estimate_samples(&self, ctx: &SynthContext) -> usize {
        estimate_hat_samples(ctx, self.decay)
    }
}

/// Render one hat into `out`. Draws one noise sample per output sample.
pub fn render_hat(ctx: &mut SynthContext, out: &mut [f32], params: &HatParams, velocity: f64) {
    if out.is_empty() {
        return;
    }
    log::trace!("hat: {} samples, hp {} Hz", out.len(), params.highpass_hz);

    let sr = ctx.sample_rate();
    let dt = ctx.dt();
    let decay = clamp(params.decay, DECAY_RANGE.0, DECAY_RANGE.1);
    let vel = clamp(velocity, 0.0, VELOCITY_MAX);
    let cutoff = clamp(params.highpass_hz, MIN_HIGHPASS_HZ, sr * 0.49);
    let mut hp = OnePoleHP::new(cutoff, sr);

    for (i, y) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 * dt;
        let env = exp_decay(t, decay);
        let s = hp.process(ctx.next_noise());
        #[allow(clippy::cast_possible_truncation)]
        {
            *y = (s * env * vel * MIX) as f32;
        }
    }
    clamp_buffer(out);
}

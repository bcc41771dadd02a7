//! Buffer-length estimators.
//!
//! Each estimator returns `max(1, ceil(seconds × sample_rate))` for a
//! voice-specific duration. Inputs are clamped to the same ranges the matching
//! generator clamps to, so a length is never computed from a decay the
//! generator would not actually render.

use kitsynth_core::context::SynthContext;
use kitsynth_core::dsp::{ceil, clamp};
use num_traits::ToPrimitive;

use crate::clap::{SPREAD_RANGE, TAIL_RANGE};
use crate::hat::DECAY_RANGE as HAT_DECAY_RANGE;
use crate::kick::AMP_DECAY_RANGE;
use crate::snare::DECAY_RANGE as SNARE_DECAY_RANGE;

/// Convert a duration to a whole, non-zero sample count.
#[inline]
pub fn seconds_to_len(ctx: &SynthContext, seconds: f64) -> usize {
    let n = ceil(ctx.seconds_to_samples(seconds));
    match n.to_usize() {
        Some(n) => n.max(1),
        None if n > 0.0 => usize::MAX,
        None => 1,
    }
}

/// Synth: attack + decay + sustain hold/tail margin + release.
pub fn estimate_synth_samples(ctx: &SynthContext, attack: f64, decay: f64, release: f64) -> usize {
    let total = attack.max(0.25) + decay.max(0.0) + 0.35 + release.max(0.05);
    seconds_to_len(ctx, total)
}

pub fn estimate_kick_samples(ctx: &SynthContext, amp_decay: f64) -> usize {
    let (lo, hi) = AMP_DECAY_RANGE;
    let total = (clamp(amp_decay, lo, hi) + 0.12).max(0.2);
    seconds_to_len(ctx, total)
}

pub fn estimate_snare_samples(ctx: &SynthContext, decay: f64) -> usize {
    let (lo, hi) = SNARE_DECAY_RANGE;
    let total = (clamp(decay, lo, hi) + 0.12).max(0.12);
    seconds_to_len(ctx, total)
}

pub fn estimate_hat_samples(ctx: &SynthContext, decay: f64) -> usize {
    let (lo, hi) = HAT_DECAY_RANGE;
    let total = (clamp(decay, lo, hi) + 0.05).max(0.08);
    seconds_to_len(ctx, total)
}

/// Clap: the last burst starts at `(bursts − 1) × spread`, then its tail rings out.
pub fn estimate_clap_samples(ctx: &SynthContext, tail: f64, spread: f64, bursts: u32) -> usize {
    let bursts = bursts.max(1);
    let spacing = clamp(spread, SPREAD_RANGE.0, SPREAD_RANGE.1);
    let duration = clamp(tail, TAIL_RANGE.0, TAIL_RANGE.1).max(0.05);
    let total = f64::from(bursts - 1) * spacing + duration + 0.05;
    seconds_to_len(ctx, total)
}

/// Filtered noise voice: like the synth with a longer hold margin.
pub fn estimate_noise_samples(ctx: &SynthContext, attack: f64, decay: f64, release: f64) -> usize {
    let total = attack.max(0.2) + decay.max(0.0) + 0.4 + release.max(0.05);
    seconds_to_len(ctx, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kick_reference_length() {
        let ctx = SynthContext::new(44_100.0);
        assert_eq!(estimate_kick_samples(&ctx, 0.3), 18_522);
    }

    #[test]
    fn minimum_durations_apply() {
        let ctx = SynthContext::new(1000.0);
        assert_eq!(estimate_kick_samples(&ctx, 0.0), 200);
        assert_eq!(estimate_snare_samples(&ctx, -1.0), 130);
        assert_eq!(estimate_hat_samples(&ctx, 0.0), 80);
        assert_eq!(estimate_clap_samples(&ctx, 0.0, 0.0, 0), 100);
    }

    #[test]
    fn estimates_follow_generator_clamps() {
        let ctx = SynthContext::new(1000.0);
        // Decays past the generator's ceiling do not grow the buffer.
        assert_eq!(estimate_kick_samples(&ctx, 50.0), estimate_kick_samples(&ctx, 2.0));
        assert_eq!(estimate_snare_samples(&ctx, 50.0), estimate_snare_samples(&ctx, 2.0));
        assert_eq!(estimate_hat_samples(&ctx, 50.0), estimate_hat_samples(&ctx, 1.0));
        assert_eq!(
            estimate_clap_samples(&ctx, 50.0, 5.0, 4),
            estimate_clap_samples(&ctx, 2.0, 0.1, 4)
        );
    }

    #[test]
    fn clap_accounts_for_burst_spacing() {
        let ctx = SynthContext::new(1000.0);
        let one = estimate_clap_samples(&ctx, 0.1, 0.02, 1);
        let four = estimate_clap_samples(&ctx, 0.1, 0.02, 4);
        assert_eq!(four - one, 60);
    }

    #[test]
    fn always_at_least_one_sample() {
        let ctx = SynthContext::new(1.0);
        assert!(estimate_synth_samples(&ctx, -1.0, -1.0, -1.0) >= 1);
        assert!(estimate_hat_samples(&ctx, f64::NAN) >= 1);
        assert!(estimate_noise_samples(&ctx, 0.0, 0.0, 0.0) >= 1);
    }

    #[test]
    fn synth_scales_with_sample_rate() {
        let a = estimate_synth_samples(&SynthContext::new(22_050.0), 0.01, 0.2, 0.2);
        let b = estimate_synth_samples(&SynthContext::new(44_100.0), 0.01, 0.2, 0.2);
        assert!(b == 2 * a || b + 1 == 2 * a || b == 2 * a + 1, "a={a} b={b}");
    }
}

//! Envelope shapes, evaluated as pure functions of elapsed time.
//!
//! Provided envelopes:
//! - [`envelope_value`] : four-phase linear attack/decay/sustain/release
//! - [`Adsr`]           : parameter record wrapping `envelope_value`
//! - [`exp_decay`]      : `exp(-t/τ)`, the percussive one-shot used by drums
//!
//! Nothing here holds state; callers pass the time in seconds since note start.

use crate::dsp::{clamp, exp};

/// Attack and release never get shorter than this (seconds).
pub const MIN_SEGMENT_S: f64 = 0.0001;

/// Four-phase linear envelope gain in [0, 1].
///
/// - `t < attack`: ramp 0 → 1
/// - then `decay` seconds from 1 to `sustain`
/// - then `sustain_duration` seconds held at `sustain`
/// - then `release` seconds down to 0; exactly 0 afterwards
///
/// `attack`/`release` are floored to [`MIN_SEGMENT_S`], `decay` to 0 and
/// `sustain` clamped to [0, 1].
pub fn envelope_value(
    t: f64,
    attack: f64,
    decay: f64,
    sustain: f64,
    sustain_duration: f64,
    release: f64,
) -> f64 {
    let sustain_level = clamp(sustain, 0.0, 1.0);
    let attack = if attack <= 0.0 { MIN_SEGMENT_S } else { attack };
    let decay = if decay < 0.0 { 0.0 } else { decay };
    let release = if release <= 0.0 { MIN_SEGMENT_S } else { release };

    if t < attack {
        return clamp(t / attack, 0.0, 1.0);
    }

    let decay_end = attack + decay;
    if t < decay_end {
        let pos = (t - attack) / decay.max(1e-6);
        return 1.0 + (sustain_level - 1.0) * pos;
    }

    let sustain_end = decay_end + sustain_duration;
    if t < sustain_end {
        return sustain_level;
    }

    let release_pos = (t - sustain_end) / release;
    if release_pos >= 1.0 {
        return 0.0;
    }
    sustain_level * (1.0 - release_pos)
}

/// Linear ADSR parameters (seconds, sustain level in [0, 1]).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Adsr {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Adsr {
    #[inline]
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self { attack, decay, sustain, release }
    }

    /// Gain at `t` seconds with the sustain stage held for `hold` seconds.
    #[inline]
    pub fn value_at(&self, t: f64, hold: f64) -> f64 {
        envelope_value(t, self.attack, self.decay, self.sustain, hold, self.release)
    }

    /// Time at which the envelope reaches zero for a given `hold`.
    #[inline]
    pub fn total_time(&self, hold: f64) -> f64 {
        let a = if self.attack <= 0.0 { MIN_SEGMENT_S } else { self.attack };
        let r = if self.release <= 0.0 { MIN_SEGMENT_S } else { self.release };
        a + self.decay.max(0.0) + hold.max(0.0) + r
    }
}

/// Exponential one-shot decay `exp(-t / tau)`.
#[inline]
pub fn exp_decay(t: f64, tau: f64) -> f64 {
    exp(-t / tau)
}

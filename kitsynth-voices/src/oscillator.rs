//! Oscillator building blocks shared by the tonal voices.
//!
//! These are zero-allocation, per-sample components; everything here is `Copy`.
//!
//! Contents:
//! - `Waveform`, `wave_sample`  : sine/saw/triangle/square from a [0,1) phase
//! - `morph_wave_sample`        : crossfade through the four shapes
//! - `Phasor`                   : phase accumulator wrapped to [0,1)
//!
//! Notes:
//! - Nothing is band-limited; these are one-shot voices, aliasing is accepted.

use kitsynth_core::dsp::{advance_phase01, clamp, floor, lerp, saw_from_phase, sin, TAU};

/// Upper end of the morph control (matches a 11-bit controller range).
pub const MORPH_MAX: f64 = 2048.0;

/// Oscillator waveform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Waveform { Sine, Saw, Triangle, Square }

impl Waveform {
    /// Morph order: position 0 is sine, position 3 is square.
    pub const MORPH_ORDER: [Waveform; 4] =
        [Waveform::Sine, Waveform::Saw, Waveform::Triangle, Waveform::Square];
}

/// One sample of `wave` at `phase` (cycles; values outside [0,1) wrap).
#[inline]
pub fn wave_sample(wave: Waveform, phase: f64) -> f64 {
    let frac = phase - floor(phase);
    match wave {
        Waveform::Sine     => sin(phase * TAU),
        Waveform::Saw      => saw_from_phase(phase),
        Waveform::Triangle => 1.0 - 4.0 * (0.5 - frac).abs(),
        Waveform::Square   => if frac < 0.5 { 1.0 } else { -1.0 },
    }
}

/// Linear crossfade through sine → saw → triangle → square.
///
/// `morph` is clamped to [0, 2048]; 0 is a pure sine, 2048 a pure square.
#[inline]
pub fn morph_wave_sample(phase: f64, morph: f64) -> f64 {
    let morph = if morph.is_finite() { clamp(morph, 0.0, MORPH_MAX) } else { 0.0 };
    let span = (Waveform::MORPH_ORDER.len() - 1) as f64;
    let position = morph / MORPH_MAX * span;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (floor(position) as usize).min(Waveform::MORPH_ORDER.len() - 2);
    #[allow(clippy::cast_precision_loss)]
    let blend = position - index as f64;
    let a = wave_sample(Waveform::MORPH_ORDER[index], phase);
    let b = wave_sample(Waveform::MORPH_ORDER[index + 1], phase);
    lerp(a, b, blend)
}

/// Phase accumulator in cycles.
///
/// `next` advances first and then returns the new phase, so the first sample of
/// a render already sits one increment past zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Phasor {
    phase: f64,
}

impl Phasor {
    #[inline] pub fn new() -> Self { Self { phase: 0.0 } }

    /// Advance by `freq_hz × dt` and return the wrapped phase in [0, 1).
    #[inline]
    pub fn next(&mut self, freq_hz: f64, dt: f64) -> f64 {
        self.phase = advance_phase01(self.phase, freq_hz * dt);
        self.phase
    }

}

//! Subtractive synth voice.
//!
//! One oscillator (naive saw, or a morphing wavetable) through a resonant
//! low-pass biquad, shaped by the four-phase linear envelope with a fixed
//! 0.25 s sustain hold.
//!
//! # How It Works
//!
//! 1. Base frequency clamped to [20, 20000] Hz, shifted by `2^(semitones/12)`
//! 2. Phase accumulator advanced by `freq / sample_rate`, wrapped to [0, 1)
//! 3. Oscillator → low-pass (default 2000 Hz / Q 1 for non-positive input)
//! 4. × envelope × `clamp(velocity, 0, 1.5) × 0.4`
//! 5. Hard clip to [-1, 1]
//!
//! Up to three layers can be stacked with [`render_layered_synth`]; layers are
//! averaged, not summed, so the stack stays at single-voice loudness.

use kitsynth_core::context::SynthContext;
use kitsynth_core::dsp::{clamp, clamp_buffer, saw_from_phase, semitone_ratio};
use kitsynth_core::envelopes::Adsr;
use kitsynth_core::filters::Biquad;

use crate::duration::estimate_synth_samples;
use crate::oscillator::{morph_wave_sample, Phasor};

/// Sustain stage length; not a parameter.
pub const SUSTAIN_HOLD_S: f64 = 0.25;
pub const FREQ_RANGE: (f64, f64) = (20.0, 20_000.0);
pub const DEFAULT_CUTOFF_HZ: f64 = 2000.0;
pub const DEFAULT_Q: f64 = 1.0;
/// Most layers a stacked synth voice will render.
pub const MAX_LAYERS: usize = 3;

const VELOCITY_MAX: f64 = 1.5;
const OUTPUT_GAIN: f64 = 0.4;

/// Oscillator source for the synth voice.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Oscillator {
    /// Naive sawtooth.
    #[default]
    Saw,
    /// Sine → saw → triangle → square crossfade, position in [0, 2048].
    Morph(f64),
}

/// Parameters for one synth voice (or one layer of a stacked voice).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SynthParams {
    pub base_freq: f64,
    pub cutoff: f64,
    pub resonance: f64,
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
    pub oscillator: Oscillator,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            base_freq: 220.0,
            cutoff: DEFAULT_CUTOFF_HZ,
            resonance: DEFAULT_Q,
            attack: 0.01,
            decay: 0.2,
            sustain: 0.6,
            release: 0.2,
            oscillator: Oscillator::Saw,
        }
    }
}

impl SynthParams {
    /// Buffer length that holds this voice's full envelope.
    #[inline]
    pub fn estimate_samples(&self, ctx: &SynthContext) -> usize {
        estimate_synth_samples(ctx, self.attack, self.decay, self.release)
    }
}

/// Per-render state of one oscillator/filter/envelope chain.
#[derive(Copy, Clone, Debug)]
struct SynthChain {
    freq: f64,
    phasor: Phasor,
    lpf: Biquad,
    env: Adsr,
    amp: f64,
    oscillator: Oscillator,
}

impl SynthChain {
    fn new(ctx: &SynthContext, p: &SynthParams, velocity: f64, semitone_offset: i32) -> Self {
        let freq = clamp(p.base_freq, FREQ_RANGE.0, FREQ_RANGE.1)
            * semitone_ratio(f64::from(semitone_offset));
        let cutoff = if p.cutoff <= 0.0 { DEFAULT_CUTOFF_HZ } else { p.cutoff };
        let q = if p.resonance <= 0.0 { DEFAULT_Q } else { p.resonance };
        Self {
            freq,
            phasor: Phasor::new(),
            lpf: Biquad::lowpass(cutoff, q, ctx.sample_rate()),
            env: Adsr::new(p.attack, p.decay, clamp(p.sustain, 0.0, 1.0), p.release),
            amp: clamp(velocity, 0.0, VELOCITY_MAX) * OUTPUT_GAIN,
            oscillator: p.oscillator,
        }
    }

    /// Unclipped output at time `t`.
    #[inline]
    fn next(&mut self, t: f64, dt: f64) -> f64 {
        let env = self.env.value_at(t, SUSTAIN_HOLD_S);
        let phase = self.phasor.next(self.freq, dt);
        let osc = match self.oscillator {
            Oscillator::Saw => saw_from_phase(phase),
            Oscillator::Morph(m) => morph_wave_sample(phase, m),
        };
        #[allow(clippy::cast_possible_truncation)]
        let filtered = self.lpf.process(osc as f32);
        f64::from(filtered) * env * self.amp
    }
}

/// Render one synth voice into `out`, overwriting every sample.
pub fn render_synth(
    ctx: &mut SynthContext,
    out: &mut [f32],
    params: &SynthParams,
    velocity: f64,
    semitone_offset: i32,
) {
    if out.is_empty() {
        return;
    }
    log::trace!("synth: {} samples, {} Hz, {:+} st", out.len(), params.base_freq, semitone_offset);

    let dt = ctx.dt();
    let mut chain = SynthChain::new(ctx, params, velocity, semitone_offset);
    for (i, y) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 * dt;
        #[allow(clippy::cast_possible_truncation)]
        {
            *y = chain.next(t, dt) as f32;
        }
    }
    clamp_buffer(out);
}

/// Render up to [`MAX_LAYERS`] synth layers and average them into `out`.
///
/// Each layer is clipped on its own before averaging. Extra layers beyond the
/// limit are ignored; an empty layer list falls back to the default patch.
pub fn render_layered_synth(
    ctx: &mut SynthContext,
    out: &mut [f32],
    layers: &[SynthParams],
    velocity: f64,
    semitone_offset: i32,
) {
    let layers = &layers[..layers.len().min(MAX_LAYERS)];
    if layers.len() <= 1 {
        let p = layers.first().copied().unwrap_or_default();
        render_synth(ctx, out, &p, velocity, semitone_offset);
        return;
    }
    if out.is_empty() {
        return;
    }
    log::trace!("layered synth: {} samples, {} layers", out.len(), layers.len());

    let dt = ctx.dt();
    let mut chains = [SynthChain::new(ctx, &layers[0], velocity, semitone_offset); MAX_LAYERS];
    for (chain, p) in chains.iter_mut().zip(layers.iter()).skip(1) {
        *chain = SynthChain::new(ctx, p, velocity, semitone_offset);
    }
    let chains = &mut chains[..layers.len()];
    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / layers.len() as f32;

    for (i, y) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 * dt;
        let mut acc = 0.0_f32;
        for chain in chains.iter_mut() {
            #[allow(clippy::cast_possible_truncation)]
            let s = clamp(chain.next(t, dt), -1.0, 1.0) as f32;
            acc += s;
        }
        *y = acc * scale;
    }
    clamp_buffer(out);
}

/// Buffer length for a stacked voice: the longest layer wins.
pub fn estimate_layered_synth_samples(ctx: &SynthContext, layers: &[SynthParams]) -> usize {
    layers
        .iter()
        .take(MAX_LAYERS)
        .map(|p| p.estimate_samples(ctx))
        .max()
        .unwrap_or_else(|| SynthParams::default().estimate_samples(ctx))
}

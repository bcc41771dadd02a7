//! Voice selection as data.
//!
//! `Voice` is a tagged union of the per-voice parameter records. It adds no
//! behavior of its own: `estimate_samples` and `render` dispatch straight to
//! the independent `estimate_*`/`render_*` functions, so a host can store a
//! kit as plain values and render it without matching by hand.

use kitsynth_core::context::SynthContext;

use crate::clap::{render_clap, ClapParams};
use crate::hat::{render_hat, HatParams};
use crate::kick::{render_kick, KickParams};
use crate::noise::{render_noise, NoiseParams};
use crate::snare::{render_snare, SnareParams};
use crate::synth::{estimate_layered_synth_samples, render_layered_synth, SynthParams, MAX_LAYERS};

/// One stack of up to three synth layers (the usual case is a single layer).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SynthPatch {
    layers: [SynthParams; MAX_LAYERS],
    count: usize,
}

impl Default for SynthPatch {
    fn default() -> Self {
        Self::single(SynthParams::default())
    }
}

impl SynthPatch {
    pub fn single(params: SynthParams) -> Self {
        Self { layers: [params; MAX_LAYERS], count: 1 }
    }

    /// Keep at most the first three layers; an empty slice gives the default patch.
    pub fn layered(layers: &[SynthParams]) -> Self {
        let mut patch = Self::default();
        let n = layers.len().min(MAX_LAYERS);
        patch.layers[..n].copy_from_slice(&layers[..n]);
        patch.count = n.max(1);
        patch
    }

    #[inline]
    pub fn layers(&self) -> &[SynthParams] {
        &self.layers[..self.count]
    }
}

/// Parameter record for one voice, plus the note-level controls.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Voice {
    Synth { patch: SynthPatch, velocity: f64, semitone_offset: i32 },
    Kick { params: KickParams, velocity: f64 },
    Snare { params: SnareParams, velocity: f64 },
    Hat { params: HatParams, velocity: f64 },
    Clap { params: ClapParams, velocity: f64 },
    Noise { params: NoiseParams, velocity: f64, semitone_offset: i32 },
}

impl Voice {
    /// Default patch of each kind at velocity 1, in kit order.
    pub fn default_kit() -> [Voice; 6] {
        [
            Voice::Kick { params: KickParams::default(), velocity: 1.0 },
            Voice::Snare { params: SnareParams::default(), velocity: 1.0 },
            Voice::Hat { params: HatParams::default(), velocity: 1.0 },
            Voice::Clap { params: ClapParams::default(), velocity: 1.0 },
            Voice::Synth { patch: SynthPatch::default(), velocity: 1.0, semitone_offset: 0 },
            Voice::Noise { params: NoiseParams::default(), velocity: 1.0, semitone_offset: 0 },
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Voice::Synth { .. } => "synth",
            Voice::Kick { .. } => "kick",
            Voice::Snare { .. } => "snare",
            Voice::Hat { .. } => "hat",
            Voice::Clap { .. } => "clap",
            Voice::Noise { .. } => "noise",
        }
    }

    /// Whether rendering this voice advances the shared noise sequence.
    pub fn uses_noise(&self) -> bool {
        match self {
            Voice::Synth { .. } => false,
            Voice::Kick { params, .. } => params.click > 0.0,
            _ => true,
        }
    }

    /// Buffer length that holds the whole voice at the context's sample rate.
    pub fn estimate_samples(&self, ctx: &SynthContext) -> usize {
        match self {
            Voice::Synth { patch, .. } => estimate_layered_synth_samples(ctx, patch.layers()),
            Voice::Kick { params, .. } => params.estimate_samples(ctx),
            Voice::Snare { params, .. } => params.estimate_samples(ctx),
            Voice::Hat { params, .. } => params.estimate_samples(ctx),
            Voice::Clap { params, .. } => params.estimate_samples(ctx),
            Voice::Noise { params, .. } => params.estimate_samples(ctx),
        }
    }

    /// Render into a caller-owned buffer; every sample of `out` is overwritten.
    pub fn render(&self, ctx: &mut SynthContext, out: &mut [f32]) {
        match *self {
            Voice::Synth { ref patch, velocity, semitone_offset } => {
                render_layered_synth(ctx, out, patch.layers(), velocity, semitone_offset);
            }
            Voice::Kick { ref params, velocity } => render_kick(ctx, out, params, velocity),
            Voice::Snare { ref params, velocity } => render_snare(ctx, out, params, velocity),
            Voice::Hat { ref params, velocity } => render_hat(ctx, out, params, velocity),
            Voice::Clap { ref params, velocity } => render_clap(ctx, out, params, velocity),
            Voice::Noise { ref params, velocity, semitone_offset } => {
                render_noise(ctx, out, params, velocity, semitone_offset);
            }
        }
    }

    /// Allocate a buffer sized by [`Voice::estimate_samples`] and render into it.
    pub fn render_to_vec(&self, ctx: &mut SynthContext) -> Vec<f32> {
        let mut out = vec![0.0; self.estimate_samples(ctx)];
        self.render(ctx, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_matches_direct_call() {
        let params = KickParams { click: 0.7, ..KickParams::default() };
        let voice = Voice::Kick { params, velocity: 0.9 };

        let mut via_enum = SynthContext::default();
        let a = voice.render_to_vec(&mut via_enum);

        let mut direct = SynthContext::default();
        let mut b = vec![0.0; params.estimate_samples(&direct)];
        render_kick(&mut direct, &mut b, &params, 0.9);

        assert_eq!(a, b);
        assert_eq!(via_enum, direct);
    }

    #[test]
    fn layered_patch_truncates_to_three() {
        let p = SynthParams::default();
        let patch = SynthPatch::layered(&[p, p, p, p, p]);
        assert_eq!(patch.layers().len(), 3);
        assert_eq!(SynthPatch::layered(&[]).layers().len(), 1);
    }

    #[test]
    fn noise_usage_flags() {
        for v in Voice::default_kit() {
            let mut ctx = SynthContext::default();
            let before = *ctx.noise();
            let mut out = vec![0.0; 512];
            v.render(&mut ctx, &mut out);
            assert_eq!(*ctx.noise() != before, v.uses_noise(), "{}", v.name());
        }
    }

    #[test]
    fn kit_names_are_unique() {
        let kit = Voice::default_kit();
        for (i, a) in kit.iter().enumerate() {
            for b in &kit[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}

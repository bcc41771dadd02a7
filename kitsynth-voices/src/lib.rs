//! kitsynth voices - one-shot synth and drum voices rendered into caller-owned buffers.
//!
//! Crate layout:
//! - [`duration`]   : buffer-length estimators, one per voice
//! - [`oscillator`] : waveforms, wavetable morph, phase accumulator
//! - [`synth`]      : saw/morph oscillator → resonant low-pass → ADSR, layerable
//! - [`kick`], [`snare`], [`hat`], [`clap`] : percussive voices
//! - [`noise`]      : low-passed noise under an ADSR
//! - [`voice`]      : `Voice` tagged union that dispatches to the functions above
//!
//! Usage: size a buffer with an estimator, then render into it.
//!
//! ```
//! use kitsynth_voices::prelude::*;
//!
//! let mut ctx = SynthContext::new(44_100.0);
//! let params = KickParams { freq: 55.0, pitch_decay: 0.05, amp_decay: 0.3, click: 0.5 };
//! let mut buf = vec![0.0; estimate_kick_samples(&ctx, params.amp_decay)];
//! render_kick(&mut ctx, &mut buf, &params, 1.0);
//! assert!(buf.iter().all(|s| (-1.0..=1.0).contains(s)));
//! ```
//!
//! Voices never allocate and never fail; out-of-range parameters are clamped.
//! Voices rendered through one `SynthContext` share its noise sequence.

pub mod clap;
pub mod duration;
pub mod hat;
pub mod kick;
pub mod noise;
pub mod oscillator;
pub mod snare;
pub mod synth;
pub mod voice;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use clap::{render_clap, ClapParams};
pub use duration::{
    estimate_clap_samples, estimate_hat_samples, estimate_kick_samples, estimate_noise_samples,
    estimate_snare_samples, estimate_synth_samples,
};
pub use hat::{render_hat, HatParams};
pub use kick::{render_kick, KickParams};
pub use noise::{render_noise, NoiseParams};
pub use oscillator::{morph_wave_sample, Waveform};
pub use snare::{render_snare, SnareParams};
pub use synth::{
    estimate_layered_synth_samples, render_layered_synth, render_synth, Oscillator, SynthParams,
};
pub use voice::{SynthPatch, Voice};

pub mod prelude {
    pub use crate::duration::{
        estimate_clap_samples, estimate_hat_samples, estimate_kick_samples, estimate_noise_samples,
        estimate_snare_samples, estimate_synth_samples,
    };
    pub use crate::{
        estimate_layered_synth_samples, render_clap, render_hat, render_kick, render_layered_synth,
        render_noise, render_snare, render_synth, ClapParams, HatParams, KickParams, NoiseParams,
        Oscillator, SnareParams, SynthParams, SynthPatch, Voice,
    };
    pub use kitsynth_core::context::{SynthContext, DEFAULT_SAMPLE_RATE};
    pub use kitsynth_core::noise::DEFAULT_SEED;
}

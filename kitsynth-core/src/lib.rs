#![cfg_attr(not(feature = "std"), no_std)]
//! kitsynth core - no_std-ready DSP primitives for procedural one-shot voices.
//!
//! Features
//! - `std`    : (default) use the Rust standard library
//! - `no-std` : build with `#![no_std]` and use `libm` for transcendental math
//! - `simd`   : vectorized output clamp via `wide`
//!
//! Modules
//! - [`context`]   : sample rate + shared noise state handed to every voice
//! - [`dsp`]       : math backend, clamp, phase/oscillator helpers, buffer clamp
//! - [`noise`]     : deterministic LCG white noise
//! - [`envelopes`] : four-phase linear envelope, exponential decay
//! - [`filters`]   : resonant biquad low-pass, RC one-pole high-pass
//!
//! Design
//! - No heap allocations; filters and oscillators are per-render value types
//! - Every out-of-range input is clamped, nothing returns an error

pub mod context;
pub mod dsp;
pub mod envelopes;
pub mod filters;
pub mod noise;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::context::{SynthContext, DEFAULT_SAMPLE_RATE};
    pub use crate::dsp::{
        advance_phase01, clamp, clamp_buffer, lerp, saw_from_phase, semitone_ratio, PI, TAU,
    };
    pub use crate::envelopes::{envelope_value, exp_decay, Adsr};
    pub use crate::filters::{Biquad, OnePoleHP};
    pub use crate::noise::{NoiseSource, DEFAULT_SEED};
}

//! Generic DSP utilities and math helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Clean, side-effect free helpers that are easy to test
//!
//! Features used by this file:
//! - `no-std` : route transcendental functions through `libm`
//! - `simd`   : vectorized output clamp via `wide`
//!
//! Conventions:
//! - Synthesis math runs in `f64`; buffers are `f32`.
//! - All functions are `#[inline]` where useful to help the optimizer.

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    if #[cfg(feature = "std")] {
        #[inline] pub fn sin(x: f64) -> f64 { x.sin() }
        #[inline] pub fn cos(x: f64) -> f64 { x.cos() }
        #[inline] pub fn exp(x: f64) -> f64 { x.exp() }
        #[inline] pub fn powf(x: f64, y: f64) -> f64 { x.powf(y) }
        #[inline] pub fn floor(x: f64) -> f64 { x.floor() }
        #[inline] pub fn ceil(x: f64) -> f64 { x.ceil() }
        #[inline] pub fn round(x: f64) -> f64 { x.round() }
    } else if #[cfg(feature = "no-std")] {
        #[inline] pub fn sin(x: f64) -> f64 { libm::sin(x) }
        #[inline] pub fn cos(x: f64) -> f64 { libm::cos(x) }
        #[inline] pub fn exp(x: f64) -> f64 { libm::exp(x) }
        #[inline] pub fn powf(x: f64, y: f64) -> f64 { libm::pow(x, y) }
        #[inline] pub fn floor(x: f64) -> f64 { libm::floor(x) }
        #[inline] pub fn ceil(x: f64) -> f64 { libm::ceil(x) }
        #[inline] pub fn round(x: f64) -> f64 { libm::round(x) }
    } else {
        compile_error!("kitsynth-core needs either the `std` or the `no-std` feature");
    }
}

// --------------------------------- Constants -------------------------------------

pub use core::f64::consts::PI;

/// 2π
pub const TAU: f64 = 2.0 * PI;

// --------------------------------- Utilities -------------------------------------

/// Comparison-based clamp. Unlike `f64::clamp` this never panics on `lo > hi`
/// and passes NaN through untouched.
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Advance a phase accumulator by `inc` and wrap it into [0, 1).
#[inline]
pub fn advance_phase01(phase: f64, inc: f64) -> f64 {
    let p = phase + inc;
    if p >= 1.0 { p - floor(p) } else { p }
}

/// Naive (non band-limited) sawtooth in [-1, 1) from a phase in [0, 1).
#[inline]
pub fn saw_from_phase(phase01: f64) -> f64 {
    2.0 * (phase01 - floor(phase01 + 0.5))
}

/// Frequency ratio for an offset in equal-tempered semitones.
#[inline]
pub fn semitone_ratio(semitones: f64) -> f64 {
    powf(2.0, semitones / 12.0)
}

// --------------------------------- Output stage ----------------------------------

/// Hard-clip every sample of `out` to [-1, 1]. NaN becomes silence.
#[inline]
pub fn clamp_buffer(out: &mut [f32]) {
    cfg_if! {
        if #[cfg(feature = "simd")] {
            use wide::f32x8;
            let lo = f32x8::splat(-1.0);
            let hi = f32x8::splat(1.0);
            let zero = f32x8::splat(0.0);
            let mut chunks = out.chunks_exact_mut(8);
            for chunk in &mut chunks {
                let mut lane = [0.0f32; 8];
                lane.copy_from_slice(chunk);
                let v = f32x8::from(lane);
                let v = v.is_nan().blend(zero, v).max(lo).min(hi);
                chunk.copy_from_slice(&v.to_array());
            }
            clamp_scalar(chunks.into_remainder());
        } else {
            clamp_scalar(out);
        }
    }
}

#[inline]
fn clamp_scalar(out: &mut [f32]) {
    for s in out.iter_mut() {
        *s = if s.is_nan() { 0.0 } else { s.clamp(-1.0, 1.0) };
    }
}

// --------------------------------- Tests (std only) ------------------------------

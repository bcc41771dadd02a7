//! C ABI for the kitsynth voices.
//!
//! Exposes the duration estimators and render functions over one
//! process-wide [`SynthContext`] (sample rate + noise state).
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Floating parameters are `double`; buffers are caller-owned `float*`.
//! - A null `out` or `len <= 0` makes a render call a no-op.
//! - Estimates saturate at `INT32_MAX`.
//!
//! Threading
//! - Calls are serialized by an internal mutex, so concurrent renders are safe,
//!   but they still share one noise sequence: the order in which voices are
//!   rendered decides which noise each one gets.

use std::sync::{Mutex, MutexGuard};

use kitsynth_voices::prelude::*;

static CONTEXT: Mutex<SynthContext> = Mutex::new(SynthContext::INITIAL);

/// A panic can't unwind across the ABI (release builds abort), so a poisoned
/// lock only means a test thread died; the context itself is plain data.
fn context() -> MutexGuard<'static, SynthContext> {
    CONTEXT.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[inline]
fn to_c_len(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Borrow the caller's buffer, or `None` for the no-op cases.
///
/// # Safety
/// `out` must be null or valid for `len` writes of `f32`.
unsafe fn out_slice<'a>(out: *mut f32, len: i32) -> Option<&'a mut [f32]> {
    if out.is_null() || len <= 0 {
        log::trace!("render skipped: out={out:p} len={len}");
        return None;
    }
    let len = usize::try_from(len).ok()?;
    Some(std::slice::from_raw_parts_mut(out, len))
}

// --- Context ---------------------------------------------------------------------

/// Set the process-wide sample rate. Non-positive values select 44100.
#[no_mangle]
pub extern "C" fn kitsynth_set_sample_rate(sample_rate: i32) {
    context().set_sample_rate(f64::from(sample_rate));
}

#[no_mangle]
pub extern "C" fn kitsynth_sample_rate() -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let sr = context().sample_rate() as i32;
    sr
}

/// Restart the shared noise sequence from `seed`.
#[no_mangle]
pub extern "C" fn kitsynth_reseed_noise(seed: u32) {
    context().reseed(seed);
}

// --- Estimators ------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn kitsynth_estimate_synth_samples(attack: f64, decay: f64, release: f64) -> i32 {
    to_c_len(estimate_synth_samples(&context(), attack, decay, release))
}

#[no_mangle]
pub extern "C" fn kitsynth_estimate_kick_samples(amp_decay: f64) -> i32 {
    to_c_len(estimate_kick_samples(&context(), amp_decay))
}

#[no_mangle]
pub extern "C" fn kitsynth_estimate_snare_samples(decay: f64) -> i32 {
    to_c_len(estimate_snare_samples(&context(), decay))
}

#[no_mangle]
pub extern "C" fn kitsynth_estimate_hat_samples(decay: f64) -> i32 {
    to_c_len(estimate_hat_samples(&context(), decay))
}

/// Note the order: tail first, burst count last. `bursts < 1` counts as one.
#[no_mangle]
pub extern "C" fn kitsynth_estimate_clap_samples(tail: f64, spread: f64, bursts: i32) -> i32 {
    let bursts = u32::try_from(bursts).unwrap_or(0);
    to_c_len(estimate_clap_samples(&context(), tail, spread, bursts))
}

#[no_mangle]
pub extern "C" fn kitsynth_estimate_noise_samples(attack: f64, decay: f64, release: f64) -> i32 {
    to_c_len(estimate_noise_samples(&context(), attack, decay, release))
}

// --- Rendering -------------------------------------------------------------------

/// Render a saw → low-pass → ADSR note into `out[0..len]`.
///
/// # Safety
/// `out` must be null or point to at least `len` writable floats.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn kitsynth_render_synth(
    out: *mut f32,
    len: i32,
    base_freq: f64,
    cutoff: f64,
    resonance: f64,
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,
    velocity: f64,
    semitone_offset: i32,
) {
    let Some(out) = out_slice(out, len) else { return };
    let params = SynthParams {
        base_freq,
        cutoff,
        resonance,
        attack,
        decay,
        sustain,
        release,
        oscillator: Oscillator::Saw,
    };
    render_synth(&mut context(), out, &params, velocity, semitone_offset);
}

/// # Safety
/// `out` must be null or point to at least `len` writable floats.
#[no_mangle]
pub unsafe extern "C" fn kitsynth_render_kick(
    out: *mut f32,
    len: i32,
    freq: f64,
    pitch_decay: f64,
    amp_decay: f64,
    click: f64,
    velocity: f64,
) {
    let Some(out) = out_slice(out, len) else { return };
    let params = KickParams { freq, pitch_decay, amp_decay, click };
    render_kick(&mut context(), out, &params, velocity);
}

/// # Safety
/// `out` must be null or point to at least `len` writable floats.
#[no_mangle]
pub unsafe extern "C" fn kitsynth_render_snare(
    out: *mut f32,
    len: i32,
    tone: f64,
    noise_amount: f64,
    decay: f64,
    velocity: f64,
) {
    let Some(out) = out_slice(out, len) else { return };
    let params = SnareParams { tone, noise: noise_amount, decay };
    render_snare(&mut context(), out, &params, velocity);
}

/// # Safety
/// `out` must be null or point to at least `len` writable floats.
#[no_mangle]
pub unsafe extern "C" fn kitsynth_render_hat(
    out: *mut f32,
    len: i32,
    decay: f64,
    highpass_hz: f64,
    velocity: f64,
) {
    let Some(out) = out_slice(out, len) else { return };
    let params = HatParams { decay, highpass_hz };
    render_hat(&mut context(), out, &params, velocity);
}

/// # Safety
/// `out` must be null or point to at least `len` writable floats.
#[no_mangle]
pub unsafe extern "C" fn kitsynth_render_clap(
    out: *mut f32,
    len: i32,
    bursts: i32,
    spread: f64,
    tail: f64,
    velocity: f64,
) {
    let Some(out) = out_slice(out, len) else { return };
    let params = ClapParams { bursts: u32::try_from(bursts).unwrap_or(0), spread, tail };
    render_clap(&mut context(), out, &params, velocity);
}

/// Low-passed noise under an ADSR; the semitone offset moves the cutoff.
///
/// # Safety
/// `out` must be null or point to at least `len` writable floats.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn kitsynth_render_noise(
    out: *mut f32,
    len: i32,
    cutoff: f64,
    q: f64,
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,
    gain: f64,
    velocity: f64,
    semitone_offset: i32,
) {
    let Some(out) = out_slice(out, len) else { return };
    let params = NoiseParams { cutoff, q, attack, decay, sustain, release, gain };
    render_noise(&mut context(), out, &params, velocity, semitone_offset);
}

#[cfg(test)]
mod tests {
    use super::*;

    // The context is process-wide; tests that touch it take turns.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        let guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        kitsynth_set_sample_rate(44_100);
        kitsynth_reseed_noise(DEFAULT_SEED);
        guard
    }

    #[test]
    fn sample_rate_fallback() {
        let _g = serial();
        kitsynth_set_sample_rate(48_000);
        assert_eq!(kitsynth_sample_rate(), 48_000);
        kitsynth_set_sample_rate(0);
        assert_eq!(kitsynth_sample_rate(), 44_100);
        kitsynth_set_sample_rate(-1);
        assert_eq!(kitsynth_sample_rate(), 44_100);
    }

    #[test]
    fn reference_kick_length() {
        let _g = serial();
        assert_eq!(kitsynth_estimate_kick_samples(0.3), 18_522);
    }

    #[test]
    fn estimates_match_library() {
        let _g = serial();
        let ctx = SynthContext::default();
        assert_eq!(kitsynth_estimate_synth_samples(0.01, 0.2, 0.2), to_c_len(estimate_synth_samples(&ctx, 0.01, 0.2, 0.2)));
        assert_eq!(kitsynth_estimate_snare_samples(0.22), to_c_len(estimate_snare_samples(&ctx, 0.22)));
        assert_eq!(kitsynth_estimate_hat_samples(0.06), to_c_len(estimate_hat_samples(&ctx, 0.06)));
        assert_eq!(kitsynth_estimate_clap_samples(0.1, 0.02, 3), to_c_len(estimate_clap_samples(&ctx, 0.1, 0.02, 3)));
        assert_eq!(kitsynth_estimate_noise_samples(0.01, 0.2, 0.2), to_c_len(estimate_noise_samples(&ctx, 0.01, 0.2, 0.2)));
        assert_eq!(kitsynth_estimate_clap_samples(0.1, 0.02, -4), kitsynth_estimate_clap_samples(0.1, 0.02, 1));
    }

    #[test]
    fn null_and_empty_buffers_are_no_ops() {
        let _g = serial();
        let mut buf = [0.5_f32; 16];
        unsafe {
            kitsynth_render_hat(std::ptr::null_mut(), 16, 0.1, 8000.0, 1.0);
            kitsynth_render_snare(buf.as_mut_ptr(), 0, 180.0, 0.6, 0.2, 1.0);
            kitsynth_render_clap(buf.as_mut_ptr(), -3, 3, 0.02, 0.1, 1.0);
        }
        assert!(buf.iter().all(|&s| s == 0.5));
        // No noise was consumed either.
        assert_eq!(context().noise().state(), DEFAULT_SEED);
    }

    #[test]
    fn renders_match_library_and_share_noise() {
        let _g = serial();
        let n = 2048;
        let mut hat = vec![0.0_f32; n];
        let mut snare = vec![0.0_f32; n];
        unsafe {
            kitsynth_render_hat(hat.as_mut_ptr(), 2048, 0.06, 8000.0, 1.0);
            kitsynth_render_snare(snare.as_mut_ptr(), 2048, 180.0, 0.6, 0.22, 1.0);
        }

        let mut ctx = SynthContext::default();
        let mut expect_hat = vec![0.0_f32; n];
        let mut expect_snare = vec![0.0_f32; n];
        render_hat(&mut ctx, &mut expect_hat, &HatParams { decay: 0.06, highpass_hz: 8000.0 }, 1.0);
        render_snare(&mut ctx, &mut expect_snare, &SnareParams { tone: 180.0, noise: 0.6, decay: 0.22 }, 1.0);

        assert_eq!(hat, expect_hat);
        assert_eq!(snare, expect_snare);
        assert_eq!(*context(), ctx);
    }

    #[test]
    fn every_render_is_bounded() {
        let _g = serial();
        let mut buf = vec![0.0_f32; 20_000];
        let len = 20_000;
        unsafe {
            kitsynth_render_synth(buf.as_mut_ptr(), len, 440.0, 30_000.0, 50.0, 0.0, 0.1, 2.0, 0.1, 5.0, 24);
            assert!(buf.iter().all(|s| (-1.0..=1.0).contains(s)));
            kitsynth_render_kick(buf.as_mut_ptr(), len, 55.0, 0.05, 0.3, 0.5, 1.0);
            assert!(buf.iter().all(|s| (-1.0..=1.0).contains(s)));
            kitsynth_render_clap(buf.as_mut_ptr(), len, 6, 0.001, 1.0, 2.0);
            assert!(buf.iter().all(|s| (-1.0..=1.0).contains(s)));
            kitsynth_render_noise(buf.as_mut_ptr(), len, 4000.0, 20.0, 0.0, 0.1, 1.0, 0.1, 2.0, 2.0, 12);
            assert!(buf.iter().all(|s| (-1.0..=1.0).contains(s)));
        }
    }

    #[test]
    fn reseed_restarts_sequence() {
        let _g = serial();
        let mut a = [0.0_f32; 256];
        let mut b = [0.0_f32; 256];
        unsafe {
            kitsynth_reseed_noise(7);
            kitsynth_render_hat(a.as_mut_ptr(), 256, 0.06, 8000.0, 1.0);
            kitsynth_reseed_noise(7);
            kitsynth_render_hat(b.as_mut_ptr(), 256, 0.06, 8000.0, 1.0);
        }
        assert_eq!(a, b);
    }
}

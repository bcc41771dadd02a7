//! kitsynth CLI - offline renderer and inspector for the voices.
//!
//! Renders one voice (or the whole default kit) into a buffer sized by the
//! matching estimator, logs length/peak/RMS, and optionally writes a mono
//! 16-bit WAV.
//!
//! Examples
//! - `kitsynth kick --amp-decay 0.3 --click 0.5 --out kick.wav`
//! - `kitsynth --sample-rate 48000 synth --freq 110 --morph 700 --layer-morph 1900`
//! - `kitsynth kit --out-dir ./kit`
//!
//! Set `RUST_LOG=debug` (or `trace`) for more detail.

mod wav;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kitsynth_voices::prelude::*;
use kitsynth_voices::synth::MAX_LAYERS;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::wav::{write_wav, RenderStats};

/// Highest rate the CLI accepts; the voices themselves take any positive rate.
const MAX_SAMPLE_RATE: u32 = 768_000;

#[derive(Debug, Error)]
enum CliError {
    #[error("sample rate must be between 1 and {max} Hz, got {0}", max = MAX_SAMPLE_RATE)]
    SampleRate(u32),
    #[error("a synth takes at most {max} layers, got {0}", max = MAX_LAYERS)]
    TooManyLayers(usize),
    #[error("--out writes a single file; use `kit --out-dir` for the kit")]
    OutWithKit,
    #[error("{0} exists and is not a directory")]
    NotADirectory(PathBuf),
}

#[derive(Parser, Debug)]
#[command(name = "kitsynth")]
#[command(about = "Render kitsynth voices offline")]
#[command(version)]
struct Cli {
    /// Render sample rate in Hz
    #[arg(long, global = true, default_value_t = 44_100)]
    sample_rate: u32,

    /// Noise seed (defaults to the library seed)
    #[arg(long, global = true)]
    seed: Option<u32>,

    /// Note velocity (clamped by each voice)
    #[arg(long, global = true, default_value_t = 1.0)]
    velocity: f64,

    /// Write the rendered voice to this WAV file
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Saw or wavetable oscillator through a resonant low-pass and ADSR
    Synth {
        #[arg(long, default_value_t = SynthParams::default().base_freq)]
        freq: f64,
        #[arg(long, default_value_t = SynthParams::default().cutoff)]
        cutoff: f64,
        #[arg(long, default_value_t = SynthParams::default().resonance)]
        resonance: f64,
        #[arg(long, default_value_t = SynthParams::default().attack)]
        attack: f64,
        #[arg(long, default_value_t = SynthParams::default().decay)]
        decay: f64,
        #[arg(long, default_value_t = SynthParams::default().sustain)]
        sustain: f64,
        #[arg(long, default_value_t = SynthParams::default().release)]
        release: f64,
        /// Use the wavetable (0..2048: sine, saw, triangle, square) instead of the saw
        #[arg(long)]
        morph: Option<f64>,
        /// Add a wavetable layer at this morph position (repeatable)
        #[arg(long)]
        layer_morph: Vec<f64>,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        semitones: i32,
    },
    /// Pitch-swept sine with a noise click
    Kick {
        #[arg(long, default_value_t = KickParams::default().freq)]
        freq: f64,
        #[arg(long, default_value_t = KickParams::default().pitch_decay)]
        pitch_decay: f64,
        #[arg(long, default_value_t = KickParams::default().amp_decay)]
        amp_decay: f64,
        #[arg(long, default_value_t = KickParams::default().click)]
        click: f64,
    },
    /// Sine body plus high-passed noise
    Snare {
        #[arg(long, default_value_t = SnareParams::default().tone)]
        tone: f64,
        #[arg(long, default_value_t = SnareParams::default().noise)]
        noise: f64,
        #[arg(long, default_value_t = SnareParams::default().decay)]
        decay: f64,
    },
    /// High-passed noise with a short decay
    Hat {
        #[arg(long, default_value_t = HatParams::default().decay)]
        decay: f64,
        #[arg(long, default_value_t = HatParams::default().highpass_hz)]
        highpass: f64,
    },
    /// Train of noise bursts, band-limited
    Clap {
        #[arg(long, default_value_t = ClapParams::default().bursts)]
        bursts: u32,
        #[arg(long, default_value_t = ClapParams::default().spread)]
        spread: f64,
        #[arg(long, default_value_t = ClapParams::default().tail)]
        tail: f64,
    },
    /// Low-passed noise under an ADSR
    Noise {
        #[arg(long, default_value_t = NoiseParams::default().cutoff)]
        cutoff: f64,
        #[arg(long, default_value_t = NoiseParams::default().q)]
        q: f64,
        #[arg(long, default_value_t = NoiseParams::default().attack)]
        attack: f64,
        #[arg(long, default_value_t = NoiseParams::default().decay)]
        decay: f64,
        #[arg(long, default_value_t = NoiseParams::default().sustain)]
        sustain: f64,
        #[arg(long, default_value_t = NoiseParams::default().release)]
        release: f64,
        #[arg(long, default_value_t = NoiseParams::default().gain)]
        gain: f64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        semitones: i32,
    },
    /// Render every default voice through one shared context
    Kit {
        /// Directory for the numbered WAV files (created if missing)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

impl Command {
    /// The voice to render, or `None` for `kit`.
    fn voice(&self, velocity: f64) -> Result<Option<Voice>, CliError> {
        let voice = match *self {
            Command::Synth {
                freq,
                cutoff,
                resonance,
                attack,
                decay,
                sustain,
                release,
                morph,
                ref layer_morph,
                semitones,
            } => {
                let layer_count = layer_morph.len() + 1;
                if layer_count > MAX_LAYERS {
                    return Err(CliError::TooManyLayers(layer_count));
                }
                let base = SynthParams {
                    base_freq: freq,
                    cutoff,
                    resonance,
                    attack,
                    decay,
                    sustain,
                    release,
                    oscillator: morph.map_or(Oscillator::Saw, Oscillator::Morph),
                };
                let mut layers = vec![base];
                layers.extend(
                    layer_morph
                        .iter()
                        .map(|&m| SynthParams { oscillator: Oscillator::Morph(m), ..base }),
                );
                Voice::Synth { patch: SynthPatch::layered(&layers), velocity, semitone_offset: semitones }
            }
            Command::Kick { freq, pitch_decay, amp_decay, click } => Voice::Kick {
                params: KickParams { freq, pitch_decay, amp_decay, click },
                velocity,
            },
            Command::Snare { tone, noise, decay } => Voice::Snare {
                params: SnareParams { tone, noise, decay },
                velocity,
            },
            Command::Hat { decay, highpass } => Voice::Hat {
                params: HatParams { decay, highpass_hz: highpass },
                velocity,
            },
            Command::Clap { bursts, spread, tail } => Voice::Clap {
                params: ClapParams { bursts, spread, tail },
                velocity,
            },
            Command::Noise { cutoff, q, attack, decay, sustain, release, gain, semitones } => Voice::Noise {
                params: NoiseParams { cutoff, q, attack, decay, sustain, release, gain },
                velocity,
                semitone_offset: semitones,
            },
            Command::Kit { .. } => return Ok(None),
        };
        Ok(Some(voice))
    }
}

fn render_one(ctx: &mut SynthContext, voice: &Voice, sample_rate: u32) -> (Vec<f32>, RenderStats) {
    let buf = voice.render_to_vec(ctx);
    let stats = RenderStats::measure(&buf, sample_rate);
    info!(
        voice = voice.name(),
        samples = stats.samples,
        seconds = format_args!("{:.3}", stats.seconds),
        peak = format_args!("{:.4}", stats.peak),
        rms = format_args!("{:.4}", stats.rms),
        "rendered"
    );
    (buf, stats)
}

fn prepare_out_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::NotADirectory(dir.to_path_buf()).into());
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
}

fn run(cli: &Cli) -> Result<Vec<RenderStats>> {
    if cli.sample_rate == 0 || cli.sample_rate > MAX_SAMPLE_RATE {
        return Err(CliError::SampleRate(cli.sample_rate).into());
    }
    let mut ctx = SynthContext::with_seed(f64::from(cli.sample_rate), cli.seed.unwrap_or(DEFAULT_SEED));
    tracing::debug!(sample_rate = cli.sample_rate, seed = ctx.noise().state(), "context ready");

    if let Some(voice) = cli.command.voice(cli.velocity)? {
        let (buf, stats) = render_one(&mut ctx, &voice, cli.sample_rate);
        if let Some(path) = &cli.out {
            write_wav(path, cli.sample_rate, &buf)?;
            info!(path = %path.display(), "wrote wav");
        }
        return Ok(vec![stats]);
    }

    // kit
    if cli.out.is_some() {
        return Err(CliError::OutWithKit.into());
    }
    let out_dir = match &cli.command {
        Command::Kit { out_dir } => out_dir.as_deref(),
        _ => None,
    };
    if let Some(dir) = out_dir {
        prepare_out_dir(dir)?;
    }

    let mut all = Vec::new();
    for (i, voice) in Voice::default_kit().iter().enumerate() {
        let voice = match *voice {
            Voice::Kick { params, .. } => Voice::Kick { params, velocity: cli.velocity },
            Voice::Snare { params, .. } => Voice::Snare { params, velocity: cli.velocity },
            Voice::Hat { params, .. } => Voice::Hat { params, velocity: cli.velocity },
            Voice::Clap { params, .. } => Voice::Clap { params, velocity: cli.velocity },
            Voice::Synth { patch, semitone_offset, .. } => {
                Voice::Synth { patch, velocity: cli.velocity, semitone_offset }
            }
            Voice::Noise { params, semitone_offset, .. } => {
                Voice::Noise { params, velocity: cli.velocity, semitone_offset }
            }
        };
        let (buf, stats) = render_one(&mut ctx, &voice, cli.sample_rate);
        if let Some(dir) = out_dir {
            let path = dir.join(format!("{:02}-{}.wav", i + 1, voice.name()));
            write_wav(&path, cli.sample_rate, &buf)?;
            info!(path = %path.display(), "wrote wav");
        }
        all.push(stats);
    }
    Ok(all)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    run(&cli)?;
    Ok(())
}

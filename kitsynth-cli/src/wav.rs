//! Render statistics and mono 16-bit WAV output.

use std::path::Path;

use anyhow::{Context, Result};

/// Summary of one rendered buffer, logged after every render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStats {
    pub samples: usize,
    pub seconds: f64,
    pub peak: f32,
    pub rms: f32,
}

impl RenderStats {
    pub fn measure(buf: &[f32], sample_rate: u32) -> Self {
        let peak = buf.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
        let energy: f64 = buf.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        #[allow(clippy::cast_precision_loss)]
        let n = buf.len().max(1) as f64;
        #[allow(clippy::cast_possible_truncation)]
        let rms = (energy / n).sqrt() as f32;
        #[allow(clippy::cast_precision_loss)]
        let seconds = buf.len() as f64 / f64::from(sample_rate.max(1));
        Self { samples: buf.len(), seconds, peak, rms }
    }
}

#[inline]
fn to_pcm16(s: f32) -> i16 {
    #[allow(clippy::cast_possible_truncation)]
    let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
    v
}

pub fn write_wav(path: &Path, sample_rate: u32, buf: &[f32]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;
    for &s in buf {
        writer
            .write_sample(to_pcm16(s))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}

//! Locally opened audio file for the trimmer.
//!
//! The whole file is decoded up front to mono `f32` so that the duration, the
//! waveform buckets and the preview output all come from the same samples.
//! WAV goes through `hound`, FLAC through `claxon`.

use super::waveform::WaveformSample;
use crate::error::{ClipError, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AudioSource {
    path: PathBuf,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl AudioSource {
    pub fn open(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let (sample_rate, samples) = match ext.as_str() {
            "wav" => decode_wav(path)?,
            "flac" => decode_flac(path)?,
            _ => {
                return Err(ClipError::Decode(format!(
                    "no local decoder for .{ext} files"
                )));
            }
        };

        let source = Self::from_samples(path, sample_rate, samples);
        info!(
            "Decoded {}: {:.2}s at {} Hz",
            path.display(),
            source.duration(),
            sample_rate
        );
        Ok(source)
    }

    /// Open a file, falling back to an empty zero-length source when it cannot
    /// be decoded. Confirm stays disabled for such a source.
    pub fn open_or_empty(path: &Path) -> Self {
        match Self::open(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("{e}");
                Self::from_samples(path, 0, Vec::new())
            }
        }
    }

    pub fn from_samples(path: &Path, sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            path: path.to_path_buf(),
            sample_rate,
            samples,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decoded mono samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Total duration in seconds, 0 when nothing could be decoded
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn waveform(&self, bars: usize) -> WaveformSample {
        WaveformSample::from_pcm(&self.samples, bars)
    }
}

fn mixdown(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved;
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

fn decode_wav(path: &Path) -> Result<(u32, Vec<f32>)> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| ClipError::Decode(e.to_string()))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_value))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| ClipError::Decode(e.to_string()))?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ClipError::Decode(e.to_string()))?,
    };

    Ok((
        spec.sample_rate,
        mixdown(interleaved, spec.channels as usize),
    ))
}

fn decode_flac(path: &Path) -> Result<(u32, Vec<f32>)> {
    let mut reader =
        claxon::FlacReader::open(path).map_err(|e| ClipError::Decode(e.to_string()))?;
    let info = reader.streaminfo();
    let max_value = (1i64 << (info.bits_per_sample - 1)) as f32;

    let interleaved: Vec<f32> = reader
        .samples()
        .map(|s| s.map(|v| v as f32 / max_value))
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| ClipError::Decode(e.to_string()))?;

    Ok((info.sample_rate, mixdown(interleaved, info.channels as usize)))
}

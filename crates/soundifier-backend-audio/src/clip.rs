//! Voice clip loading.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::{AudioError, AudioResult};
use crate::resample::resample;

/// A decoded mono voice clip.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceClip {
    /// Samples in [-1.0, 1.0].
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl VoiceClip {
    /// Creates a clip from mono samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }

    fn at_rate(self, sample_rate: u32) -> Self {
        if self.sample_rate == sample_rate {
            return self;
        }
        Self::new(
            resample(&self.samples, self.sample_rate, sample_rate),
            sample_rate,
        )
    }
}

/// Every voice clip of a render, converted to one sample rate.
#[derive(Debug, Clone)]
pub struct VoiceBank {
    clips: Vec<VoiceClip>,
    sample_rate: u32,
}

impl VoiceBank {
    /// Builds a bank at the highest sample rate among `clips`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::NoVoices`] if `clips` is empty.
    pub fn new(clips: Vec<VoiceClip>) -> AudioResult<Self> {
        let sample_rate = clips
            .iter()
            .map(|clip| clip.sample_rate)
            .max()
            .ok_or(AudioError::NoVoices)?;

        let clips = clips
            .into_iter()
            .map(|clip| clip.at_rate(sample_rate))
            .collect();

        Ok(Self { clips, sample_rate })
    }

    /// Clips in load order.
    pub fn clips(&self) -> &[VoiceClip] {
        &self.clips
    }

    /// Common sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration of the longest clip in milliseconds.
    pub fn max_duration_ms(&self) -> f64 {
        self.clips
            .iter()
            .map(VoiceClip::duration_ms)
            .fold(0.0, f64::max)
    }
}

/// Loads every clip in `paths` into a [`VoiceBank`].
pub fn load_voices<P: AsRef<Path>>(paths: &[P]) -> AudioResult<VoiceBank> {
    let clips = paths
        .iter()
        .map(|path| load_clip(path.as_ref()))
        .collect::<AudioResult<Vec<_>>>()?;
    let bank = VoiceBank::new(clips)?;

    tracing::debug!(
        clips = bank.clips().len(),
        sample_rate = bank.sample_rate(),
        longest_ms = bank.max_duration_ms(),
        "loaded voice bank"
    );
    Ok(bank)
}

/// Loads a WAV clip as mono samples.
///
/// Integer PCM of 8, 16, 24, or 32 bits and 32-bit float are supported.
/// Multi-channel audio is averaged down to mono.
pub fn load_clip(path: &Path) -> AudioResult<VoiceClip> {
    let mut reader = WavReader::open(path).map_err(|e| AudioError::from_hound(path, e))?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = (1i64 << (bits - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| AudioError::from_hound(path, e))?
        }
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(|e| AudioError::from_hound(path, e))?,
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat {
                path: path.to_path_buf(),
                message: format!("{:?} samples with {} bits", format, bits),
            });
        }
    };

    Ok(VoiceClip::new(
        downmix(&interleaved, spec.channels),
        spec.sample_rate,
    ))
}

/// Averages interleaved channels into one.
fn downmix(interleaved: &[f64], channels: u16) -> Vec<f64> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

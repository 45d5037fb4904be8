//! Deterministic WAV encoding for blip tracks.
//!
//! Tracks are written as 16-bit PCM mono with a plain 44-byte header and no
//! extra chunks, so identical samples always produce identical files.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::{AudioError, AudioResult};

/// An encoded WAV file with its content hash.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the little-endian PCM samples only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes mono samples.
    pub fn from_mono(samples: &[f64], sample_rate: u32) -> AudioResult<Self> {
        let pcm = to_pcm16(samples);

        let mut hasher = blake3::Hasher::new();
        for value in &pcm {
            hasher.update(&value.to_le_bytes());
        }

        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::with_capacity(44 + pcm.len() * 2));
        {
            let mut writer = WavWriter::new(&mut cursor, spec).map_err(AudioError::Encode)?;
            let mut samples_writer = writer.get_i16_writer(pcm.len() as u32);
            for &value in &pcm {
                samples_writer.write_sample(value);
            }
            samples_writer.flush().map_err(AudioError::Encode)?;
            writer.finalize().map_err(AudioError::Encode)?;
        }

        Ok(Self {
            wav_data: cursor.into_inner(),
            pcm_hash: hasher.finalize().to_hex().to_string(),
            sample_rate,
            num_samples: samples.len(),
        })
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }
}

/// Quantizes samples to 16 bits, hard clipping to [-1.0, 1.0].
///
/// Overlapping blips can sum past full scale. They are clipped rather than
/// normalized so one blip's level never depends on its neighbours.
fn to_pcm16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&sample| (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16)
        .collect()
}

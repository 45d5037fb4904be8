//! Blip track synthesis.
//!
//! A track starts as silence long enough for the last blip plus the longest
//! clip (and [`TAIL_PADDING_MS`] more). Each kept blip then overlays one
//! randomly chosen clip, optionally pitch shifted and fitted into the gap
//! before the next blip.

mod shaping;


pub use shaping::{fade_out, fit_to_window, overlay};

use rand::Rng;
use soundifier_spec::settings::TAIL_PADDING_MS;
use soundifier_spec::Settings;

use crate::clip::VoiceBank;
use crate::error::{AudioError, AudioResult};
use crate::resample::pitch_shift;
use crate::skip::SkipSet;
use crate::wav::WavResult;

/// A synthesized mono blip track.
#[derive(Debug, Clone, PartialEq)]
pub struct BlipTrack {
    /// Samples in roughly [-1.0, 1.0]; overlapping blips may exceed it.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl BlipTrack {
    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Peak absolute amplitude within `[start_ms, end_ms)`.
    pub fn peak_between(&self, start_ms: f64, end_ms: f64) -> f64 {
        let start = ms_to_samples(start_ms, self.sample_rate).min(self.samples.len());
        let end = ms_to_samples(end_ms, self.sample_rate).min(self.samples.len());
        self.samples[start..end.max(start)]
            .iter()
            .fold(0.0, |peak, s| f64::max(peak, s.abs()))
    }

    /// Encodes the track as 16-bit PCM WAV.
    pub fn to_wav(&self) -> AudioResult<WavResult> {
        WavResult::from_mono(&self.samples, self.sample_rate)
    }
}

/// Converts milliseconds to a sample count, rounding to nearest.
pub fn ms_to_samples(ms: f64, sample_rate: u32) -> usize {
    (ms.max(0.0) * sample_rate as f64 / 1000.0).round() as usize
}

/// Mixes voice clips onto silence at the given blip instants.
///
/// `skip` holds 1-based transcript positions and is compared against the
/// 0-based blip index; with `skip_first_blip`, blip index 1 is dropped.
///
/// # Errors
///
/// Returns [`AudioError::NoTimings`] if `timings` is empty.
pub fn synthesize<R: Rng + ?Sized>(
    timings: &[f64],
    skip: &SkipSet,
    voices: &VoiceBank,
    settings: &Settings,
    rng: &mut R,
) -> AudioResult<BlipTrack> {
    let last = *timings.last().ok_or(AudioError::NoTimings)?;
    let sample_rate = voices.sample_rate();
    let clips = voices.clips();

    let total_ms = (last + voices.max_duration_ms() + TAIL_PADDING_MS).round();
    let mut buffer = vec![0.0; ms_to_samples(total_ms, sample_rate)];

    let (low_pitch, high_pitch) = (
        settings.min_pitch.min(settings.max_pitch),
        settings.min_pitch.max(settings.max_pitch),
    );

    let mut placed = 0usize;
    for (index, &moment) in timings.iter().enumerate() {
        let next = timings.get(index + 1).copied().unwrap_or(total_ms);

        if settings.skip_first_blip && index == 1 {
            continue;
        }
        if skip.contains(&index) {
            continue;
        }

        let clip = &clips[rng.gen_range(0..clips.len())];
        let mut samples = if settings.has_pitch_variation()
            && rng.gen::<f64>() <= settings.random_pitch_chance
        {
            let factor = rng.gen_range(low_pitch..=high_pitch);
            pitch_shift(&clip.samples, sample_rate, factor)
        } else {
            clip.samples.clone()
        };

        if settings.do_overlap_prevention {
            let window_ms = next - moment + settings.olp_hard_cutoff_leniency as f64;
            fit_to_window(&mut samples, ms_to_samples(window_ms, sample_rate));
            fade_out(
                &mut samples,
                ms_to_samples(settings.olp_fade_duration as f64, sample_rate),
            );
        }

        overlay(&mut buffer, &samples, ms_to_samples(moment, sample_rate));
        placed += 1;
    }

    tracing::debug!(
        blips = timings.len(),
        placed,
        duration_ms = total_ms,
        sample_rate,
        "synthesized blip track"
    );

    Ok(BlipTrack {
        samples: buffer,
        sample_rate,
    })
}

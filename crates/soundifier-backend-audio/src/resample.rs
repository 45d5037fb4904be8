//! Sample-rate conversion and pitch shifting.

/// Resamples mono audio by linear interpolation.
///
/// The output has `round(len * to_rate / from_rate)` samples.
pub fn resample(samples: &[f64], from_rate: u32, to_rate: u32) -> Vec<f64> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let out_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(last);
            let frac = pos - idx as f64;
            let next = samples[(idx + 1).min(last)];
            samples[idx] + (next - samples[idx]) * frac
        })
        .collect()
}

/// Shifts pitch by playing a clip `factor` times faster.
///
/// The clip is reinterpreted at `sample_rate * factor` (truncated to whole
/// hertz, never below 1 Hz) and converted back to `sample_rate`, so duration
/// shrinks by the same factor the pitch rises.
pub fn pitch_shift(samples: &[f64], sample_rate: u32, factor: f64) -> Vec<f64> {
    let shifted_rate = ((sample_rate as f64 * factor) as u32).max(1);
    resample(samples, shifted_rate, sample_rate)
}

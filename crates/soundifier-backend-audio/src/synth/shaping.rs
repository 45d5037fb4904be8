//! Per-blip shaping applied before a clip is overlaid.

/// Fits a clip into exactly `window` samples, truncating or padding with
/// silence.
pub fn fit_to_window(samples: &mut Vec<f64>, window: usize) {
    samples.resize(window, 0.0);
}

/// Fades the last `fade` samples linearly down to silence.
///
/// The final sample reaches zero. A fade longer than the clip covers the
/// whole clip.
pub fn fade_out(samples: &mut [f64], fade: usize) {
    let fade = fade.min(samples.len());
    if fade == 0 {
        return;
    }
    let start = samples.len() - fade;
    for (k, sample) in samples[start..].iter_mut().enumerate() {
        let gain = 1.0 - (k + 1) as f64 / fade as f64;
        *sample *= gain;
    }
}

/// Adds `clip` into `buffer` starting at `offset`, dropping what overflows.
pub fn overlay(buffer: &mut [f64], clip: &[f64], offset: usize) {
    if offset >= buffer.len() {
        return;
    }
    for (out, &sample) in buffer[offset..].iter_mut().zip(clip) {
        *out += sample;
    }
}

//! Blip timing extraction.
//!
//! Extraction runs in two passes over the composited frames. The first pass
//! ([`FrameScan`]) marks changed frames and the edges of pauses. The second
//! pass accumulates display time, places a blip every `interval` letter
//! reveals (and at the last letter before a pause or at the end), and, when
//! asked, plans which frames a re-timed animation keeps.

mod scan;


pub use scan::{FrameScan, PAUSE_RUN};

use soundifier_spec::Settings;

use crate::error::{GifError, GifResult};
use crate::frames::FrameSequence;

/// A frame kept by the re-encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReencodedFrame {
    /// Index of the frame in the source sequence.
    pub source_index: usize,
    /// Speed-scaled display duration, including any folded-in dropped frames.
    pub duration_ms: f64,
}

/// Frames and durations of a re-timed animation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReencodePlan {
    /// Kept frames in display order.
    pub frames: Vec<ReencodedFrame>,
}

impl ReencodePlan {
    /// Total display time of the plan in milliseconds.
    pub fn total_duration_ms(&self) -> f64 {
        self.frames.iter().map(|f| f.duration_ms).sum()
    }

    /// Number of kept frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame is kept.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Result of timing extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Blip instants in milliseconds, non-decreasing and all positive.
    pub timings: Vec<f64>,
    /// Re-encode plan, when requested.
    pub reencode: Option<ReencodePlan>,
}

/// Extracts blip instants only.
pub fn extract_timings(sequence: &FrameSequence, settings: &Settings) -> GifResult<Vec<f64>> {
    extract(sequence, settings, false).map(|extraction| extraction.timings)
}

/// Extracts blip instants and, if `reencode` is set, a re-encode plan.
///
/// # Errors
///
/// Returns [`GifError::NoTimings`] when every candidate instant was dropped,
/// either because it fell at or before zero or because of the silence cutoff.
pub fn extract(
    sequence: &FrameSequence,
    settings: &Settings,
    reencode: bool,
) -> GifResult<Extraction> {
    let scan = FrameScan::new(sequence);
    let interval = settings.interval.max(1);
    let offset = settings.moment_offset();
    let cutoff = settings.scaled_cutoff();

    let mut timings: Vec<f64> = Vec::new();
    let mut cutoff_state = CutoffState::default();

    let mut moment = 0.0_f64;
    let mut letters = 0u32;

    let mut plan = reencode.then(ReencodePlan::default);
    let mut pending_ms = 0.0_f64;
    let mut group_letters = 0u32;
    let mut repeats = 0u32;

    for (index, frame) in sequence.frames.iter().enumerate() {
        let duration = frame.duration_ms as f64;
        moment += duration;
        pending_ms += duration / settings.speed;

        if scan.pause_end[index] {
            letters = 0;
            cutoff_state.rearm();
        }

        let about_to_pause = scan.pause_start[index];

        if scan.changed[index] {
            letters += 1;
            group_letters += 1;
            repeats = 0;

            let trailing = index == scan.last_changing;
            if letters % interval == 0 || about_to_pause || trailing {
                let candidate = moment / settings.speed + offset;
                if candidate > 0.0 && cutoff_state.admit(candidate, cutoff) {
                    timings.push(candidate);
                }
            }
        } else {
            if repeats >= PAUSE_RUN {
                group_letters = 0;
            } else {
                group_letters += 1;
            }
            repeats += 1;
        }

        if let Some(plan) = plan.as_mut() {
            let grouped_away = settings.groups_frames()
                && group_letters % interval != 0
                && index < scan.last_changing
                && !about_to_pause;

            if !grouped_away {
                plan.frames.push(ReencodedFrame {
                    source_index: index,
                    duration_ms: pending_ms,
                });
                pending_ms = 0.0;
            }
        }
    }

    if timings.is_empty() {
        return Err(GifError::NoTimings);
    }

    tracing::debug!(
        frames = sequence.len(),
        changes = scan.change_count(),
        blips = timings.len(),
        kept_frames = plan.as_ref().map(ReencodePlan::len),
        "extracted blip timings"
    );

    Ok(Extraction {
        timings,
        reencode: plan,
    })
}

/// Silence-after cutoff tracking.
///
/// The gap is always measured from the last accepted instant, across
/// pauses. A pause end only lifts the latch, so the first candidate after a
/// long hold is still checked against the blip before it.
#[derive(Debug, Default)]
struct CutoffState {
    last_accepted: Option<f64>,
    silenced: bool,
}

impl CutoffState {
    fn rearm(&mut self) {
        self.silenced = false;
    }

    /// Decides whether a candidate is kept, recording it if so.
    fn admit(&mut self, candidate: f64, cutoff: Option<f64>) -> bool {
        if let Some(cutoff) = cutoff {
            if self.silenced {
                return false;
            }
            if let Some(last) = self.last_accepted {
                if candidate - last >= cutoff {
                    self.silenced = true;
                    return false;
                }
            }
        }
        self.last_accepted = Some(candidate);
        true
    }
}

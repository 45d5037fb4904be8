//! First pass: where the text changes and where it pauses.

use crate::frames::FrameSequence;

/// Number of repeated frames that marks a pause in the reveal.
pub const PAUSE_RUN: u32 = 2;

/// Per-frame change and pause markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameScan {
    /// Frame differs from its predecessor (frame 0 always does).
    pub changed: Vec<bool>,
    /// Frame revealed the last letter before a pause.
    pub pause_start: Vec<bool>,
    /// Frame resumed the reveal after a pause.
    pub pause_end: Vec<bool>,
    /// Index of the last frame that changed.
    pub last_changing: usize,
}

impl FrameScan {
    /// Scans a sequence for changes and pauses.
    pub fn new(sequence: &FrameSequence) -> Self {
        let frames = &sequence.frames;
        let count = frames.len();

        let mut changed = vec![false; count];
        let mut pause_start = vec![false; count];
        let mut pause_end = vec![false; count];
        let mut last_changing = 0;
        let mut repeats = 0u32;

        for (index, frame) in frames.iter().enumerate() {
            let is_change = index == 0 || !frame.same_content(&frames[index - 1]);
            changed[index] = is_change;

            if is_change {
                last_changing = index;
                if repeats >= PAUSE_RUN {
                    pause_end[index] = true;
                }
                repeats = 0;
            } else {
                repeats += 1;
                if repeats == PAUSE_RUN {
                    pause_start[index - PAUSE_RUN as usize] = true;
                }
            }
        }

        Self {
            changed,
            pause_start,
            pause_end,
            last_changing,
        }
    }

    /// Number of frames whose content differs from the previous frame.
    pub fn change_count(&self) -> usize {
        self.changed.iter().filter(|&&c| c).count()
    }
}

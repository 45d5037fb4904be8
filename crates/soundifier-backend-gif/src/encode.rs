//! Re-encoding a planned frame stream as a GIF.
//!
//! Every kept frame is written as a full canvas with background disposal:
//! once letters are grouped, a frame no longer differs from its predecessor
//! by a single reveal, so delta frames would composite incorrectly.

use gif::{DisposalMethod, Encoder, Frame as GifFrame, Repeat};

use crate::error::{GifError, GifResult};
use crate::frames::FrameSequence;
use crate::timing::ReencodePlan;

/// NeuQuant sampling speed for palette quantisation (1 = best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Encodes a re-encode plan into GIF bytes.
///
/// The loop count is copied from the source sequence.
pub fn encode_plan(sequence: &FrameSequence, plan: &ReencodePlan) -> GifResult<Vec<u8>> {
    let delays = centisecond_delays(plan);
    let mut buffer = Vec::new();
    {
        let mut encoder = Encoder::new(&mut buffer, sequence.width, sequence.height, &[])?;
        encoder.set_repeat(Repeat::from(sequence.loop_count))?;

        for (kept, delay) in plan.frames.iter().zip(delays) {
            let source = sequence
                .frames
                .get(kept.source_index)
                .ok_or(GifError::PlanOutOfRange {
                    index: kept.source_index,
                    count: sequence.len(),
                })?;

            let mut pixels = source.rgba().to_vec();
            let mut frame = GifFrame::from_rgba_speed(
                sequence.width,
                sequence.height,
                &mut pixels,
                QUANTIZE_SPEED,
            );
            frame.delay = delay;
            frame.dispose = DisposalMethod::Background;
            encoder.write_frame(&frame)?;
        }
    }

    tracing::debug!(
        frames = plan.len(),
        bytes = buffer.len(),
        "encoded re-timed animation"
    );
    Ok(buffer)
}

/// Converts planned durations to GIF delays.
///
/// Rounding happens on the running total, so the delays never drift from
/// the planned total by more than half a centisecond.
pub fn centisecond_delays(plan: &ReencodePlan) -> Vec<u16> {
    let mut elapsed_ms = 0.0_f64;
    let mut emitted_cs = 0u64;

    plan.frames
        .iter()
        .map(|frame| {
            elapsed_ms += frame.duration_ms;
            let target_cs = (elapsed_ms / 10.0).round().max(0.0) as u64;
            let delay = target_cs.saturating_sub(emitted_cs);
            emitted_cs += delay;
            delay.min(u16::MAX as u64) as u16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{decode, Frame, LoopCount};
    use crate::timing::ReencodedFrame;
    use pretty_assertions::assert_eq;

    fn solid_sequence(colors: &[[u8; 4]], loop_count: LoopCount) -> FrameSequence {
        let frames = colors
            .iter()
            .map(|color| {
                let pixels: Vec<u8> = color.iter().copied().cycle().take(2 * 2 * 4).collect();
                Frame::new(pixels, 40)
            })
            .collect();
        FrameSequence::new(2, 2, loop_count, frames)
    }

    fn plan(entries: &[(usize, f64)]) -> ReencodePlan {
        ReencodePlan {
            frames: entries
                .iter()
                .map(|&(source_index, duration_ms)| ReencodedFrame {
                    source_index,
                    duration_ms,
                })
                .collect(),
        }
    }

    #[test]
    fn test_delays_round_on_running_total() {
        let delays = centisecond_delays(&plan(&[(0, 25.0), (1, 25.0), (2, 25.0), (3, 25.0)]));
        assert_eq!(delays.iter().map(|&d| d as u32).sum::<u32>(), 10);
        assert_eq!(delays, vec![3, 2, 3, 2]);
    }

    #[test]
    fn test_encoded_plan_decodes_back() {
        let sequence = solid_sequence(
            &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]],
            LoopCount::Finite(2),
        );
        let bytes = encode_plan(&sequence, &plan(&[(0, 80.0), (2, 40.0)])).unwrap();

        let decoded = decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.loop_count, LoopCount::Finite(2));
        assert_eq!(decoded.frames[0].duration_ms, 80);
        assert_eq!(decoded.frames[1].duration_ms, 40);
        assert!(!decoded.frames[0].same_content(&decoded.frames[1]));
    }

    #[test]
    fn test_plan_out_of_range() {
        let sequence = solid_sequence(&[[1, 1, 1, 255]], LoopCount::Infinite);
        let err = encode_plan(&sequence, &plan(&[(3, 40.0)])).unwrap_err();
        assert!(matches!(
            err,
            GifError::PlanOutOfRange { index: 3, count: 1 }
        ));
    }
}

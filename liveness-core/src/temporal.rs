//! Temporal Analyzer — reduces an ordered frame sequence plus a required
//! step list into per-step confirmation results.
//!
//! The only state carried across frames is a cursor over the required
//! steps and a streak counter for whichever step is currently pending; a
//! step confirms once its gesture has fired on two consecutive frames,
//! which is what rejects single-frame noise. Advancing the cursor only on
//! confirmation is what keeps confirming frame indices monotonic without
//! a separate pass to check it — `temporal_valid` re-derives that property
//! from the result rather than trusting the invariant blindly.

use crate::error::InputError;
use crate::model::{FrameAnalysis, GestureTag, StepResult};

const STREAK_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct TemporalResult {
    pub step_results: Vec<StepResult>,
    pub temporal_valid: bool,
}

pub fn analyze(
    frames: &[FrameAnalysis],
    steps: &[GestureTag],
    min_frames: usize,
) -> Result<TemporalResult, InputError> {
    if frames.is_empty() {
        return Err(InputError::NoFrames);
    }
    if frames.len() < min_frames {
        return Err(InputError::TooFewFrames {
            got: frames.len(),
            min: min_frames,
        });
    }

    let mut step_results: Vec<StepResult> = steps
        .iter()
        .map(|&step| StepResult {
            step,
            detected: false,
            confidence: 0.0,
            frame_idx: -1,
        })
        .collect();

    let mut cursor = 0usize;
    let mut streak_len = 0usize;
    let mut streak_max_conf = 0f32;

    for frame in frames {
        if cursor >= steps.len() {
            break;
        }
        let tag = steps[cursor];
        let signal = frame.signal_for(tag);
        if signal.fired {
            streak_len += 1;
            streak_max_conf = streak_max_conf.max(signal.confidence);
            if streak_len >= STREAK_LEN {
                step_results[cursor] = StepResult {
                    step: tag,
                    detected: true,
                    confidence: streak_max_conf,
                    frame_idx: frame.frame_index as i64,
                };
                cursor += 1;
                streak_len = 0;
                streak_max_conf = 0.0;
            }
        } else {
            streak_len = 0;
            streak_max_conf = 0.0;
        }
    }

    let temporal_valid = monotonic(&step_results);

    Ok(TemporalResult {
        step_results,
        temporal_valid,
    })
}

fn monotonic(results: &[StepResult]) -> bool {
    let mut last = -1i64;
    for r in results {
        if r.detected {
            if r.frame_idx <= last {
                return false;
            }
            last = r.frame_idx;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GestureSignal;

    fn frame(idx: usize, tag: GestureTag, fired: bool) -> FrameAnalysis {
        FrameAnalysis {
            frame_index: idx,
            face_present: true,
            landmark_confidence: 0.9,
            per_gesture: vec![(
                tag,
                GestureSignal {
                    fired,
                    confidence: if fired { 0.8 } else { 0.0 },
                },
            )],
        }
    }

    #[test]
    fn confirms_on_second_consecutive_fire() {
        let frames = vec![
            frame(0, GestureTag::Blink, false),
            frame(1, GestureTag::Blink, true),
            frame(2, GestureTag::Blink, true),
            frame(3, GestureTag::Blink, false),
            frame(4, GestureTag::Blink, false),
        ];
        let result = analyze(&frames, &[GestureTag::Blink], 5).unwrap();
        assert!(result.step_results[0].detected);
        assert_eq!(result.step_results[0].frame_idx, 2);
        assert!(result.temporal_valid);
    }

    #[test]
    fn single_frame_noise_does_not_confirm() {
        let frames = vec![
            frame(0, GestureTag::Blink, true),
            frame(1, GestureTag::Blink, false),
            frame(2, GestureTag::Blink, false),
            frame(3, GestureTag::Blink, false),
            frame(4, GestureTag::Blink, false),
        ];
        let result = analyze(&frames, &[GestureTag::Blink], 5).unwrap();
        assert!(!result.step_results[0].detected);
        assert_eq!(result.step_results[0].frame_idx, -1);
    }

    #[test]
    fn multi_step_confirms_in_order_and_is_monotonic() {
        let frames = vec![
            frame(0, GestureTag::Blink, true),
            frame(1, GestureTag::Blink, true), // confirms blink at idx 1
            frame(2, GestureTag::Smile, false),
            frame(3, GestureTag::Smile, true),
            frame(4, GestureTag::Smile, true), // confirms smile at idx 4
        ];
        let result = analyze(&frames, &[GestureTag::Blink, GestureTag::Smile], 5).unwrap();
        assert_eq!(result.step_results[0].frame_idx, 1);
        assert_eq!(result.step_results[1].frame_idx, 4);
        assert!(result.temporal_valid);
    }

    #[test]
    fn incomplete_sequence_still_reports_temporal_valid() {
        // Challenge requires turn_right first, but the fixture only ever
        // fires blink: turn_right never confirms, smile never even gets a
        // chance to be checked — this is "incomplete", not "out of order".
        let frames = vec![
            frame(0, GestureTag::Blink, true),
            frame(1, GestureTag::Blink, true),
            frame(2, GestureTag::Blink, true),
            frame(3, GestureTag::Blink, true),
            frame(4, GestureTag::Blink, true),
        ];
        let result = analyze(
            &frames,
            &[GestureTag::TurnRight, GestureTag::Blink, GestureTag::Smile],
            5,
        )
        .unwrap();
        assert!(!result.step_results[0].detected);
        assert!(!result.step_results[1].detected);
        assert!(!result.step_results[2].detected);
        assert!(result.temporal_valid);
    }

    #[test]
    fn too_few_frames_is_rejected_before_matching() {
        let frames = vec![frame(0, GestureTag::Blink, true)];
        let err = analyze(&frames, &[GestureTag::Blink], 5).unwrap_err();
        assert_eq!(err, InputError::TooFewFrames { got: 1, min: 5 });
    }

    #[test]
    fn no_frames_is_rejected() {
        let err = analyze(&[], &[GestureTag::Blink], 5).unwrap_err();
        assert_eq!(err, InputError::NoFrames);
    }
}

//! Scorer — combines step completion, face-presence ratio, and mean
//! landmark confidence into a single liveness score and pass/fail verdict.
//!
//! The 60/20/20 split is deliberate: step completion alone is gameable by
//! extracting a handful of frames that happen to show the right gestures
//! out of a mostly-faceless sequence, so presence and confidence both have
//! to hold up too.

use crate::model::StepResult;

const STEP_WEIGHT: f32 = 60.0;
const PRESENCE_WEIGHT: f32 = 20.0;
const CONFIDENCE_WEIGHT: f32 = 20.0;
const PASS_THRESHOLD: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub liveness_score: f32,
    pub passed: bool,
}

pub fn evaluate(
    step_results: &[StepResult],
    face_detected_count: usize,
    total_frames: usize,
    mean_landmark_confidence: f32,
) -> ScoreResult {
    if total_frames == 0 {
        return ScoreResult {
            liveness_score: 0.0,
            passed: false,
        };
    }

    let detected = step_results.iter().filter(|r| r.detected).count();
    let step_score = (detected as f32 / step_results.len().max(1) as f32) * STEP_WEIGHT;
    let presence_ratio = face_detected_count as f32 / total_frames as f32;
    let presence_score = presence_ratio * PRESENCE_WEIGHT;
    let confidence_score = mean_landmark_confidence.clamp(0.0, 1.0) * CONFIDENCE_WEIGHT;

    let liveness_score = (step_score + presence_score + confidence_score).clamp(0.0, 100.0);

    let all_detected = !step_results.is_empty() && step_results.iter().all(|r| r.detected);
    let presence_floor = (total_frames as f32 * 0.5).ceil() as usize;
    let passed =
        all_detected && face_detected_count >= presence_floor && liveness_score >= PASS_THRESHOLD;

    ScoreResult {
        liveness_score,
        passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GestureTag;

    fn step(detected: bool) -> StepResult {
        StepResult {
            step: GestureTag::Blink,
            detected,
            confidence: if detected { 0.9 } else { 0.0 },
            frame_idx: if detected { 1 } else { -1 },
        }
    }

    #[test]
    fn all_steps_present_faces_and_confidence_passes() {
        let results = vec![step(true), step(true), step(true)];
        let score = evaluate(&results, 20, 20, 0.95);
        assert!(score.passed);
        assert!(score.liveness_score >= 80.0);
    }

    #[test]
    fn missing_one_step_fails_regardless_of_score() {
        let results = vec![step(true), step(true), step(false)];
        let score = evaluate(&results, 20, 20, 1.0);
        assert!(!score.passed);
        assert!(score.liveness_score < 100.0);
    }

    #[test]
    fn low_presence_ratio_fails_even_with_all_steps() {
        let results = vec![step(true), step(true), step(true)];
        // Only 5 of 20 frames had a face: well under the 50% floor.
        let score = evaluate(&results, 5, 20, 0.9);
        assert!(!score.passed);
    }

    #[test]
    fn score_is_always_clamped_to_unit_range() {
        let results = vec![step(true)];
        let score = evaluate(&results, 100, 1, 1.0);
        assert!(score.liveness_score <= 100.0);
    }

    #[test]
    fn zero_frames_never_passes() {
        let score = evaluate(&[], 0, 0, 0.0);
        assert_eq!(score.liveness_score, 0.0);
        assert!(!score.passed);
    }
}

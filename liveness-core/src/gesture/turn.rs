//! Head-turn detector — Nose Offset Ratio.
//!
//! The server treats image-space `+x` as rightward and assumes the raw,
//! non-mirrored capture is what gets submitted; any mirroring for display
//! purposes is the client's problem to undo before sending frames.

use super::{clamp01, FaceLandmarks};
use crate::model::GestureSignal;

const TURN_THRESHOLD: f32 = 0.035;

fn nose_offset_ratio(lm: &FaceLandmarks) -> f32 {
    if lm.face_contour.is_empty() {
        return 0.0;
    }
    let min_x = lm
        .face_contour
        .iter()
        .map(|p| p.0)
        .fold(f32::INFINITY, f32::min);
    let max_x = lm
        .face_contour
        .iter()
        .map(|p| p.0)
        .fold(f32::NEG_INFINITY, f32::max);
    let face_width = max_x - min_x;
    if face_width <= f32::EPSILON {
        return 0.0;
    }
    let face_center_x = lm.face_contour.iter().map(|p| p.0).sum::<f32>() / lm.face_contour.len() as f32;
    (lm.nose_tip.0 - face_center_x) / face_width
}

pub fn detect_turn_right(lm: &FaceLandmarks) -> GestureSignal {
    let r = nose_offset_ratio(lm);
    let fired = r > TURN_THRESHOLD;
    let confidence = clamp01((r.abs() - TURN_THRESHOLD) / TURN_THRESHOLD);
    GestureSignal { fired, confidence }
}

pub fn detect_turn_left(lm: &FaceLandmarks) -> GestureSignal {
    let r = nose_offset_ratio(lm);
    let fired = r < -TURN_THRESHOLD;
    let confidence = clamp01((r.abs() - TURN_THRESHOLD) / TURN_THRESHOLD);
    GestureSignal { fired, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks_with_offset(r: f32) -> FaceLandmarks {
        // face_contour spans x in [0, 1], center at 0.5, width 1.0.
        let nose_x = 0.5 + r;
        FaceLandmarks {
            left_eye: [(0.0, 0.0); 6],
            right_eye: [(0.0, 0.0); 6],
            mouth_vertical: ((0.0, 0.0), (0.0, 0.0)),
            mouth_horizontal: ((0.0, 0.0), (0.0, 0.0)),
            nose_tip: (nose_x, 0.0),
            face_contour: vec![(0.0, 0.0), (1.0, 0.0)],
        }
    }

    #[test]
    fn centered_nose_fires_neither() {
        let lm = landmarks_with_offset(0.0);
        assert!(!detect_turn_left(&lm).fired);
        assert!(!detect_turn_right(&lm).fired);
    }

    #[test]
    fn positive_offset_fires_right_only() {
        let lm = landmarks_with_offset(0.05);
        assert!(detect_turn_right(&lm).fired);
        assert!(!detect_turn_left(&lm).fired);
    }

    #[test]
    fn negative_offset_fires_left_only() {
        let lm = landmarks_with_offset(-0.05);
        assert!(detect_turn_left(&lm).fired);
        assert!(!detect_turn_right(&lm).fired);
    }
}

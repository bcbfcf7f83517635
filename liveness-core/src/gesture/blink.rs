//! Blink detector — Eye Aspect Ratio (EAR).

use super::{clamp01, point_dist, FaceLandmarks};
use crate::model::GestureSignal;

const EAR_THRESHOLD: f32 = 0.21;

fn ear(eye: &[(f32, f32); 6]) -> f32 {
    let [p1, p2, p3, p4, p5, p6] = *eye;
    let vertical = point_dist(p2, p6) + point_dist(p3, p5);
    let horizontal = point_dist(p1, p4);
    if horizontal <= f32::EPSILON {
        return 1.0; // degenerate geometry, never reads as a blink
    }
    vertical / (2.0 * horizontal)
}

pub fn detect_blink(lm: &FaceLandmarks) -> GestureSignal {
    let ear_min = ear(&lm.left_eye).min(ear(&lm.right_eye));
    let fired = ear_min < EAR_THRESHOLD;
    let confidence = clamp01((EAR_THRESHOLD - ear_min) / EAR_THRESHOLD);
    GestureSignal { fired, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye_with_ear(target: f32) -> [(f32, f32); 6] {
        // Horizontal span fixed at 1.0; pick the vertical span so the EAR
        // formula yields `target` exactly.
        let horizontal = 1.0;
        let vertical_each = target * horizontal; // (v + v) / (2*h) == target when v = target*h
        [
            (0.0, 0.5),
            (0.3, 0.5 - vertical_each / 2.0),
            (0.7, 0.5 - vertical_each / 2.0),
            (1.0, 0.5),
            (0.7, 0.5 + vertical_each / 2.0),
            (0.3, 0.5 + vertical_each / 2.0),
        ]
    }

    fn landmarks_with_ear(left: f32, right: f32) -> FaceLandmarks {
        FaceLandmarks {
            left_eye: eye_with_ear(left),
            right_eye: eye_with_ear(right),
            mouth_vertical: ((0.0, 0.0), (0.0, 0.0)),
            mouth_horizontal: ((0.0, 0.0), (0.0, 0.0)),
            nose_tip: (0.0, 0.0),
            face_contour: vec![(0.0, 0.0), (1.0, 0.0)],
        }
    }

    #[test]
    fn baseline_open_eyes_does_not_fire() {
        let lm = landmarks_with_ear(0.30, 0.30);
        let signal = detect_blink(&lm);
        assert!(!signal.fired);
    }

    #[test]
    fn low_ear_fires_with_high_confidence() {
        let lm = landmarks_with_ear(0.18, 0.30);
        let signal = detect_blink(&lm);
        assert!(signal.fired);
        assert!(signal.confidence > 0.0);
    }

    #[test]
    fn no_face_never_fires() {
        let signal = super::detect(crate::model::GestureTag::Blink, None);
        assert_eq!(signal, GestureSignal::ABSENT);
    }
}

//! Smile detector — Mouth Aspect Ratio (MAR).

use super::{clamp01, point_dist, FaceLandmarks};
use crate::model::GestureSignal;

const MAR_THRESHOLD: f32 = 0.55;

fn mar(lm: &FaceLandmarks) -> f32 {
    let (upper, lower) = lm.mouth_vertical;
    let (left, right) = lm.mouth_horizontal;
    let horizontal = point_dist(left, right);
    if horizontal <= f32::EPSILON {
        return 0.0;
    }
    point_dist(upper, lower) / horizontal
}

pub fn detect_smile(lm: &FaceLandmarks) -> GestureSignal {
    let mar = mar(lm);
    let fired = mar > MAR_THRESHOLD;
    let confidence = clamp01((mar - MAR_THRESHOLD) / MAR_THRESHOLD);
    GestureSignal { fired, confidence }
}

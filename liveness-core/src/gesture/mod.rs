//! Pure, per-frame gesture detectors.
//!
//! Each detector is a total function of a single frame's landmarks: given
//! landmarks it returns `(fired, confidence)`; given no face it returns
//! `(false, 0)`. None of them touch time, storage, or any other frame —
//! ordering across frames is the Temporal Analyzer's job, not theirs.

mod blink;
mod smile;
mod turn;

pub use blink::detect_blink;
pub use smile::detect_smile;
pub use turn::{detect_turn_left, detect_turn_right};

use crate::model::{GestureSignal, GestureTag};

/// A single 2-D landmark point in the frame's working resolution.
pub type Point = (f32, f32);

/// The small set of named landmark indices the detectors need, as
/// extracted from a dense face mesh by the landmark adapter. Using named
/// fields here (rather than raw mesh indices) keeps the detectors
/// independent of which underlying mesh topology produced them.
#[derive(Debug, Clone)]
pub struct FaceLandmarks {
    /// Six-point eye contour, left eye, in canonical order p1..p6.
    pub left_eye: [Point; 6],
    /// Six-point eye contour, right eye, in canonical order p1..p6.
    pub right_eye: [Point; 6],
    /// Upper and lower inner-lip points.
    pub mouth_vertical: (Point, Point),
    /// Left and right mouth corners.
    pub mouth_horizontal: (Point, Point),
    pub nose_tip: Point,
    /// Outermost face-contour points, used to derive face center and width.
    pub face_contour: Vec<Point>,
}

fn dist(a: Point, b: Point) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

pub(crate) fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Run every detector enabled for `tags` against a single frame's landmarks.
///
/// Only the gesture tags a challenge actually references need computing;
/// the orchestrator passes the distinct tag set from the challenge's step
/// list so unused detectors are never run.
pub fn analyze_frame(
    landmarks: Option<&FaceLandmarks>,
    tags: &[GestureTag],
) -> Vec<(GestureTag, GestureSignal)> {
    tags.iter()
        .map(|&tag| (tag, detect(tag, landmarks)))
        .collect()
}

fn detect(tag: GestureTag, landmarks: Option<&FaceLandmarks>) -> GestureSignal {
    let Some(lm) = landmarks else {
        return GestureSignal::ABSENT;
    };
    match tag {
        GestureTag::Blink => detect_blink(lm),
        GestureTag::Smile => detect_smile(lm),
        GestureTag::TurnLeft => detect_turn_left(lm),
        GestureTag::TurnRight => detect_turn_right(lm),
        // Optional extensions: recognized by the enum, but this pipeline
        // ships no detector for them yet; they never fire.
        GestureTag::BrowRaise | GestureTag::TongueOut => GestureSignal::ABSENT,
    }
}

pub(crate) use dist as point_dist;

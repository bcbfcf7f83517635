//! Core data types shared across the liveness pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of gestures the pipeline knows how to detect.
///
/// Kept as an enum (rather than the string tags the distilled spec used)
/// so a typo in a challenge definition is a compile error, not a silent
/// no-op detector lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureTag {
    Blink,
    TurnLeft,
    TurnRight,
    Smile,
    /// Disabled by default configuration; recognized but not sampled unless enabled.
    BrowRaise,
    /// Disabled by default configuration; recognized but not sampled unless enabled.
    TongueOut,
}

impl GestureTag {
    pub const ALL: [GestureTag; 6] = [
        GestureTag::Blink,
        GestureTag::TurnLeft,
        GestureTag::TurnRight,
        GestureTag::Smile,
        GestureTag::BrowRaise,
        GestureTag::TongueOut,
    ];

    pub const DEFAULT_ENABLED: [GestureTag; 4] = [
        GestureTag::Blink,
        GestureTag::TurnLeft,
        GestureTag::TurnRight,
        GestureTag::Smile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GestureTag::Blink => "blink",
            GestureTag::TurnLeft => "turn_left",
            GestureTag::TurnRight => "turn_right",
            GestureTag::Smile => "smile",
            GestureTag::BrowRaise => "brow_raise",
            GestureTag::TongueOut => "tongue_out",
        }
    }

    pub fn parse(s: &str) -> Option<GestureTag> {
        GestureTag::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

/// A single detector observation for one gesture on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSignal {
    pub fired: bool,
    pub confidence: f32,
}

impl GestureSignal {
    pub const ABSENT: GestureSignal = GestureSignal {
        fired: false,
        confidence: 0.0,
    };
}

/// Per-frame analysis, ephemeral — never persisted.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub frame_index: usize,
    pub face_present: bool,
    pub landmark_confidence: f32,
    pub per_gesture: Vec<(GestureTag, GestureSignal)>,
}

impl FrameAnalysis {
    pub fn signal_for(&self, tag: GestureTag) -> GestureSignal {
        self.per_gesture
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, s)| *s)
            .unwrap_or(GestureSignal::ABSENT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepResult {
    pub step: GestureTag,
    pub detected: bool,
    pub confidence: f32,
    /// Index of the confirming frame, or -1 if undetected.
    pub frame_idx: i64,
}

/// A persisted, one-shot gesture challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub steps: Vec<GestureTag>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl Challenge {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

/// Result of a successful verification, carrying everything needed to
/// build both the `passed` and `failed` HTTP shapes without optional
/// fields leaking into the core.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    Passed {
        liveness_score: f32,
        step_results: Vec<StepResult>,
        face_detected_count: usize,
        total_frames: usize,
        temporal_valid: bool,
        token: String,
        token_expires_at: DateTime<Utc>,
    },
    Failed {
        liveness_score: f32,
        step_results: Vec<StepResult>,
        face_detected_count: usize,
        total_frames: usize,
        temporal_valid: bool,
    },
}

impl VerifyOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, VerifyOutcome::Passed { .. })
    }

    pub fn liveness_score(&self) -> f32 {
        match self {
            VerifyOutcome::Passed { liveness_score, .. }
            | VerifyOutcome::Failed { liveness_score, .. } => *liveness_score,
        }
    }

    pub fn step_results(&self) -> &[StepResult] {
        match self {
            VerifyOutcome::Passed { step_results, .. }
            | VerifyOutcome::Failed { step_results, .. } => step_results,
        }
    }
}

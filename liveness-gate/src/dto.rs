//! Wire-format request/response shapes for the HTTP surface.
//!
//! Kept separate from `liveness_core::model` so the core's tagged
//! `VerifyOutcome` can stay free of `Option`-laden JSON fields; flattening
//! into the one response shape happens here, at the boundary.

use chrono::{DateTime, Utc};
use liveness_core::{GestureTag, StepResult, VerifyOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub challenge_id: String,
    pub steps: Vec<GestureTag>,
    pub expires_at: DateTime<Utc>,
    pub expires_in_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub challenge_id: String,
    pub frames: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub passed: bool,
    pub liveness_score: f32,
    pub step_results: Vec<StepResult>,
    pub face_detected_count: usize,
    pub total_frames: usize,
    pub temporal_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl From<&VerifyOutcome> for VerifyResponse {
    fn from(outcome: &VerifyOutcome) -> Self {
        match outcome {
            VerifyOutcome::Passed {
                liveness_score,
                step_results,
                face_detected_count,
                total_frames,
                temporal_valid,
                token,
                token_expires_at,
            } => VerifyResponse {
                passed: true,
                liveness_score: *liveness_score,
                step_results: step_results.clone(),
                face_detected_count: *face_detected_count,
                total_frames: *total_frames,
                temporal_valid: *temporal_valid,
                token: Some(token.clone()),
                token_expires_at: Some(*token_expires_at),
            },
            VerifyOutcome::Failed {
                liveness_score,
                step_results,
                face_detected_count,
                total_frames,
                temporal_valid,
            } => VerifyResponse {
                passed: false,
                liveness_score: *liveness_score,
                step_results: step_results.clone(),
                face_detected_count: *face_detected_count,
                total_frames: *total_frames,
                temporal_valid: *temporal_valid,
                token: None,
                token_expires_at: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AttackSimRequest {
    pub frames: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AttackSimResponse {
    pub passed: bool,
    pub liveness_score: f32,
    pub rejection_reason: String,
    pub step_results: Vec<StepResult>,
    pub recommendation: String,
}

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: String,
    pub token_issued_at: DateTime<Utc>,
    pub token_expires_at: DateTime<Utc>,
    pub access_level: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db_recovered: bool,
}

//! Verification Orchestrator — the request-facing surface of the core.
//!
//! Ties the challenge store, frame decoding, landmark extraction, gesture
//! detectors, temporal analyzer, scorer, and token service into the three
//! operations the HTTP layer exposes. `analyze_pipeline` is the one piece
//! shared between `verify` and `attack_sim`: both need "decode frames,
//! extract landmarks, detect gestures, reduce temporally, score", and only
//! differ in what happens before (consuming a real challenge vs. a fixed
//! pseudo-challenge) and after (issuing a token, or never).

use crate::error::ApiError;
use crate::state::AppState;
use futures_util::future::join_all;
use liveness_core::frame::decode;
use liveness_core::gesture::analyze_frame;
use liveness_core::landmarks::{FrameLandmarks, LandmarkExtractor};
use liveness_core::model::{Challenge, FrameAnalysis, GestureTag, StepResult, VerifyOutcome};
use liveness_core::{scorer, temporal};
use std::sync::Arc;

/// The fixed sequence `attack-sim` runs frames against when there is no
/// real challenge behind the request.
pub const ATTACK_SIM_STEPS: [GestureTag; 3] =
    [GestureTag::Blink, GestureTag::TurnRight, GestureTag::Smile];

pub struct PipelineOutcome {
    pub liveness_score: f32,
    pub step_results: Vec<StepResult>,
    pub face_detected_count: usize,
    pub total_frames: usize,
    pub temporal_valid: bool,
    pub passed: bool,
}

pub async fn generate_challenge(state: &AppState) -> Result<Challenge, ApiError> {
    let now = state.clock.now();
    state
        .challenge_store
        .create(
            &state.settings.enabled_gestures,
            state.settings.step_count,
            state.settings.challenge_ttl,
            now,
        )
        .map_err(ApiError::from)
}

pub async fn verify(
    state: &AppState,
    challenge_id: &str,
    frames: &[String],
) -> Result<VerifyOutcome, ApiError> {
    let now = state.clock.now();

    // The challenge is a one-shot nonce, not a retry token: it is consumed
    // before analysis even starts, so a failed verification still burns it.
    let challenge = state.challenge_store.consume(challenge_id, now)?;

    let outcome = tokio::time::timeout(
        state.settings.verify_timeout,
        analyze_pipeline(state, &challenge.steps, frames),
    )
    .await
    .map_err(|_| ApiError::Timeout)??;

    if outcome.passed {
        let now = state.clock.now();
        let (token, record) =
            state
                .token_service
                .issue(&challenge.id, now, state.settings.jwt_expiry)?;
        return Ok(VerifyOutcome::Passed {
            liveness_score: outcome.liveness_score,
            step_results: outcome.step_results,
            face_detected_count: outcome.face_detected_count,
            total_frames: outcome.total_frames,
            temporal_valid: outcome.temporal_valid,
            token,
            token_expires_at: record.expires_at,
        });
    }

    Ok(VerifyOutcome::Failed {
        liveness_score: outcome.liveness_score,
        step_results: outcome.step_results,
        face_detected_count: outcome.face_detected_count,
        total_frames: outcome.total_frames,
        temporal_valid: outcome.temporal_valid,
    })
}

pub struct AttackSimResult {
    pub passed: bool,
    pub liveness_score: f32,
    pub step_results: Vec<StepResult>,
    pub rejection_reason: String,
    pub recommendation: String,
}

/// Runs the same pipeline end to end against caller-supplied frames, with
/// no real challenge and no token ever issued, regardless of outcome.
pub async fn attack_sim(state: &AppState, frames: &[String]) -> Result<AttackSimResult, ApiError> {
    let outcome = analyze_pipeline(state, &ATTACK_SIM_STEPS, frames).await?;

    let rejection_reason = rejection_reason(&outcome);
    let recommendation = recommendation(&outcome);

    Ok(AttackSimResult {
        passed: outcome.passed,
        liveness_score: outcome.liveness_score,
        step_results: outcome.step_results,
        rejection_reason,
        recommendation,
    })
}

async fn analyze_pipeline(
    state: &AppState,
    steps: &[GestureTag],
    raw_frames: &[String],
) -> Result<PipelineOutcome, ApiError> {
    let tags = distinct_tags(steps);
    let (frames, decode_failures) = decode_and_extract(
        state.extractor.clone(),
        raw_frames.to_vec(),
        state.settings.max_frames,
        tags,
    )
    .await;

    let total_frames = frames.len();
    if total_frames > 0 {
        let ratio = decode_failures as f32 / total_frames as f32;
        if ratio > state.settings.max_decode_failure_ratio {
            tracing::warn!(
                decode_failures,
                total_frames,
                ratio,
                "decode-failure ratio crossed the configured threshold; \
                 scoring will reflect the resulting presence gap"
            );
        }
    }

    let temporal_result = temporal::analyze(&frames, steps, state.settings.min_frames)?;

    let face_detected_count = frames.iter().filter(|f| f.face_present).count();
    let confidence_sum: f32 = frames
        .iter()
        .filter(|f| f.face_present)
        .map(|f| f.landmark_confidence)
        .sum();
    let confident_frames = face_detected_count.max(1) as f32;
    let mean_confidence = if face_detected_count == 0 {
        0.0
    } else {
        confidence_sum / confident_frames
    };

    let score = scorer::evaluate(
        &temporal_result.step_results,
        face_detected_count,
        total_frames,
        mean_confidence,
    );

    Ok(PipelineOutcome {
        liveness_score: score.liveness_score,
        step_results: temporal_result.step_results,
        face_detected_count,
        total_frames,
        temporal_valid: temporal_result.temporal_valid,
        passed: score.passed,
    })
}

/// Decode and landmark-extract every frame off the async runtime's worker
/// threads; per-frame work is independent, so it fans out through
/// `spawn_blocking` and is re-sorted by original index before returning —
/// the temporal analyzer needs frames back in submission order.
async fn decode_and_extract(
    extractor: Arc<dyn LandmarkExtractor>,
    frames: Vec<String>,
    max_frames: usize,
    tags: Vec<GestureTag>,
) -> (Vec<FrameAnalysis>, usize) {
    let tasks = frames
        .into_iter()
        .take(max_frames)
        .enumerate()
        .map(|(idx, raw)| {
            let extractor = extractor.clone();
            let tags = tags.clone();
            tokio::task::spawn_blocking(move || decode_and_extract_one(&extractor, &raw, idx, &tags))
        });

    let mut results: Vec<(FrameAnalysis, bool)> = join_all(tasks)
        .await
        .into_iter()
        .filter_map(|joined| joined.ok())
        .collect();
    results.sort_by_key(|(frame, _)| frame.frame_index);

    let decode_failures = results.iter().filter(|(_, decoded_ok)| !decoded_ok).count();
    let frames = results.into_iter().map(|(frame, _)| frame).collect();
    (frames, decode_failures)
}

fn decode_and_extract_one(
    extractor: &dyn LandmarkExtractor,
    raw: &str,
    idx: usize,
    tags: &[GestureTag],
) -> (FrameAnalysis, bool) {
    let decoded = match decode(raw) {
        Ok(frame) => frame,
        Err(_) => {
            return (
                FrameAnalysis {
                    frame_index: idx,
                    face_present: false,
                    landmark_confidence: 0.0,
                    per_gesture: analyze_frame(None, tags),
                },
                false,
            )
        }
    };

    match extractor.analyze(&decoded, idx) {
        FrameLandmarks::Detected { landmarks, confidence } => (
            FrameAnalysis {
                frame_index: idx,
                face_present: true,
                landmark_confidence: confidence,
                per_gesture: analyze_frame(Some(&landmarks), tags),
            },
            true,
        ),
        FrameLandmarks::NoFace => (
            FrameAnalysis {
                frame_index: idx,
                face_present: false,
                landmark_confidence: 0.0,
                per_gesture: analyze_frame(None, tags),
            },
            true,
        ),
    }
}

fn distinct_tags(steps: &[GestureTag]) -> Vec<GestureTag> {
    let mut seen = Vec::with_capacity(steps.len());
    for &tag in steps {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

fn rejection_reason(outcome: &PipelineOutcome) -> String {
    if outcome.passed {
        return "no rejection: all steps confirmed within presence and confidence bounds"
            .to_string();
    }
    if !outcome.temporal_valid {
        return "temporal confirmations were not monotonic".to_string();
    }
    let undetected: Vec<&str> = outcome
        .step_results
        .iter()
        .filter(|r| !r.detected)
        .map(|r| r.step.as_str())
        .collect();
    if !undetected.is_empty() {
        return format!(
            "required gesture(s) never confirmed with a 2-consecutive-frame streak: {}",
            undetected.join(", ")
        );
    }
    if outcome.total_frames > 0 {
        let presence_ratio = outcome.face_detected_count as f32 / outcome.total_frames as f32;
        if presence_ratio < 0.5 {
            return format!(
                "face presence ratio too low: {}/{} frames had a detected face",
                outcome.face_detected_count, outcome.total_frames
            );
        }
    }
    format!(
        "liveness score {:.1} fell below the pass threshold",
        outcome.liveness_score
    )
}

fn recommendation(outcome: &PipelineOutcome) -> String {
    if outcome.passed {
        "no action needed; this input would pass a real verification".to_string()
    } else if outcome.face_detected_count == 0 {
        "submit frames from a live camera feed; no face was ever detected".to_string()
    } else {
        "ensure the prescribed gestures are performed naturally for at least two consecutive frames each".to_string()
    }
}

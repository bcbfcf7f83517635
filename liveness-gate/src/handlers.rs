//! HTTP handlers — thin translation layer between `actix-web` requests and
//! the orchestrator; no domain logic lives here beyond request parsing and
//! response shaping, matching the handler bodies in `vital_pulse_collector`.

use crate::dto::{
    AttackSimRequest, AttackSimResponse, ChallengeResponse, HealthResponse, ProtectedResponse,
    VerifyRequest, VerifyResponse,
};
use crate::error::ApiError;
use crate::orchestrator;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        db_recovered: state.db.was_recovered(),
    })
}

pub async fn challenge(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let challenge = orchestrator::generate_challenge(&state).await?;
    let expires_in_seconds = (challenge.expires_at - state.clock.now()).num_seconds().max(0);

    Ok(HttpResponse::Ok().json(ChallengeResponse {
        challenge_id: challenge.id,
        steps: challenge.steps,
        expires_at: challenge.expires_at,
        expires_in_seconds,
    }))
}

pub async fn verify(
    state: web::Data<AppState>,
    body: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let outcome = orchestrator::verify(&state, &body.challenge_id, &body.frames).await?;
    Ok(HttpResponse::Ok().json(VerifyResponse::from(&outcome)))
}

pub async fn attack_sim(
    state: web::Data<AppState>,
    body: web::Json<AttackSimRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = orchestrator::attack_sim(&state, &body.frames).await?;
    Ok(HttpResponse::Ok().json(AttackSimResponse {
        passed: result.passed,
        liveness_score: result.liveness_score,
        rejection_reason: result.rejection_reason,
        step_results: result.step_results,
        recommendation: result.recommendation,
    }))
}

pub async fn protected(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(&req).ok_or(ApiError::MissingBearerToken)?;
    let now = state.clock.now();
    let record = state.token_service.validate_record(token, now)?;

    Ok(HttpResponse::Ok().json(ProtectedResponse {
        message: "token honored".to_string(),
        user: record.subject,
        token_issued_at: record.issued_at,
        token_expires_at: record.expires_at,
        access_level: "verified".to_string(),
    }))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

//! HTTP-facing error type: translates the core's typed errors into status
//! codes and a small JSON body, following this pack's per-domain-enum
//! aggregation shape (`error_types::PhoenixError`) but implementing
//! `actix_web::ResponseError` directly since this crate owns the HTTP
//! boundary the core does not.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use liveness_core::{ChallengeError, InputError, TokenError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Challenge(#[from] ChallengeError),

    #[error("{0}")]
    Token(#[from] TokenError),

    #[error("{0}")]
    Input(#[from] InputError),

    #[error("verification timed out")]
    Timeout,

    #[error("{0}")]
    Infra(String),

    #[error("missing or malformed Authorization header")]
    MissingBearerToken,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Challenge(ChallengeError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Challenge(ChallengeError::Expired) => StatusCode::GONE,
            ApiError::Challenge(ChallengeError::AlreadyUsed) => StatusCode::GONE,
            ApiError::Challenge(ChallengeError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(TokenError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(
                TokenError::InvalidSignature | TokenError::Expired | TokenError::Revoked
                | TokenError::Unknown,
            ) => StatusCode::UNAUTHORIZED,
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingBearerToken => StatusCode::UNAUTHORIZED,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Infra(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

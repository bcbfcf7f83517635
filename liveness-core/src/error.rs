//! Typed error taxonomy for the liveness pipeline.
//!
//! Mirrors the pack's per-concern-enum-plus-aggregate shape: each
//! component owns a small `thiserror` enum, and the orchestrator-facing
//! error aggregates them with `#[from]`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("challenge not found")]
    NotFound,
    #[error("challenge expired")]
    Expired,
    #[error("challenge already used")]
    AlreadyUsed,
    #[error("challenge store error: {0}")]
    Store(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature invalid")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token revoked")]
    Revoked,
    #[error("token unknown")]
    Unknown,
    #[error("token store error: {0}")]
    Store(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("too few frames: got {got}, need at least {min}")]
    TooFewFrames { got: usize, min: usize },
    #[error("no frames submitted")]
    NoFrames,
}

//! Landmark extraction — the pipeline's one true ML boundary.
//!
//! Everything downstream (gesture detectors, temporal analyzer, scorer)
//! programs against [`FrameLandmarks`] and never touches a tensor or a
//! model file directly, so swapping the concrete extractor never ripples
//! past this module.

mod fixture;
mod onnx;

pub use fixture::FixtureExtractor;
pub use onnx::{OnnxError, OnnxFaceMeshExtractor};

use crate::frame::DecodedFrame;
use crate::gesture::FaceLandmarks;

/// Outcome of running the extractor against one decoded frame.
#[derive(Debug, Clone)]
pub enum FrameLandmarks {
    Detected {
        landmarks: FaceLandmarks,
        confidence: f32,
    },
    NoFace,
}

pub trait LandmarkExtractor: Send + Sync {
    /// `frame_index` is the frame's position in the submitted sequence, not
    /// the order calls happen to arrive in — callers that fan per-frame
    /// work out across tasks (as the orchestrator's `spawn_blocking` pool
    /// does) cannot guarantee calls land in submission order, only that
    /// each call carries its true index.
    fn analyze(&self, frame: &DecodedFrame, frame_index: usize) -> FrameLandmarks;
}

//! A canned-sequence extractor for tests, so the orchestrator and temporal
//! analyzer can be exercised end to end without an ONNX model on disk —
//! the in-process-fake equivalent of the pack's preference for a fake
//! collaborator over a mocked network boundary.
//!
//! Indexed by the `frame_index` each `analyze` call carries, not by call
//! order: the orchestrator fans per-frame extraction out across
//! independently-scheduled tasks, so nothing guarantees `analyze` itself
//! is invoked in submission order. A call-order cursor would silently
//! hand out the wrong scripted entry for a given frame whenever the
//! scheduler happened to interleave calls.

use super::{FrameLandmarks, LandmarkExtractor};
use crate::frame::DecodedFrame;

pub struct FixtureExtractor {
    sequence: Vec<FrameLandmarks>,
}

impl FixtureExtractor {
    pub fn new(sequence: Vec<FrameLandmarks>) -> Self {
        Self { sequence }
    }

    /// Convenience constructor for an extractor that reports no face on
    /// every call, used by tests that only care about presence-ratio
    /// failure paths.
    pub fn always_no_face() -> Self {
        Self::new(vec![FrameLandmarks::NoFace])
    }
}

impl LandmarkExtractor for FixtureExtractor {
    fn analyze(&self, _frame: &DecodedFrame, frame_index: usize) -> FrameLandmarks {
        if self.sequence.is_empty() {
            return FrameLandmarks::NoFace;
        }
        self.sequence[frame_index.min(self.sequence.len() - 1)].clone()
    }
}

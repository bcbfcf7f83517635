//! Liveness verification pipeline: gesture detectors, temporal reduction,
//! scoring, the challenge/token state machine, and the trait boundaries
//! (clock, RNG, landmark extractor) that make the whole thing testable
//! without a camera, a model file, or a wall clock.
//!
//! The HTTP surface, configuration, and process bootstrap live one layer
//! up in `liveness-gate`; this crate only knows about frames, landmarks,
//! challenges and tokens.

pub mod challenge_store;
pub mod clock;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod landmarks;
pub mod model;
pub mod scorer;
pub mod temporal;
pub mod token_service;

pub use challenge_store::ChallengeStore;
pub use clock::{Clock, FixedClock, OsRandom, SecureRng, SeededRng, SystemClock};
pub use error::{ChallengeError, InputError, TokenError};
pub use model::{
    Challenge, FrameAnalysis, GestureSignal, GestureTag, StepResult, TokenRecord, VerifyOutcome,
};
pub use token_service::TokenService;

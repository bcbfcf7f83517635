//! HTTP surface, configuration, and process bootstrap for the liveness
//! verification service. The pipeline itself lives in `liveness_core`;
//! this crate only wires it to `actix-web`, `sled`, and the environment.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod state;
pub mod sweep;

pub use config::Settings;
pub use state::AppState;

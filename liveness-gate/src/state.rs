//! Shared application state, built once at process start and handed to
//! every handler through `web::Data`, mirroring `vital_pulse_collector`'s
//! `AppState` (db handle + per-concern trees + optional external
//! capability) rather than reaching for global statics.

use crate::config::Settings;
use liveness_core::{ChallengeStore, Clock, OsRandom, SecureRng, SystemClock, TokenService};
use liveness_core::landmarks::{FixtureExtractor, LandmarkExtractor, OnnxFaceMeshExtractor};
use std::sync::Arc;

pub struct AppState {
    pub db: sled::Db,
    pub challenge_store: ChallengeStore,
    pub token_service: TokenService,
    pub clock: Arc<dyn Clock>,
    pub extractor: Arc<dyn LandmarkExtractor>,
    pub settings: Settings,
}

impl AppState {
    pub fn bootstrap(settings: Settings) -> Result<Self, std::io::Error> {
        let db = sled::open(&settings.db_path).map_err(std::io::Error::other)?;
        let challenges_tree = db.open_tree("challenges").map_err(std::io::Error::other)?;
        let tokens_tree = db.open_tree("tokens").map_err(std::io::Error::other)?;

        let rng: Arc<dyn SecureRng> = Arc::new(OsRandom);
        let challenge_store = ChallengeStore::new(challenges_tree, rng);
        let token_service = TokenService::new(tokens_tree, settings.jwt_secret.clone());

        let extractor: Arc<dyn LandmarkExtractor> = match &settings.face_mesh_model_path {
            Some(path) => Arc::new(
                OnnxFaceMeshExtractor::load(path).map_err(std::io::Error::other)?,
            ),
            None => {
                tracing::warn!(
                    "LIVENESS_FACE_MESH_MODEL_PATH not set; falling back to the fixture extractor, every frame will report no face"
                );
                Arc::new(FixtureExtractor::always_no_face())
            }
        };

        Ok(Self {
            db,
            challenge_store,
            token_service,
            clock: Arc::new(SystemClock),
            extractor,
            settings,
        })
    }
}

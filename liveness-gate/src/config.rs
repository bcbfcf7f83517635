//! Environment-driven settings, loaded once at process start and carried
//! through `AppState` rather than read ad hoc from handlers.

use liveness_core::GestureTag;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("unknown gesture tag in {key}: {tag}")]
    UnknownGesture { key: String, tag: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub jwt_secret: String,
    pub jwt_expiry: chrono::Duration,
    pub challenge_ttl: chrono::Duration,
    pub challenge_grace: chrono::Duration,
    pub step_count: usize,
    pub min_frames: usize,
    pub max_frames: usize,
    pub enabled_gestures: Vec<GestureTag>,
    pub db_path: String,
    pub bind: String,
    pub cors_origin: String,
    pub face_mesh_model_path: Option<String>,
    pub verify_timeout: Duration,
    pub max_decode_failure_ratio: f32,
    pub sweep_interval: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env_nonempty("LIVENESS_JWT_SECRET").ok_or_else(|| {
                ConfigError::MissingEnv("LIVENESS_JWT_SECRET".to_string())
            })?;

        let jwt_expiry_minutes = env_parse_or("LIVENESS_JWT_EXPIRY_MINUTES", 5u32)?;
        let challenge_expiry_seconds = env_parse_or("LIVENESS_CHALLENGE_EXPIRY_SECONDS", 120u32)?;
        let challenge_grace_seconds = env_parse_or("LIVENESS_CHALLENGE_GRACE_SECONDS", 60u32)?;
        let step_count = env_parse_or("LIVENESS_STEP_COUNT", 3usize)?;
        let min_frames = env_parse_or("LIVENESS_MIN_FRAMES", 5usize)?;
        let max_frames = env_parse_or("LIVENESS_MAX_FRAMES", 30usize)?;

        let enabled_gestures = match env_nonempty("LIVENESS_ENABLED_GESTURES") {
            Some(raw) => parse_gesture_list(&raw)?,
            None => GestureTag::DEFAULT_ENABLED.to_vec(),
        };
        if enabled_gestures.len() < step_count {
            return Err(ConfigError::InvalidValue {
                key: "LIVENESS_ENABLED_GESTURES".to_string(),
                value: format!(
                    "{} enabled gestures, but LIVENESS_STEP_COUNT requires {step_count}",
                    enabled_gestures.len()
                ),
            });
        }

        let db_path =
            env_nonempty("LIVENESS_DB_PATH").unwrap_or_else(|| "liveness_gate.db".to_string());
        let bind = env_nonempty("LIVENESS_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let cors_origin = env_nonempty("LIVENESS_CORS_ORIGIN").unwrap_or_else(|| "*".to_string());
        let face_mesh_model_path = env_nonempty("LIVENESS_FACE_MESH_MODEL_PATH");

        let verify_timeout_seconds = env_parse_or("LIVENESS_VERIFY_TIMEOUT_SECONDS", 10u64)?;
        let max_decode_failure_ratio = env_parse_or("LIVENESS_MAX_DECODE_FAILURE_RATIO", 0.5f32)?;
        let sweep_interval_seconds = env_parse_or("LIVENESS_SWEEP_INTERVAL_SECONDS", 30u64)?;

        Ok(Self {
            jwt_secret,
            jwt_expiry: chrono::Duration::minutes(jwt_expiry_minutes as i64),
            challenge_ttl: chrono::Duration::seconds(challenge_expiry_seconds as i64),
            challenge_grace: chrono::Duration::seconds(challenge_grace_seconds as i64),
            step_count,
            min_frames,
            max_frames,
            enabled_gestures,
            db_path,
            bind,
            cors_origin,
            face_mesh_model_path,
            verify_timeout: Duration::from_secs(verify_timeout_seconds),
            max_decode_failure_ratio,
            sweep_interval: Duration::from_secs(sweep_interval_seconds),
        })
    }
}

fn parse_gesture_list(raw: &str) -> Result<Vec<GestureTag>, ConfigError> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            GestureTag::parse(s).ok_or_else(|| ConfigError::UnknownGesture {
                key: "LIVENESS_ENABLED_GESTURES".to_string(),
                tag: s.to_string(),
            })
        })
        .collect()
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_truthy(key: &str) -> bool {
    env_nonempty(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
        .unwrap_or(false)
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env_nonempty(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

/// Loads a `.env` file the same way the rest of the pack's services do:
/// an explicit override path first, then the nearest ancestor directory
/// that has one, then whatever `dotenvy`'s own discovery finds.
pub fn load_dotenv_best_effort() -> Option<std::path::PathBuf> {
    if let Some(p) = env_nonempty("LIVENESS_DOTENV_PATH") {
        let path = std::path::PathBuf::from(p);
        if path.is_file() {
            let _ = dotenvy::from_path_override(&path);
            return Some(path);
        }
    }

    let mut bases: Vec<std::path::PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        bases.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            bases.push(dir.to_path_buf());
        }
    }

    for base in bases {
        for dir in base.ancestors() {
            let candidate = dir.join(".env");
            if candidate.is_file() {
                let _ = dotenvy::from_path_override(&candidate);
                return Some(candidate);
            }
        }
    }

    dotenvy::dotenv_override().ok();
    None
}

pub fn env_debug_enabled() -> bool {
    env_truthy("LIVENESS_ENV_DEBUG")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_all() {
        for key in [
            "LIVENESS_JWT_SECRET",
            "LIVENESS_JWT_EXPIRY_MINUTES",
            "LIVENESS_CHALLENGE_EXPIRY_SECONDS",
            "LIVENESS_STEP_COUNT",
            "LIVENESS_ENABLED_GESTURES",
            "LIVENESS_MIN_FRAMES",
            "LIVENESS_MAX_FRAMES",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn missing_jwt_secret_refuses_to_start() {
        clear_all();
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(key) if key == "LIVENESS_JWT_SECRET"));
    }

    #[test]
    fn defaults_apply_when_unset() {
        clear_all();
        std::env::set_var("LIVENESS_JWT_SECRET", "test-secret");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.step_count, 3);
        assert_eq!(settings.min_frames, 5);
        assert_eq!(settings.max_frames, 30);
        assert_eq!(settings.enabled_gestures, GestureTag::DEFAULT_ENABLED.to_vec());
        clear_all();
    }

    #[test]
    fn rejects_unknown_gesture_tag() {
        clear_all();
        std::env::set_var("LIVENESS_JWT_SECRET", "test-secret");
        std::env::set_var("LIVENESS_ENABLED_GESTURES", "blink,cartwheel");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGesture { .. }));
        clear_all();
    }

    #[test]
    fn rejects_step_count_above_enabled_gesture_count() {
        clear_all();
        std::env::set_var("LIVENESS_JWT_SECRET", "test-secret");
        std::env::set_var("LIVENESS_ENABLED_GESTURES", "blink,smile");
        std::env::set_var("LIVENESS_STEP_COUNT", "3");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        clear_all();
    }
}

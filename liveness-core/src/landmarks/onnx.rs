//! Production landmark extractor: a face-mesh model served through `ort`.
//!
//! Follows the session-lifecycle shape of the pack's `ort`-based face
//! pipeline — build the `Session` once (graph optimization level 3, CPU
//! execution provider), hold it for the process lifetime, and serialize
//! inference through a mutex, since the bottleneck is the model itself and
//! not lock contention.
//!
//! The model contract: a single input tensor named `input`, NCHW,
//! `[1, 3, 192, 192]`, pixels normalized to `(p - 127.5) / 128.0`. Two
//! outputs: `landmarks`, `[1, 468, 2]` of image-normalized `(x, y)` pairs
//! in `[0, 1]`, and `presence`, `[1, 1]`, a sigmoid face-presence score.
//! Landmark indices follow the common dense face-mesh topology; only the
//! small subset the gesture detectors need is read out.

use super::{FrameLandmarks, LandmarkExtractor};
use crate::frame::DecodedFrame;
use crate::gesture::FaceLandmarks;
use image::imageops::FilterType;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

const INPUT_SIZE: u32 = 192;
const PRESENCE_THRESHOLD: f32 = 0.5;

const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];
const MOUTH_UPPER_LOWER: (usize, usize) = (13, 14);
const MOUTH_CORNERS: (usize, usize) = (61, 291);
const NOSE_TIP: usize = 1;
const FACE_CONTOUR: [usize; 10] = [10, 338, 297, 454, 323, 152, 93, 234, 67, 109];

#[derive(Debug, Error)]
pub enum OnnxError {
    #[error("failed to load face mesh model: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("unexpected output shape: {0}")]
    UnexpectedShape(String),
}

pub struct OnnxFaceMeshExtractor {
    session: Mutex<Session>,
}

impl OnnxFaceMeshExtractor {
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, OnnxError> {
        let session = Session::builder()
            .map_err(|e| OnnxError::ModelLoad(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| OnnxError::ModelLoad(e.to_string()))?
            .commit_from_file(model_path.as_ref())
            .map_err(|e| {
                OnnxError::ModelLoad(format!(
                    "failed to load model from {:?}: {e}",
                    model_path.as_ref()
                ))
            })?;

        tracing::info!(path = ?model_path.as_ref(), "loaded face mesh model");
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn preprocess(frame: &DecodedFrame) -> ([usize; 4], Vec<f32>) {
        let resized = image::imageops::resize(
            &frame.rgb,
            INPUT_SIZE,
            INPUT_SIZE,
            FilterType::Triangle,
        );
        let size = INPUT_SIZE as usize;
        let mut data = Vec::with_capacity(size * size * 3);
        for c in 0..3 {
            for y in 0..INPUT_SIZE {
                for x in 0..INPUT_SIZE {
                    let pixel = resized.get_pixel(x, y);
                    data.push((pixel[c] as f32 - 127.5) / 128.0);
                }
            }
        }
        ([1, 3, size, size], data)
    }

    fn run(&self, frame: &DecodedFrame) -> Result<FrameLandmarks, OnnxError> {
        let input_tensor = Self::preprocess(frame);
        let input_value = Value::from_array(input_tensor)
            .map_err(|e| OnnxError::Inference(format!("failed to build input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| OnnxError::Inference("session mutex poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| OnnxError::Inference(e.to_string()))?;

        let (presence_shape, presence_data) = outputs["presence"]
            .try_extract_tensor::<f32>()
            .map_err(|e| OnnxError::Inference(format!("presence output: {e}")))?;
        if presence_data.is_empty() {
            return Err(OnnxError::UnexpectedShape(format!(
                "presence shape {presence_shape:?}"
            )));
        }
        let confidence = presence_data[0];
        if confidence < PRESENCE_THRESHOLD {
            return Ok(FrameLandmarks::NoFace);
        }

        let (landmark_shape, landmark_data) = outputs["landmarks"]
            .try_extract_tensor::<f32>()
            .map_err(|e| OnnxError::Inference(format!("landmarks output: {e}")))?;
        if landmark_shape.len() != 3 || landmark_shape[2] != 2 {
            return Err(OnnxError::UnexpectedShape(format!("{landmark_shape:?}")));
        }
        let point_count = landmark_shape[1] as usize;
        let point = |idx: usize| -> (f32, f32) {
            (landmark_data[idx * 2], landmark_data[idx * 2 + 1])
        };
        if FACE_CONTOUR.iter().chain(LEFT_EYE.iter()).chain(RIGHT_EYE.iter())
            .chain([MOUTH_UPPER_LOWER.0, MOUTH_UPPER_LOWER.1, MOUTH_CORNERS.0, MOUTH_CORNERS.1, NOSE_TIP].iter())
            .any(|&idx| idx >= point_count)
        {
            return Err(OnnxError::UnexpectedShape(format!(
                "model produced only {point_count} points"
            )));
        }

        let landmarks = FaceLandmarks {
            left_eye: LEFT_EYE.map(point),
            right_eye: RIGHT_EYE.map(point),
            mouth_vertical: (point(MOUTH_UPPER_LOWER.0), point(MOUTH_UPPER_LOWER.1)),
            mouth_horizontal: (point(MOUTH_CORNERS.0), point(MOUTH_CORNERS.1)),
            nose_tip: point(NOSE_TIP),
            face_contour: FACE_CONTOUR.iter().map(|&i| point(i)).collect(),
        };

        Ok(FrameLandmarks::Detected {
            landmarks,
            confidence,
        })
    }
}

impl LandmarkExtractor for OnnxFaceMeshExtractor {
    fn analyze(&self, frame: &DecodedFrame, _frame_index: usize) -> FrameLandmarks {
        match self.run(frame) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "landmark extraction failed, treating frame as faceless");
                FrameLandmarks::NoFace
            }
        }
    }
}

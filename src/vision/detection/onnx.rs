// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime backed text detection model
//!
//! Loads an ONNX export of the stride-4 text detector. The network takes a
//! `[1, H, W, 3]` NHWC tensor and produces two outputs: a `[1, H/4, W/4, 1]`
//! score map followed by a `[1, H/4, W/4, K]` geometry map.

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::DetectionError;
use super::model::{validate_input_shape, DetectionMaps, InputSize, TextDetectionModel};

/// Session construction options
#[derive(Debug, Clone)]
pub struct OnnxSessionOptions {
    /// Try the CUDA execution provider before falling back to CPU
    pub use_cuda: bool,
    /// Intra-op thread count for the CPU provider
    pub intra_threads: usize,
}

impl Default for OnnxSessionOptions {
    fn default() -> Self {
        Self {
            use_cuda: false,
            intra_threads: 4,
        }
    }
}

/// Text detector running on ONNX Runtime
///
/// `Session::run` needs exclusive access, so forward passes through one
/// detector are serialized by `session`'s lock.
pub struct OnnxTextDetector {
    session: Mutex<Session>,
    input_name: String,
    score_output: String,
    geometry_output: String,
    input_size: InputSize,
    model_path: PathBuf,
}

impl std::fmt::Debug for OnnxTextDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxTextDetector")
            .field("input_name", &self.input_name)
            .field("score_output", &self.score_output)
            .field("geometry_output", &self.geometry_output)
            .field("input_size", &self.input_size)
            .field("model_path", &self.model_path)
            .finish_non_exhaustive()
    }
}

impl OnnxTextDetector {
    /// Load the detector from an ONNX file
    ///
    /// # Errors
    /// Returns `DetectionError::ModelLoad` if:
    /// - Model file not found
    /// - ONNX Runtime cannot build a session from it
    /// - The graph has no input or fewer than two outputs
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        input_size: InputSize,
        options: &OnnxSessionOptions,
    ) -> Result<Self, DetectionError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(DetectionError::ModelLoad(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }

        info!("Loading text detection model from {}", model_path.display());

        let session = build_session(model_path, options)
            .map_err(|e| DetectionError::ModelLoad(format!("{:#}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| DetectionError::ModelLoad("model declares no inputs".to_string()))?;

        if session.outputs.len() < 2 {
            return Err(DetectionError::ModelLoad(format!(
                "expected score and geometry outputs, model declares {}",
                session.outputs.len()
            )));
        }
        let score_output = session.outputs[0].name.clone();
        let geometry_output = session.outputs[1].name.clone();

        debug!(
            "Detection model loaded - input: {}, score: {}, geometry: {}",
            input_name, score_output, geometry_output
        );
        if let Some(input) = session.inputs.first() {
            debug!("Detection model input type: {:?}", input.input_type);
        }

        info!(
            "✅ Text detection model ready ({}x{} input)",
            input_size.width, input_size.height
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            score_output,
            geometry_output,
            input_size,
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Names of the score and geometry outputs, in that order
    pub fn output_names(&self) -> (&str, &str) {
        (&self.score_output, &self.geometry_output)
    }
}

fn build_session(model_path: &Path, options: &OnnxSessionOptions) -> Result<Session> {
    if options.use_cuda {
        info!("   Attempting CUDA execution provider...");
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default()
                .build()
                .error_on_failure()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .commit_from_file(model_path);

        match cuda_result {
            Ok(session) => {
                info!("✅ CUDA execution provider initialized");
                return Ok(session);
            }
            Err(e) => {
                warn!("⚠️  CUDA execution provider failed: {}", e);
                warn!("   Falling back to CPU execution provider");
            }
        }
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(options.intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context(format!(
            "Failed to load text detection model from {}",
            model_path.display()
        ))
}

impl TextDetectionModel for OnnxTextDetector {
    fn input_size(&self) -> InputSize {
        self.input_size
    }

    fn infer(&self, input: &Array4<f32>) -> Result<DetectionMaps, DetectionError> {
        validate_input_shape(input, self.input_size)?;

        let input_value = Value::from_array(input.to_owned())
            .map_err(|e| DetectionError::Inference(format!("failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectionError::Inference("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(|e| DetectionError::Inference(e.to_string()))?;

        let score = outputs[self.score_output.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| DetectionError::Inference(format!("failed to extract score map: {}", e)))?;
        let geometry = outputs[self.geometry_output.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| {
                DetectionError::Inference(format!("failed to extract geometry map: {}", e))
            })?;

        debug!(
            "Detection output shapes: score {:?}, geometry {:?}",
            score.shape(),
            geometry.shape()
        );

        DetectionMaps::from_nhwc(score, geometry, self.input_size.output_size())
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Startup loading of the text detection model

use std::sync::Arc;

use crate::vision::detection::{
    ChannelOrder, InputSize, OnnxSessionOptions, OnnxTextDetector, DEFAULT_THRESHOLD,
};
use crate::vision::highlighter::TextHighlighter;

/// Default model artifact location
pub const DEFAULT_MODEL_PATH: &str = "best_text_detector.onnx";

/// Configuration for loading the detector
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Network input size
    pub input_size: InputSize,
    /// Mask threshold
    pub threshold: f32,
    /// Channel order the network was trained with
    pub channel_order: ChannelOrder,
    /// ONNX Runtime session options
    pub session: OnnxSessionOptions,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            input_size: InputSize::default(),
            threshold: DEFAULT_THRESHOLD,
            channel_order: ChannelOrder::default(),
            session: OnnxSessionOptions::default(),
        }
    }
}

/// Holds the process-wide detector, or records why it is missing
///
/// A failed load does not abort startup: the service keeps answering
/// health and info requests and rejects detection requests.
#[derive(Debug, Clone)]
pub struct VisionModelManager {
    highlighter: Option<Arc<TextHighlighter>>,
    model_path: String,
    load_error: Option<String>,
}

impl VisionModelManager {
    /// Load the detector described by `config`
    pub fn load(config: &DetectorConfig) -> Self {
        match OnnxTextDetector::load(&config.model_path, config.input_size, &config.session) {
            Ok(detector) => {
                let highlighter = TextHighlighter::new(Arc::new(detector), &config.model_path)
                    .with_threshold(config.threshold)
                    .with_channel_order(config.channel_order);
                tracing::info!("✅ Text detector initialized from {}", config.model_path);
                Self::with_highlighter(Arc::new(highlighter))
            }
            Err(e) => {
                tracing::error!("❌ Failed to initialize text detector: {}", e);
                Self {
                    highlighter: None,
                    model_path: config.model_path.clone(),
                    load_error: Some(e.to_string()),
                }
            }
        }
    }

    /// Wrap an already-built highlighter
    pub fn with_highlighter(highlighter: Arc<TextHighlighter>) -> Self {
        Self {
            model_path: highlighter.model_path().to_string(),
            highlighter: Some(highlighter),
            load_error: None,
        }
    }

    /// Manager with no model, as after a failed load
    pub fn unloaded(model_path: impl Into<String>) -> Self {
        Self {
            highlighter: None,
            model_path: model_path.into(),
            load_error: None,
        }
    }

    pub fn highlighter(&self) -> Option<Arc<TextHighlighter>> {
        self.highlighter.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.highlighter.is_some()
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }
}

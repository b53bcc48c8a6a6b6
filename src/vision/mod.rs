// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for text highlighting
//!
//! This module provides:
//! - Image decoding/encoding (`image_utils`)
//! - Text region detection with a stride-4 ONNX network (`detection`)
//! - The combined detect-and-highlight pipeline (`highlighter`)
//! - Startup model loading (`model_manager`)

pub mod detection;
pub mod highlighter;
pub mod image_utils;
pub mod model_manager;

pub use detection::{DetectionError, InputSize, TextDetectionModel};
pub use highlighter::{HighlightResult, TextHighlighter};
pub use image_utils::{
    decode_image_bytes, detect_format, encode_png, encode_png_data_uri, ImageError, ImageInfo,
};
pub use model_manager::{DetectorConfig, VisionModelManager, DEFAULT_MODEL_PATH};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text region detection and highlighting
//!
//! Components:
//! - `preprocessing` - Resize and normalize images for the network
//! - `model` - Network input/output types and the `TextDetectionModel` seam
//! - `onnx` - ONNX Runtime implementation of the detector
//! - `overlay` - Score map thresholding and highlight rendering
//! - `error` - Stage-tagged pipeline errors

pub mod error;
pub mod model;
pub mod onnx;
pub mod overlay;
pub mod preprocessing;

pub use error::DetectionError;
pub use model::{
    DetectionMaps, GeometryMap, InputSize, ScoreMap, TextDetectionModel, DEFAULT_INPUT_SIZE,
    OUTPUT_STRIDE,
};
pub use onnx::{OnnxSessionOptions, OnnxTextDetector};
pub use overlay::{
    blend_pixel, render_highlight, BinaryMask, OverlayConfig, RenderedOverlay, DEFAULT_THRESHOLD,
    HIGHLIGHT_ALPHA, HIGHLIGHT_COLOR,
};
pub use preprocessing::{
    preprocess_for_detection, ChannelOrder, PreprocessConfig, PreprocessedImage,
};

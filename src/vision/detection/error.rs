// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stage-tagged errors for the text detection pipeline

use thiserror::Error;

use crate::vision::image_utils::ImageError;

/// Error raised by one stage of the detect-and-highlight pipeline
#[derive(Debug, Error)]
pub enum DetectionError {
    /// The model file is missing, unreadable or not a usable network
    #[error("Failed to load text detection model: {0}")]
    ModelLoad(String),

    /// Uploaded bytes are not a decodable image
    #[error("Could not decode image: {0}")]
    Decode(#[source] ImageError),

    /// A tensor did not have the shape the pipeline expects
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// The forward pass itself failed
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The highlighted image could not be encoded
    #[error("Failed to encode highlighted image: {0}")]
    Encode(#[source] ImageError),
}

impl DetectionError {
    /// Short stage name, used in logs
    pub fn stage(&self) -> &'static str {
        match self {
            DetectionError::ModelLoad(_) => "model_load",
            DetectionError::Decode(_) => "decode",
            DetectionError::Shape(_) => "shape",
            DetectionError::Inference(_) => "inference",
            DetectionError::Encode(_) => "encode",
        }
    }
}

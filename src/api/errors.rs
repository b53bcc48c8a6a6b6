// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::vision::DetectionError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Request-level failures, each mapped to one HTTP status
///
/// The `Display` text is the `error` field of the JSON body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Text detection model not loaded")]
    ModelNotLoaded,
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("No file selected")]
    NoFileSelected,
    #[error("Uploaded file is empty")]
    EmptyFile,
    #[error("Only image files are supported")]
    UnsupportedMediaType,
    #[error("Could not decode image")]
    UndecodableImage(String),
    #[error("File too large. Maximum size is {max_mb}MB.")]
    PayloadTooLarge { max_mb: usize },
    #[error("Not found")]
    NotFound,
    /// Detection ran but a stage failed; reported in the body with 200
    #[error("{0}")]
    PipelineFailed(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Internal server error")]
    Panic,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded
            | ApiError::NoFileSelected
            | ApiError::EmptyFile
            | ApiError::UnsupportedMediaType
            | ApiError::UndecodableImage(_) => StatusCode::BAD_REQUEST,
            ApiError::PipelineFailed(_) => StatusCode::OK,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ModelNotLoaded | ApiError::Internal(_) | ApiError::Panic => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_string())
    }
}

impl From<DetectionError> for ApiError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::Decode(inner) => ApiError::UndecodableImage(inner.to_string()),
            other => ApiError::PipelineFailed(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

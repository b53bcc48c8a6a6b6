// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use super::http_server::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfoResponse {
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_size: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_size: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.vision.is_loaded(),
    })
}

/// GET /model-info
///
/// Always 200; a missing model is reported in the body.
pub async fn model_info_handler(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let response = match state.vision.highlighter() {
        Some(highlighter) => ModelInfoResponse {
            model_loaded: true,
            input_size: Some(highlighter.input_size().as_array()),
            output_size: Some(highlighter.output_size().as_array()),
            model_path: Some(highlighter.model_path().to_string()),
            error: None,
        },
        None => ModelInfoResponse {
            model_loaded: false,
            input_size: None,
            output_size: None,
            model_path: None,
            error: Some("Model not loaded".to_string()),
        },
    };
    Json(response)
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

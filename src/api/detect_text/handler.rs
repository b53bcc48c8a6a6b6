// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detect-text endpoint handler

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, error, info, warn};

use super::response::DetectTextResponse;
use super::upload::{max_upload_mb, read_file_field};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /detect-text - Highlight text regions in an uploaded image
///
/// Accepts `multipart/form-data` with the image in the `file` field and
/// returns the image with text pixels tinted yellow, as a PNG data URI.
///
/// # Errors
/// - 400 Bad Request: missing/empty file, non-image content type, undecodable image
/// - 413 Payload Too Large: body above the upload limit
/// - 200 with `success: false`: a pipeline stage failed after decoding
/// - 500 Internal Server Error: model not loaded, or the detection task died
pub async fn detect_text_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectTextResponse>, ApiError> {
    if declared_length(&headers).is_some_and(|len| len > state.max_upload_bytes) {
        warn!("Rejected upload: declared length above {} bytes", state.max_upload_bytes);
        return Err(ApiError::PayloadTooLarge {
            max_mb: max_upload_mb(state.max_upload_bytes),
        });
    }

    let highlighter = state.vision.highlighter().ok_or_else(|| {
        warn!("Detection requested but model is not loaded");
        ApiError::ModelNotLoaded
    })?;

    let mut multipart = multipart.map_err(|e| {
        warn!("Request is not multipart: {}", e);
        ApiError::NoFileUploaded
    })?;

    let upload = read_file_field(&mut multipart, state.max_upload_bytes).await?;
    if let Err(e) = upload.validate() {
        warn!("Upload rejected: {}", e);
        return Err(e);
    }
    debug!(
        "Received {:?} ({:?}, {} bytes)",
        upload.file_name,
        upload.content_type,
        upload.data.len()
    );

    let data = upload.data;
    let result = tokio::task::spawn_blocking(move || highlighter.highlight_bytes(&data))
        .await
        .map_err(|e| {
            error!("Detection task failed: {}", e);
            if e.is_panic() {
                ApiError::Panic
            } else {
                ApiError::Internal(e.to_string())
            }
        })?
        .map_err(|e| {
            warn!("Detection failed at {} stage: {}", e.stage(), e);
            ApiError::from(e)
        })?;

    info!(
        "Text detection complete: {} text pixels, {}ms",
        result.text_regions_detected, result.processing_time_ms
    );

    Ok(Json(DetectTextResponse::from(result)))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

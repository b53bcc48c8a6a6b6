// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload extraction for /detect-text

use axum::response::IntoResponse;
use axum_extra::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;
use tracing::debug;

use crate::api::errors::ApiError;

/// Name of the form field carrying the image
pub const FILE_FIELD: &str = "file";

/// The `file` part of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name; `None` when the part is a plain form value
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    /// Check the upload before any decoding happens
    ///
    /// Order: name present, name non-empty, image content type, non-empty body.
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.file_name.as_deref() {
            None => return Err(ApiError::NoFileUploaded),
            Some("") => return Err(ApiError::NoFileSelected),
            Some(_) => {}
        }

        let is_image = self
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(ApiError::UnsupportedMediaType);
        }

        if self.data.is_empty() {
            return Err(ApiError::EmptyFile);
        }
        Ok(())
    }
}

/// Pull the `file` field out of the form, skipping every other field
pub async fn read_file_field(
    multipart: &mut Multipart,
    max_upload_bytes: usize,
) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping form field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_upload_bytes))?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    Err(ApiError::NoFileUploaded)
}

/// Map a stream error to 413 when the body limit tripped, 400 otherwise
fn multipart_error(err: MultipartError, max_upload_bytes: usize) -> ApiError {
    let message = err.to_string();
    let status = err.into_response().status();
    if status == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            max_mb: max_upload_mb(max_upload_bytes),
        }
    } else {
        debug!("Malformed multipart body: {}", message);
        ApiError::NoFileUploaded
    }
}

pub fn max_upload_mb(max_upload_bytes: usize) -> usize {
    max_upload_bytes / (1024 * 1024)
}

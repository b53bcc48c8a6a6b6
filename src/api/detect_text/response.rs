// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detect-text response types

use serde::{Deserialize, Serialize};

use crate::vision::HighlightResult;

/// Successful /detect-text response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectTextResponse {
    /// Always `true`; failures use `ErrorResponse`
    pub success: bool,
    /// `data:image/png;base64,...`
    pub highlighted_image: String,
    /// Pixels above threshold in the highlighted image
    pub text_regions_detected: usize,
    pub confidence_threshold: f32,
}

impl From<HighlightResult> for DetectTextResponse {
    fn from(result: HighlightResult) -> Self {
        Self {
            success: true,
            highlighted_image: result.highlighted_image,
            text_regions_detected: result.text_regions_detected,
            confidence_threshold: result.confidence_threshold,
        }
    }
}

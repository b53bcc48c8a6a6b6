// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end detect-and-highlight pipeline

use image::RgbImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::detection::{
    preprocess_for_detection, render_highlight, ChannelOrder, DetectionError, InputSize,
    OverlayConfig, PreprocessConfig, RenderedOverlay, TextDetectionModel,
};
use super::image_utils::{decode_image_bytes, encode_png_data_uri};

/// Outcome of highlighting one image
#[derive(Debug, Clone)]
pub struct HighlightResult {
    /// `data:image/png;base64,...` encoded highlighted image
    pub highlighted_image: String,
    /// Number of pixels above the threshold (not connected regions)
    pub text_regions_detected: usize,
    /// Threshold the mask was cut at
    pub confidence_threshold: f32,
    /// Wall time spent in the pipeline
    pub processing_time_ms: u64,
}

/// Text highlighter
///
/// Owns a shared handle to a loaded detection model and runs
/// preprocess → infer → render → encode for each image. Built once at
/// startup; every method takes `&self`.
pub struct TextHighlighter {
    model: Arc<dyn TextDetectionModel>,
    preprocess: PreprocessConfig,
    overlay: OverlayConfig,
    model_path: String,
}

impl std::fmt::Debug for TextHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextHighlighter")
            .field("preprocess", &self.preprocess)
            .field("overlay", &self.overlay)
            .field("model_path", &self.model_path)
            .finish_non_exhaustive()
    }
}

impl TextHighlighter {
    pub fn new(model: Arc<dyn TextDetectionModel>, model_path: impl Into<String>) -> Self {
        let preprocess = PreprocessConfig {
            input_size: model.input_size(),
            channel_order: ChannelOrder::default(),
        };
        Self {
            model,
            preprocess,
            overlay: OverlayConfig::default(),
            model_path: model_path.into(),
        }
    }

    /// Set the mask threshold (clamped to [0, 1])
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.overlay.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.preprocess.channel_order = order;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.overlay.threshold
    }

    pub fn input_size(&self) -> InputSize {
        self.preprocess.input_size
    }

    pub fn output_size(&self) -> InputSize {
        self.preprocess.input_size.output_size()
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Run detection and render the overlay, without encoding
    pub fn detect(&self, image: &RgbImage) -> Result<RenderedOverlay, DetectionError> {
        let pre = preprocess_for_detection(image, &self.preprocess);
        let maps = self.model.infer(&pre.tensor)?;

        let expected = self.output_size();
        if maps.score.height() != expected.height as usize
            || maps.score.width() != expected.width as usize
        {
            return Err(DetectionError::Shape(format!(
                "score map is {}x{}, expected {}x{}",
                maps.score.height(),
                maps.score.width(),
                expected.height,
                expected.width
            )));
        }
        debug!(
            "Inference produced {}x{} score map, {} geometry channels",
            maps.score.height(),
            maps.score.width(),
            maps.geometry.channels()
        );

        Ok(render_highlight(image, &maps.score, &self.overlay))
    }

    /// Highlight text in a decoded image and encode the result
    pub fn highlight(&self, image: &RgbImage) -> Result<HighlightResult, DetectionError> {
        let start = Instant::now();

        let rendered = self.detect(image)?;
        let highlighted_image =
            encode_png_data_uri(&rendered.image).map_err(DetectionError::Encode)?;

        Ok(HighlightResult {
            highlighted_image,
            text_regions_detected: rendered.text_pixel_count,
            confidence_threshold: self.overlay.threshold,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Decode raw image bytes, then highlight them
    pub fn highlight_bytes(&self, bytes: &[u8]) -> Result<HighlightResult, DetectionError> {
        let (image, info) = decode_image_bytes(bytes).map_err(DetectionError::Decode)?;
        debug!(
            "Decoded image: {}x{}, {} bytes ({:?})",
            info.width, info.height, info.size_bytes, info.format
        );
        self.highlight(&image)
    }
}

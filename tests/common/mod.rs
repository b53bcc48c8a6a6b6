// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures: a deterministic detector, image bytes, multipart bodies

#![allow(dead_code)]

use axum::{body::Body, http::Response};
use image::{ImageFormat, Rgb, RgbImage};
use ndarray::{Array2, Array3, Array4};
use std::io::Cursor;
use std::sync::Arc;
use text_highlight_node::{
    api::AppState,
    vision::{
        detection::{DetectionMaps, GeometryMap, ScoreMap},
        DetectionError, InputSize, TextDetectionModel, TextHighlighter, VisionModelManager,
    },
};

pub const BOUNDARY: &str = "----text-highlight-test-boundary";
pub const FAKE_MODEL_PATH: &str = "fake_text_detector.onnx";

/// Detector that returns a fixed score map regardless of input
pub struct FakeDetector {
    input_size: InputSize,
    score: Array2<f32>,
}

impl FakeDetector {
    /// Score map built cell by cell; `side` is the network input side
    pub fn from_fn(side: u32, f: impl Fn(usize, usize) -> f32) -> Self {
        let input_size = InputSize::square(side);
        let out = input_size.output_size();
        let score = Array2::from_shape_fn((out.height as usize, out.width as usize), |(y, x)| {
            f(y, x)
        });
        Self { input_size, score }
    }

    pub fn uniform(side: u32, value: f32) -> Self {
        Self::from_fn(side, |_, _| value)
    }

    /// Text in the top half of the score map
    pub fn top_half(side: u32) -> Self {
        let rows = (side / 4) as usize;
        Self::from_fn(side, move |y, _| if y < rows / 2 { 0.9 } else { 0.1 })
    }
}

impl TextDetectionModel for FakeDetector {
    fn input_size(&self) -> InputSize {
        self.input_size
    }

    fn infer(&self, input: &Array4<f32>) -> Result<DetectionMaps, DetectionError> {
        let expected = self.input_size.nhwc_shape();
        if input.shape() != expected {
            return Err(DetectionError::Shape(format!(
                "expected {:?}, got {:?}",
                expected,
                input.shape()
            )));
        }
        let (h, w) = self.score.dim();
        Ok(DetectionMaps {
            score: ScoreMap::new(self.score.clone()),
            geometry: GeometryMap::new(Array3::zeros((h, w, 5))),
        })
    }
}

/// Detector whose inference panics
pub struct PanickingDetector;

impl TextDetectionModel for PanickingDetector {
    fn input_size(&self) -> InputSize {
        InputSize::square(32)
    }

    fn infer(&self, _input: &Array4<f32>) -> Result<DetectionMaps, DetectionError> {
        panic!("detector exploded");
    }
}

/// Detector whose inference always fails
pub struct FailingDetector;

impl TextDetectionModel for FailingDetector {
    fn input_size(&self) -> InputSize {
        InputSize::square(32)
    }

    fn infer(&self, _input: &Array4<f32>) -> Result<DetectionMaps, DetectionError> {
        Err(DetectionError::Inference("backend exploded".to_string()))
    }
}

pub fn highlighter(model: impl TextDetectionModel + 'static) -> Arc<TextHighlighter> {
    Arc::new(TextHighlighter::new(Arc::new(model), FAKE_MODEL_PATH))
}

pub fn loaded_state(model: impl TextDetectionModel + 'static) -> AppState {
    AppState::new_for_test(VisionModelManager::with_highlighter(highlighter(model)))
}

pub fn unloaded_state() -> AppState {
    AppState::new_for_test(VisionModelManager::unloaded(FAKE_MODEL_PATH))
}

pub fn solid_image(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .expect("encoding test image");
    buffer.into_inner()
}

pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(&solid_image(width, height, color), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(&solid_image(width, height, color), ImageFormat::Jpeg)
}

/// One part of a multipart/form-data body
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name: "file",
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("reading response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

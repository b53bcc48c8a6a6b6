// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Vision Model Manager tests
//!
//! These tests verify that the VisionModelManager:
//! - Starts degraded instead of failing when the model is missing or corrupt
//! - Reports the model path and failure reason
//! - Hands out the shared highlighter once loaded

use std::io::Write;
use text_highlight_node::vision::{DetectorConfig, VisionModelManager};

use crate::common::{highlighter, FakeDetector, FAKE_MODEL_PATH};

#[test]
fn test_missing_model_is_degraded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best_text_detector.onnx");

    let config = DetectorConfig {
        model_path: path.display().to_string(),
        ..Default::default()
    };
    let manager = VisionModelManager::load(&config);

    assert!(!manager.is_loaded());
    assert!(manager.highlighter().is_none());
    assert_eq!(manager.model_path(), path.display().to_string());
    assert!(manager.load_error().unwrap().contains("not found"));
}

/// Needs ONNX Runtime binaries to attempt the session build
#[test]
#[ignore]
fn test_corrupt_model_is_degraded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"this is not an onnx graph").unwrap();

    let config = DetectorConfig {
        model_path: file.path().display().to_string(),
        ..Default::default()
    };
    let manager = VisionModelManager::load(&config);

    assert!(!manager.is_loaded());
    assert!(manager.load_error().is_some());
}

#[test]
fn test_loaded_manager_shares_highlighter() {
    let manager = VisionModelManager::with_highlighter(highlighter(FakeDetector::uniform(32, 0.0)));

    assert!(manager.is_loaded());
    assert_eq!(manager.model_path(), FAKE_MODEL_PATH);
    assert!(manager.load_error().is_none());

    let first = manager.highlighter().unwrap();
    let second = manager.highlighter().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.output_size().as_array(), [8, 8]);
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model info and fallback route tests

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use text_highlight_node::api::create_app;
use tower::util::ServiceExt;

use crate::common::{body_json, loaded_state, unloaded_state, FakeDetector, FAKE_MODEL_PATH};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_model_info_without_model() {
    let app = create_app(unloaded_state());

    let response = app.oneshot(get("/model-info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"model_loaded": false, "error": "Model not loaded"})
    );
}

#[tokio::test]
async fn test_model_info_reports_sizes() {
    let app = create_app(loaded_state(FakeDetector::uniform(32, 0.0)));

    let response = app.oneshot(get("/model-info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["input_size"], serde_json::json!([32, 32]));
    assert_eq!(json["output_size"], serde_json::json!([8, 8]));
    assert_eq!(json["model_path"], FAKE_MODEL_PATH);
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = create_app(unloaded_state());

    let response = app.oneshot(get("/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"success": false, "error": "Not found"})
    );
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Health endpoint tests
//!
//! GET /health must answer 200 whether or not the model loaded.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use text_highlight_node::api::create_app;
use tower::util::ServiceExt; // for `oneshot`

use crate::common::{body_json, loaded_state, unloaded_state, FakeDetector};

fn health_request() -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_before_model_load() {
    let app = create_app(unloaded_state());

    let response = app.oneshot(health_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn test_health_with_model_loaded() {
    let app = create_app(loaded_state(FakeDetector::uniform(32, 0.0)));

    let response = app.oneshot(health_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"status": "healthy", "model_loaded": true})
    );
}

#[tokio::test]
async fn test_health_rejects_post() {
    let app = create_app(unloaded_state());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    use axum::http::header;
    use text_highlight_node::{api::AppState, vision::VisionModelManager};

    let state = AppState::new(
        VisionModelManager::unloaded("model.onnx"),
        16 * 1024 * 1024,
        vec!["https://third-eye-xi.vercel.app".to_string()],
    );
    let app = create_app(state);

    let allowed = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://third-eye-xi.vercel.app")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://third-eye-xi.vercel.app"
    );

    let other = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(other).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

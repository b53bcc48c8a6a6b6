// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::{any::Any, net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use super::detect_text::detect_text_handler;
use super::errors::ApiError;
use super::handlers::{health_handler, model_info_handler, not_found_handler};
use crate::config::{DEFAULT_CORS_ORIGIN, DEFAULT_MAX_UPLOAD_MB};
use crate::vision::VisionModelManager;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub vision: Arc<VisionModelManager>,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(
        vision: VisionModelManager,
        max_upload_bytes: usize,
        cors_origins: Vec<String>,
    ) -> Self {
        Self {
            vision: Arc::new(vision),
            max_upload_bytes,
            cors_origins,
        }
    }

    /// State with default limits and any CORS origin
    pub fn new_for_test(vision: VisionModelManager) -> Self {
        Self::new(
            vision,
            DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            vec!["*".to_string()],
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            VisionModelManager::unloaded(crate::vision::DEFAULT_MODEL_PATH),
            DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            vec![DEFAULT_CORS_ORIGIN.to_string()],
        )
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors_origins = state.cors_origins.clone();
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/model-info", get(model_info_handler))
        .route("/detect-text", post(detect_text_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .with_state(state);

    with_middleware(router, &cors_origins)
}

/// Wrap a router in CORS, tracing and panic catching
///
/// CORS is outermost so that panic responses still carry CORS headers.
pub fn with_middleware(router: Router, cors_origins: &[String]) -> Router {
    // Router::layer wraps outward, so the last layer added is outermost
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

/// CORS for the configured origins; `*` allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(cors::Any);

    if origins.iter().any(|o| o.trim() == "*") {
        return base.allow_origin(cors::Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);
    ApiError::Panic.into_response()
}

/// Serve until ctrl-c
pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Text highlight API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

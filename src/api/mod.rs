// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect_text;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use detect_text::{detect_text_handler, DetectTextResponse, UploadedFile};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, model_info_handler, HealthResponse, ModelInfoResponse};
pub use http_server::{cors_layer, create_app, start_server, AppState};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text highlight endpoint
//!
//! Provides POST /detect-text for multipart image uploads.

pub mod handler;
pub mod response;
pub mod upload;

pub use handler::detect_text_handler;
pub use response::DetectTextResponse;
pub use upload::{UploadedFile, FILE_FIELD};

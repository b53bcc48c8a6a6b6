// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Text Highlight Node

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-text-highlight-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Public endpoints, for the startup banner
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("GET", "/model-info"),
    ("POST", "/detect-text"),
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Text Highlight Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

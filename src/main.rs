// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use std::env;
use tracing::info;
use text_highlight_node::{
    api::{start_server, AppState},
    config::ServerConfig,
    version,
    vision::VisionModelManager,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Text Highlight Node...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!();
    info!("{}", version::get_version_string());

    let addr = config.listen_addr()?;

    // Load the detector off the async runtime; failure leaves the node degraded
    println!("🧠 Loading text detection model from {}...", config.model_path);
    let detector_config = config.detector_config();
    let vision = tokio::task::spawn_blocking(move || VisionModelManager::load(&detector_config))
        .await
        .context("model loading task failed")?;

    if vision.is_loaded() {
        println!("✅ Text detection model loaded");
    } else {
        println!("⚠️  Model not loaded; /detect-text will return 500 until restarted");
        if let Some(reason) = vision.load_error() {
            println!("   Reason: {}", reason);
        }
    }

    println!("\n🌐 Endpoints on http://{}:", addr);
    for (method, path) in version::ENDPOINTS {
        println!("   {:<5} {}", method, path);
    }
    println!();

    let state = AppState::new(vision, config.max_upload_bytes(), config.cors_origins.clone());
    start_server(addr, state).await
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration
//!
//! Every option can be given as a command-line flag or an environment
//! variable; `.env` files are loaded before parsing.

use clap::Parser;
use std::net::SocketAddr;

use crate::vision::detection::{ChannelOrder, InputSize, OnnxSessionOptions};
use crate::vision::model_manager::{DetectorConfig, DEFAULT_MODEL_PATH};

/// Origin of the hosted frontend
pub const DEFAULT_CORS_ORIGIN: &str = "https://third-eye-xi.vercel.app";

/// Upload cap in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: usize = 16;

/// Text highlight server configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "text-highlight-node")]
#[command(version, about = "HTTP service that highlights text regions in uploaded images", long_about = None)]
pub struct ServerConfig {
    /// Path to the ONNX text detection model
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: String,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Side length of the square network input
    #[arg(long, env = "INPUT_SIZE", default_value_t = 512)]
    pub input_size: u32,

    /// Score above which a pixel is treated as text
    #[arg(long, env = "DETECTION_THRESHOLD", default_value_t = 0.5)]
    pub threshold: f32,

    /// Channel order the model was trained with (bgr or rgb)
    #[arg(long, env = "MODEL_CHANNEL_ORDER", default_value = "bgr")]
    pub channel_order: ChannelOrder,

    /// Maximum request body size in megabytes
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,

    /// Allowed CORS origins, comma separated; `*` allows any origin
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',', default_value = DEFAULT_CORS_ORIGIN)]
    pub cors_origins: Vec<String>,

    /// Try the CUDA execution provider before CPU
    #[arg(long, env = "USE_CUDA", default_value_t = false)]
    pub use_cuda: bool,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl ServerConfig {
    /// Load `.env` (if present) and parse flags and environment
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {}: {}", addr, e))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            model_path: self.model_path.clone(),
            input_size: InputSize::square(self.input_size),
            threshold: self.threshold,
            channel_order: self.channel_order,
            session: OnnxSessionOptions {
                use_cuda: self.use_cuda,
                intra_threads: self.intra_threads,
            },
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Offline highlight and model inspection commands

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::vision::detection::{
    ChannelOrder, InputSize, OnnxSessionOptions, OnnxTextDetector, DEFAULT_THRESHOLD,
};
use crate::vision::{decode_image_bytes, encode_png, TextHighlighter};

#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// ONNX text detection model
    #[arg(long, env = "MODEL_PATH")]
    pub model: PathBuf,

    /// Image to process
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the highlighted PNG
    #[arg(long)]
    pub output: PathBuf,

    /// Score above which a pixel is treated as text
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Network input side length
    #[arg(long, default_value_t = 512)]
    pub input_size: u32,

    /// Channel order the model was trained with (bgr or rgb)
    #[arg(long, default_value = "bgr")]
    pub channel_order: ChannelOrder,

    /// Try the CUDA execution provider before CPU
    #[arg(long)]
    pub use_cuda: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// ONNX text detection model
    #[arg(long, env = "MODEL_PATH")]
    pub model: PathBuf,

    /// Network input side length
    #[arg(long, default_value_t = 512)]
    pub input_size: u32,
}

fn load_detector(path: &Path, input_size: u32, use_cuda: bool) -> Result<OnnxTextDetector> {
    let options = OnnxSessionOptions {
        use_cuda,
        ..Default::default()
    };
    OnnxTextDetector::load(path, InputSize::square(input_size), &options)
        .with_context(|| format!("Failed to load model {}", path.display()))
}

/// Run the full pipeline on one file and write the result as PNG
pub fn highlight_file(args: HighlightArgs) -> Result<()> {
    let start = Instant::now();
    let detector = load_detector(&args.model, args.input_size, args.use_cuda)?;
    let highlighter = TextHighlighter::new(Arc::new(detector), args.model.display().to_string())
        .with_threshold(args.threshold)
        .with_channel_order(args.channel_order);

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let (image, image_info) = decode_image_bytes(&bytes)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    info!(
        "Loaded {}: {}x{} ({:?})",
        args.input.display(),
        image_info.width,
        image_info.height,
        image_info.format
    );

    let rendered = highlighter.detect(&image)?;
    let png = encode_png(&rendered.image)?;
    std::fs::write(&args.output, png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("✅ Highlighted image written to {}", args.output.display());
    println!("   Text pixels: {}", rendered.text_pixel_count);
    println!("   Threshold:   {}", highlighter.threshold());
    println!("   Time:        {}ms", start.elapsed().as_millis());
    Ok(())
}

/// Print the model's tensor names and sizes
pub fn model_info(args: InfoArgs) -> Result<()> {
    let detector = load_detector(&args.model, args.input_size, false)?;
    let (score, geometry) = detector.output_names();
    let input_size = InputSize::square(args.input_size);

    println!("Model:           {}", detector.model_path().display());
    println!("Input tensor:    {}", detector.input_name());
    println!("Score output:    {}", score);
    println!("Geometry output: {}", geometry);
    println!("Input size:      {:?}", input_size.as_array());
    println!("Output size:     {:?}", input_size.output_size().as_array());
    Ok(())
}

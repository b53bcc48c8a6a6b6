// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and encoding for the highlight pipeline
//!
//! Uploaded bytes are sniffed by magic number, decoded with the `image` crate
//! and normalised to 8-bit RGB. Results go back out as PNG inside a
//! `data:image/png;base64,` URI so they can be embedded in a JSON response.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, RgbImage};
use thiserror::Error;

/// Prefix of every encoded highlight result
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Errors raised while decoding or encoding images
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is empty")]
    EmptyData,

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image has zero width or height")]
    ZeroSized,

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Decode raw image bytes (multipart uploads, files read by the CLI)
///
/// The decoded image is always converted to 8-bit RGB; alpha and extra
/// bit depth are dropped.
///
/// # Errors
/// - `EmptyData` for a zero-length buffer
/// - `UnsupportedFormat` when the magic bytes match no known format
/// - `DecodeFailed` when the format is known but the payload is corrupt
/// - `ZeroSized` when the decoder yields an image without pixels
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(RgbImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    // Detect format from magic bytes
    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(ImageError::ZeroSized);
    }

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img.to_rgb8(), info))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// Encode an RGB image as PNG bytes
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode an RGB image as a `data:image/png;base64,...` URI
pub fn encode_png_data_uri(image: &RgbImage) -> Result<String, ImageError> {
    let png = encode_png(image)?;
    Ok(format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(png)))
}

/// Decode a `data:image/png;base64,...` URI back into pixels
pub fn decode_png_data_uri(data_uri: &str) -> Result<RgbImage, ImageError> {
    let payload = data_uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or(ImageError::UnsupportedFormat)?;
    let bytes = STANDARD.decode(payload)?;
    decode_image_bytes(&bytes).map(|(img, _)| img)
}

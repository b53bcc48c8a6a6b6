// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the text detection network

use std::borrow::Cow;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use ndarray::Array4;

use super::model::{InputSize, INPUT_CHANNELS};

/// Channel order the network was trained with
///
/// Decoded images are RGB. The reference model was trained on BGR frames,
/// so BGR is the default and channels are swapped while building the tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Bgr,
    Rgb,
}

impl ChannelOrder {
    /// Index into an RGB pixel for tensor channel `c`
    fn source_channel(self, c: usize) -> usize {
        match self {
            ChannelOrder::Bgr => 2 - c,
            ChannelOrder::Rgb => c,
        }
    }
}

impl FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bgr" => Ok(ChannelOrder::Bgr),
            "rgb" => Ok(ChannelOrder::Rgb),
            other => Err(format!("unknown channel order '{}', expected bgr or rgb", other)),
        }
    }
}

/// Preprocessing parameters
#[derive(Debug, Clone, Default)]
pub struct PreprocessConfig {
    pub input_size: InputSize,
    pub channel_order: ChannelOrder,
}

/// Network-ready tensor plus the size of the image it came from
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    /// `[1, H, W, 3]` tensor with samples in [0.0, 1.0]
    pub tensor: Array4<f32>,
    pub original_width: u32,
    pub original_height: u32,
}

/// Preprocess an image for text detection
///
/// Steps:
/// 1. Resize (bilinear) to the network input size, ignoring aspect ratio
/// 2. Scale samples to [0.0, 1.0]
/// 3. Lay the tensor out as NHWC in the configured channel order
pub fn preprocess_for_detection(image: &RgbImage, config: &PreprocessConfig) -> PreprocessedImage {
    let (original_width, original_height) = image.dimensions();
    let size = config.input_size;

    let resized: Cow<'_, RgbImage> = if image.dimensions() == (size.width, size.height) {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(resize_bilinear(image, size.width, size.height))
    };

    let order = config.channel_order;
    let tensor = Array4::from_shape_fn(
        (1, size.height as usize, size.width as usize, INPUT_CHANNELS),
        |(_, y, x, c)| {
            let pixel = resized.get_pixel(x as u32, y as u32);
            pixel[order.source_channel(c)] as f32 / 255.0
        },
    );

    PreprocessedImage {
        tensor,
        original_width,
        original_height,
    }
}

/// Bilinear resize over the 2x2 neighbourhood of each sample point
///
/// Pixel centres are aligned (`src = (dst + 0.5) * scale - 0.5`) and edges
/// clamp. Unlike a triangle filter this does not widen its support when
/// downscaling, so small text strokes are not smoothed away.
pub fn resize_bilinear(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_width, src_height) = image.dimensions();
    if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
        return RgbImage::new(width, height);
    }

    let xs = sample_points(src_width, width);
    let ys = sample_points(src_height, height);

    RgbImage::from_fn(width, height, |x, y| {
        let (x0, x1, fx) = xs[x as usize];
        let (y0, y1, fy) = ys[y as usize];
        let top_left = image.get_pixel(x0, y0);
        let top_right = image.get_pixel(x1, y0);
        let bottom_left = image.get_pixel(x0, y1);
        let bottom_right = image.get_pixel(x1, y1);

        let mut out = [0u8; 3];
        for (c, sample) in out.iter_mut().enumerate() {
            let top = top_left[c] as f32 * (1.0 - fx) + top_right[c] as f32 * fx;
            let bottom = bottom_left[c] as f32 * (1.0 - fx) + bottom_right[c] as f32 * fx;
            *sample = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
        }
        Rgb(out)
    })
}

/// `(lower, upper, fraction)` source indices for each destination index
fn sample_points(src_len: u32, dst_len: u32) -> Vec<(u32, u32, f32)> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let lower = (pos.floor() as u32).min(last);
            let upper = (lower + 1).min(last);
            let frac = (pos - lower as f32).clamp(0.0, 1.0);
            (lower, upper, frac)
        })
        .collect()
}

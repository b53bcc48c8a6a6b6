// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Score map thresholding and highlight overlay rendering

use image::{Rgb, RgbImage};
use ndarray::{Array2, ArrayView2};

use super::model::ScoreMap;

/// Score above which a pixel counts as text
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Opacity of the highlight color
pub const HIGHLIGHT_ALPHA: f32 = 0.4;

/// Yellow
pub const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// Overlay parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub threshold: f32,
    pub color: Rgb<u8>,
    pub alpha: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            color: HIGHLIGHT_COLOR,
            alpha: HIGHLIGHT_ALPHA,
        }
    }
}

/// Per-pixel text/background decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    data: Array2<bool>,
}

impl BinaryMask {
    /// Mark every score strictly greater than `threshold`
    pub fn from_scores(scores: &ScoreMap, threshold: f32) -> Self {
        Self {
            data: scores.view().mapv(|score| score > threshold),
        }
    }

    pub fn from_array(data: Array2<bool>) -> Self {
        Self { data }
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, y: usize, x: usize) -> bool {
        self.data[[y, x]]
    }

    pub fn view(&self) -> ArrayView2<'_, bool> {
        self.data.view()
    }

    /// Number of pixels marked as text
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&on| on).count()
    }

    /// Nearest-neighbor resize to `height x width`
    ///
    /// Destination pixel `(y, x)` samples source pixel
    /// `(floor(y * src_h / height), floor(x * src_w / width))`.
    pub fn resize_nearest(&self, height: usize, width: usize) -> Self {
        let (src_h, src_w) = self.data.dim();
        if src_h == 0 || src_w == 0 {
            return Self::from_array(Array2::from_elem((height, width), false));
        }

        let rows: Vec<usize> = (0..height).map(|y| (y * src_h / height).min(src_h - 1)).collect();
        let cols: Vec<usize> = (0..width).map(|x| (x * src_w / width).min(src_w - 1)).collect();

        Self::from_array(Array2::from_shape_fn((height, width), |(y, x)| {
            self.data[[rows[y], cols[x]]]
        }))
    }
}

/// Blend one pixel toward `color` with opacity `alpha`
pub fn blend_pixel(original: Rgb<u8>, color: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let mix = |c: u8, o: u8| -> u8 {
        (c as f32 * alpha + o as f32 * (1.0 - alpha))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgb([
        mix(color[0], original[0]),
        mix(color[1], original[1]),
        mix(color[2], original[2]),
    ])
}

/// Highlighted image plus the number of pixels that were highlighted
#[derive(Debug, Clone)]
pub struct RenderedOverlay {
    pub image: RgbImage,
    pub mask: BinaryMask,
    pub text_pixel_count: usize,
}

/// Render the highlight overlay at the original image resolution
///
/// Pixels outside the mask are copied unchanged.
pub fn render_highlight(
    original: &RgbImage,
    scores: &ScoreMap,
    config: &OverlayConfig,
) -> RenderedOverlay {
    let (width, height) = original.dimensions();
    let mask = BinaryMask::from_scores(scores, config.threshold)
        .resize_nearest(height as usize, width as usize);

    let mut image = original.clone();
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        if mask.get(y as usize, x as usize) {
            *pixel = blend_pixel(*pixel, config.color, config.alpha);
        }
    }

    let text_pixel_count = mask.count();
    RenderedOverlay {
        image,
        mask,
        text_pixel_count,
    }
}

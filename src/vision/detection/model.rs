// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model-facing types: network input size, output maps and the inference seam

use ndarray::{s, Array2, Array3, Array4, ArrayView2, ArrayView3, ArrayViewD, Ix4};
use serde::Serialize;

use super::error::DetectionError;

/// Side length of the square input the reference model was trained on
pub const DEFAULT_INPUT_SIZE: u32 = 512;

/// Spatial downsampling factor between network input and output maps
pub const OUTPUT_STRIDE: u32 = 4;

/// Number of color channels fed to the network
pub const INPUT_CHANNELS: usize = 3;

/// Spatial size (height x width) of a tensor plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputSize {
    pub height: u32,
    pub width: u32,
}

impl InputSize {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Size of the score/geometry maps produced for this input size
    pub const fn output_size(&self) -> InputSize {
        InputSize::new(self.height / OUTPUT_STRIDE, self.width / OUTPUT_STRIDE)
    }

    /// `[height, width]`, the order used in the model-info response
    pub fn as_array(&self) -> [u32; 2] {
        [self.height, self.width]
    }

    /// Expected NHWC shape of a single-image input tensor
    pub fn nhwc_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, INPUT_CHANNELS]
    }
}

impl Default for InputSize {
    fn default() -> Self {
        Self::square(DEFAULT_INPUT_SIZE)
    }
}

/// Per-pixel text probability at output resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMap {
    data: Array2<f32>,
}

impl ScoreMap {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }
}

/// Auxiliary box-regression output; shape-checked but not rendered
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryMap {
    data: Array3<f32>,
}

impl GeometryMap {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }
}

/// Both network outputs of one forward pass
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionMaps {
    pub score: ScoreMap,
    pub geometry: GeometryMap,
}

impl DetectionMaps {
    /// Build the maps from raw NHWC output tensors
    ///
    /// The score tensor must be `[1, H', W', C]` (channel 0 is used) and the
    /// geometry tensor `[1, H', W', K]`, where `H' x W'` equals `expected`.
    pub fn from_nhwc(
        score: ArrayViewD<'_, f32>,
        geometry: ArrayViewD<'_, f32>,
        expected: InputSize,
    ) -> Result<Self, DetectionError> {
        let score = as_single_batch_nhwc(score, expected, "score map")?;
        let geometry = as_single_batch_nhwc(geometry, expected, "geometry map")?;

        let score_plane = score.slice(s![0, .., .., 0]).to_owned();
        let geometry_planes = geometry.slice(s![0, .., .., ..]).to_owned();

        Ok(Self {
            score: ScoreMap::new(score_plane),
            geometry: GeometryMap::new(geometry_planes),
        })
    }
}

fn as_single_batch_nhwc<'a>(
    tensor: ArrayViewD<'a, f32>,
    expected: InputSize,
    label: &str,
) -> Result<ndarray::ArrayView4<'a, f32>, DetectionError> {
    let shape = tensor.shape().to_vec();
    let tensor = tensor.into_dimensionality::<Ix4>().map_err(|_| {
        DetectionError::Shape(format!("{} has shape {:?}, expected 4 dimensions", label, shape))
    })?;

    let (batch, height, width, channels) = tensor.dim();
    if batch != 1
        || height != expected.height as usize
        || width != expected.width as usize
        || channels == 0
    {
        return Err(DetectionError::Shape(format!(
            "{} has shape {:?}, expected [1, {}, {}, C]",
            label, shape, expected.height, expected.width
        )));
    }

    Ok(tensor)
}

/// Check that a tensor is a single NHWC image of the given size
pub fn validate_input_shape(input: &Array4<f32>, size: InputSize) -> Result<(), DetectionError> {
    let expected = size.nhwc_shape();
    if input.shape() != expected {
        return Err(DetectionError::Shape(format!(
            "input tensor has shape {:?}, expected {:?}",
            input.shape(),
            expected
        )));
    }
    Ok(())
}

/// A loaded text detection network
///
/// Implementations must be safe to share across request handlers; any
/// backend that is not reentrant serializes its own forward passes.
pub trait TextDetectionModel: Send + Sync {
    /// Spatial size the network expects its input in
    fn input_size(&self) -> InputSize;

    /// Run one forward pass over a `[1, H, W, 3]` tensor
    fn infer(&self, input: &Array4<f32>) -> Result<DetectionMaps, DetectionError>;
}

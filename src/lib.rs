// Copyright (c) 2026 bubblescan-rs contributors
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT
// See LICENSE in the repository root.
use nalgebra::Vector2;
use thiserror::Error;

/// 2D Point in pixel coordinates
pub type Point2i = Vector2<i32>;

/// Bytes per interleaved RGBA sample.
pub const CHANNELS: usize = 4;

/// Zero-copy view over an interleaved RGBA raster.
/// Lets JS canvas memory or native decoder output be analyzed without copying.
///
/// # Fields
/// * `data` - A slice of `width * height * 4` RGBA bytes, row-major.
/// * `width` - The logical width of the frame in pixels.
/// * `height` - The logical height of the frame in pixels.
#[derive(Debug, Clone, Copy)]
pub struct ImageBuffer<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> ImageBuffer<'a> {
    /// Wraps `data` after checking that its length matches the dimensions.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        check_dimensions(data.len(), width, height)?;
        Ok(ImageBuffer {
            data,
            width,
            height,
        })
    }

    /// Byte offset of the red channel of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CHANNELS
    }

    /// First channel of pixel `(x, y)`; the luma value once grayscale.
    #[inline]
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        self.data[self.offset(x, y)]
    }
}

/// Owned RGBA raster produced by a pipeline stage.
///
/// Grayscale stages replicate the luma value across R, G and B so every
/// buffer can be addressed the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PixelBuffer {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        check_dimensions(data.len(), width, height)?;
        Ok(PixelBuffer {
            data,
            width,
            height,
        })
    }

    /// Transparent black buffer of the given size.
    pub fn zeroed(width: u32, height: u32) -> Self {
        PixelBuffer {
            data: vec![0u8; width as usize * height as usize * CHANNELS],
            width,
            height,
        }
    }

    /// Borrowed view for passing into CV operations.
    pub fn as_image(&self) -> ImageBuffer<'_> {
        ImageBuffer {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Copies `rect` out of this buffer into a new buffer of the rectangle's size.
    pub fn crop(&self, rect: &Rect) -> Result<PixelBuffer> {
        if rect.x as u64 + rect.width as u64 > self.width as u64
            || rect.y as u64 + rect.height as u64 > self.height as u64
        {
            return Err(AnalysisError::RegionOutOfBounds {
                rect: *rect,
                width: self.width,
                height: self.height,
            });
        }

        let src_stride = self.width as usize * CHANNELS;
        let row_len = rect.width as usize * CHANNELS;
        let mut data = Vec::with_capacity(row_len * rect.height as usize);
        for y in 0..rect.height as usize {
            let start = (rect.y as usize + y) * src_stride + rect.x as usize * CHANNELS;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }

        Ok(PixelBuffer {
            data,
            width: rect.width,
            height: rect.height,
        })
    }
}

/// Defines a rectangular region of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

fn check_dimensions(len: usize, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::EmptyImage);
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .unwrap_or(usize::MAX);
    if len != expected {
        return Err(AnalysisError::InvalidBuffer {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Possible errors during analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The sample count does not match `width * height * 4`.
    /// `expected` saturates at `usize::MAX` when that product overflows.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("image has zero width or height")]
    EmptyImage,

    #[error("invalid analyzer options: {0}")]
    InvalidOptions(String),

    #[error("rectangle {rect:?} does not fit in a {width}x{height} image")]
    RegionOutOfBounds { rect: Rect, width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

pub mod core;
pub mod cv;
pub mod simd;

#[cfg(feature = "wasm")]
pub mod wasm_bridge;

pub use crate::core::analyzer::{Analysis, Analyzer, AnalyzerOptions};
pub use crate::core::editor::{RegionEditor, ResizeHandle};
pub use crate::core::stats::BubbleStatistics;
pub use crate::cv::circles::{Circle, CircleOptions};
pub use crate::cv::regions::{Region, RegionOptions};

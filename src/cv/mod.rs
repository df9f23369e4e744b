// src/cv/mod.rs

use crate::ImageBuffer;

/// Common trait for the raster stages of the analysis pipeline.
/// Every implementation (Scalar, SIMD) must produce byte-identical output.
///
/// All buffers are interleaved RGBA of identical dimensions; the caller
/// pre-allocates `dst` with the same length as `src.data`.
pub trait ComputerVision {
    /// Converts an RGBA image to luma replicated across R, G and B.
    /// Luma is `0.299R + 0.587G + 0.114B`; alpha is copied unchanged.
    ///
    /// # Arguments
    /// * `src` - The source `ImageBuffer` containing RGBA pixels.
    /// * `dst` - The destination buffer, same length as `src.data`.
    fn grayscale(src: &ImageBuffer, dst: &mut [u8]);

    /// Binarizes a luma image against the mean of a local window.
    ///
    /// A pixel becomes white when `luma > mean - c`, black otherwise; alpha is
    /// forced opaque. The window is `block_size x block_size`, clamped at the
    /// image edges so border pixels average over fewer neighbours.
    ///
    /// # Arguments
    /// * `src` - The grayscale `ImageBuffer`.
    /// * `dst` - The destination buffer.
    /// * `block_size` - Odd side length of the averaging window.
    /// * `c` - Constant subtracted from the local mean.
    fn adaptive_threshold(src: &ImageBuffer, dst: &mut [u8], block_size: usize, c: f64);

    /// Complements each color channel (`255 - v`), leaving alpha untouched.
    ///
    /// # Arguments
    /// * `src` - The source RGBA bytes.
    /// * `dst` - The destination slice, same length as `src`.
    fn invert(src: &[u8], dst: &mut [u8]);

    /// Median filter over a `kernel_size x kernel_size` window, clamped at the
    /// edges. When clamping leaves an even number of samples the upper middle
    /// (`n / 2` after sorting) is taken. Alpha is copied unchanged.
    ///
    /// # Arguments
    /// * `src` - The grayscale `ImageBuffer`.
    /// * `dst` - The destination buffer.
    /// * `kernel_size` - Odd side length of the window.
    fn median_blur(src: &ImageBuffer, dst: &mut [u8], kernel_size: usize);
}

// Submodules for specific CV algorithms
pub mod circles;
pub mod draw;
pub mod regions;
pub mod scalar;

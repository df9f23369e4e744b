// src/cv/scalar.rs
#![allow(clippy::needless_range_loop)]

use crate::cv::ComputerVision;
use crate::{ImageBuffer, CHANNELS};

/// Scalar (non-SIMD) implementation of the raster stages.
pub struct ScalarCV;

/// Summed-area table over the first channel of an RGBA luma image.
/// Stored with a leading zero row and column, so it is `(w + 1) * (h + 1)`.
fn integral_luma(src: &ImageBuffer) -> Vec<u64> {
    let width = src.width as usize;
    let height = src.height as usize;
    let stride = width + 1;
    let mut table = vec![0u64; stride * (height + 1)];

    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += src.luma(x, y) as u64;
            table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
        }
    }

    table
}

impl ComputerVision for ScalarCV {
    fn grayscale(src: &ImageBuffer, dst: &mut [u8]) {
        let src_data = src.data;
        let len = src_data.len();
        let mut i = 0;

        while i + 3 < len {
            let r = src_data[i] as f64;
            let g = src_data[i + 1] as f64;
            let b = src_data[i + 2] as f64;

            // Weighted average: 0.299R + 0.587G + 0.114B, rounded like a clamped byte store
            let gray = (r * 0.299 + g * 0.587 + b * 0.114)
                .round_ties_even()
                .clamp(0.0, 255.0) as u8;
            dst[i] = gray;
            dst[i + 1] = gray;
            dst[i + 2] = gray;
            dst[i + 3] = src_data[i + 3];
            i += CHANNELS;
        }
    }

    fn adaptive_threshold(src: &ImageBuffer, dst: &mut [u8], block_size: usize, c: f64) {
        let width = src.width as usize;
        let height = src.height as usize;
        let half = block_size / 2;
        let stride = width + 1;
        let table = integral_luma(src);

        for y in 0..height {
            // Window rows [y0, y1) after clamping to the image
            let y0 = y.saturating_sub(half);
            let y1 = (y + half + 1).min(height);

            for x in 0..width {
                let x0 = x.saturating_sub(half);
                let x1 = (x + half + 1).min(width);

                let sum = table[y1 * stride + x1] + table[y0 * stride + x0]
                    - table[y0 * stride + x1]
                    - table[y1 * stride + x0];
                let count = ((y1 - y0) * (x1 - x0)) as f64;
                let mean = sum as f64 / count;

                let i = src.offset(x, y);
                let value = if (src.data[i] as f64) > mean - c { 255 } else { 0 };
                dst[i] = value;
                dst[i + 1] = value;
                dst[i + 2] = value;
                dst[i + 3] = 255;
            }
        }
    }

    fn invert(src: &[u8], dst: &mut [u8]) {
        for (s, d) in src
            .chunks_exact(CHANNELS)
            .zip(dst.chunks_exact_mut(CHANNELS))
        {
            d[0] = 255 - s[0];
            d[1] = 255 - s[1];
            d[2] = 255 - s[2];
            d[3] = s[3];
        }
    }

    fn median_blur(src: &ImageBuffer, dst: &mut [u8], kernel_size: usize) {
        let width = src.width as usize;
        let height = src.height as usize;
        let half = kernel_size / 2;
        let mut window: Vec<u8> = Vec::with_capacity(kernel_size * kernel_size);

        for y in 0..height {
            let y0 = y.saturating_sub(half);
            let y1 = (y + half + 1).min(height);

            for x in 0..width {
                let x0 = x.saturating_sub(half);
                let x1 = (x + half + 1).min(width);

                window.clear();
                for ny in y0..y1 {
                    for nx in x0..x1 {
                        window.push(src.luma(nx, ny));
                    }
                }
                window.sort_unstable();
                let median = window[window.len() / 2];

                let i = src.offset(x, y);
                dst[i] = median;
                dst[i + 1] = median;
                dst[i + 2] = median;
                dst[i + 3] = src.data[i + 3];
            }
        }
    }
}

// src/simd/native.rs

use crate::cv::scalar::ScalarCV;
use crate::cv::ComputerVision;
use crate::ImageBuffer;

#[cfg(target_arch = "x86_64")]
use safe_arch::*;

/// XOR mask complementing R, G and B of four RGBA pixels while keeping alpha.
#[cfg(target_arch = "x86_64")]
const INVERT_MASK: [u8; 16] = [
    0xff, 0xff, 0xff, 0x00, 0xff, 0xff, 0xff, 0x00, 0xff, 0xff, 0xff, 0x00, 0xff, 0xff, 0xff, 0x00,
];

/// Native SIMD implementation of the raster stages.
pub struct NativeCV;

impl ComputerVision for NativeCV {
    /// Float luma weights are kept scalar for exact parity with `ScalarCV`.
    fn grayscale(src: &ImageBuffer, dst: &mut [u8]) {
        ScalarCV::grayscale(src, dst)
    }

    /// The local mean comes from a summed-area table, which is a prefix
    /// recurrence; the scalar pass is already memory-bound.
    fn adaptive_threshold(src: &ImageBuffer, dst: &mut [u8], block_size: usize, c: f64) {
        ScalarCV::adaptive_threshold(src, dst, block_size, c)
    }

    /// `255 - v` equals `v ^ 0xff` for bytes, so 16 bytes (4 pixels) are
    /// flipped per SSE2 XOR with alpha lanes masked out.
    fn invert(src: &[u8], dst: &mut [u8]) {
        #[cfg(target_arch = "x86_64")]
        {
            let mask = load_unaligned_m128i(&INVERT_MASK);
            let mut src_chunks = src.chunks_exact(16);
            let mut dst_chunks = dst.chunks_exact_mut(16);

            for (s, d) in (&mut src_chunks).zip(&mut dst_chunks) {
                if let (Ok(s), Ok(d)) = (<&[u8; 16]>::try_from(s), <&mut [u8; 16]>::try_from(d)) {
                    store_unaligned_m128i(d, bitxor_m128i(load_unaligned_m128i(s), mask));
                }
            }

            // Process remaining pixels
            ScalarCV::invert(src_chunks.remainder(), dst_chunks.into_remainder());
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            ScalarCV::invert(src, dst);
        }
    }

    fn median_blur(src: &ImageBuffer, dst: &mut [u8], kernel_size: usize) {
        ScalarCV::median_blur(src, dst, kernel_size)
    }
}

// Copyright (c) 2026 bubblescan-rs contributors
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT
// See LICENSE in the repository root.
// src/simd/mod.rs

/*
 * SIMD dispatcher for the raster stages. The implementation is picked at
 * compile time from the target architecture and the "simd" feature flag;
 * `dispatch::Backend` always names a type implementing `ComputerVision`.
 */

#[cfg(all(not(target_arch = "wasm32"), feature = "simd"))]
pub mod native;

#[cfg(all(not(target_arch = "wasm32"), feature = "simd"))]
pub mod dispatch {
    pub use super::native::NativeCV as Backend;
}

#[cfg(any(target_arch = "wasm32", not(feature = "simd")))]
pub mod dispatch {
    pub use crate::cv::scalar::ScalarCV as Backend;
}

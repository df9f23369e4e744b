// Copyright (c) 2026 bubblescan-rs contributors
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT
// See LICENSE in the repository root.
// src/core/mod.rs
pub mod analyzer;
pub mod editor;
pub mod stats;

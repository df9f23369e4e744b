#![cfg(target_arch = "wasm32")]
#![cfg(feature = "wasm")]

use std::sync::Once;

use crate::core::analyzer::{Analyzer, AnalyzerOptions};
use crate::simd::dispatch::Backend;
use crate::{BubbleStatistics, ImageBuffer, PixelBuffer, Region};
use serde::Serialize;
use wasm_bindgen::prelude::*;

static INIT_LOGGING: Once = Once::new();

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmAnalysis {
    pub regions: Vec<Region>,
    pub bubble_stats: Option<BubbleStatistics>,
}

/// JS-facing analyzer
#[wasm_bindgen]
pub struct FrameAnalyzer {
    analyzer: Analyzer<Backend>,
    annotated: Option<PixelBuffer>,
}

#[wasm_bindgen]
impl FrameAnalyzer {
    /// `options` is an optional plain object; missing fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<FrameAnalyzer, JsValue> {
        INIT_LOGGING.call_once(|| {
            console_error_panic_hook::set_once();
            if let Err(err) = console_log::init_with_level(log::Level::Info) {
                console_warn(&err.to_string());
            }
        });

        let options: AnalyzerOptions = if options.is_undefined() || options.is_null() {
            AnalyzerOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from_str(&format!("invalid options: {}", e)))?
        };

        let analyzer = Analyzer::new(Backend, options).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(FrameAnalyzer {
            analyzer,
            annotated: None,
        })
    }

    /// Runs the full pipeline over canvas `ImageData` bytes.
    /// Returns `{ regions, bubbleStats }`; the overlay is kept for `annotated()`.
    pub fn analyze(&mut self, width: u32, height: u32, image_data: &[u8]) -> Result<JsValue, JsValue> {
        let buffer = ImageBuffer {
            data: image_data,
            width,
            height,
        };

        let analysis = self
            .analyzer
            .analyze(&buffer)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.annotated = Some(analysis.annotated);

        let result = WasmAnalysis {
            regions: analysis.regions,
            bubble_stats: analysis.bubble_stats,
        };
        serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// RGBA bytes of the last annotated image, if any analysis ran.
    pub fn annotated(&self) -> Option<Vec<u8>> {
        self.annotated.as_ref().map(|buffer| buffer.data.clone())
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(message: &str);
}

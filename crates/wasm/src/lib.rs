//! WASM bindings for PPTX slide extraction.
//!
//! A host canvas plugin hands the raw package bytes over once, asks for the
//! normalized slide list, then pulls image bytes lazily while laying slides
//! out.

use serde::{Deserialize, Serialize};
use slides_core::{ExtractOptions, ExtractionWarning, ImageFormat, Slide};
use slides_pptx::{Package, PptxParser};
use std::io::Cursor;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of extracting a presentation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Number of slides that were extracted.
    pub slide_count: usize,
    /// Slides in ordinal order.
    pub slides: Vec<Slide>,
    /// Slides, parts and images that were skipped.
    pub warnings: Vec<ExtractionWarning>,
}

/// An opened presentation package kept alive on the JS side.
#[wasm_bindgen]
pub struct SlidePackage {
    package: Package<Cursor<Vec<u8>>>,
}

#[wasm_bindgen]
impl SlidePackage {
    /// Open a package from its raw bytes.
    #[wasm_bindgen(constructor)]
    pub fn new(data: Vec<u8>) -> Result<SlidePackage, JsValue> {
        let package = Package::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(SlidePackage { package })
    }

    /// Extract all slides. `options` may be omitted for the defaults.
    pub fn slides(&mut self, options: JsValue) -> Result<JsValue, JsValue> {
        let options = options_from_js(options)?;
        let result = slides_impl(&mut self.package, options);
        to_js(&result)
    }

    /// Raw bytes of an image referenced by a slide.
    #[wasm_bindgen(js_name = imageBytes)]
    pub fn image_bytes(&mut self, path: &str) -> Result<js_sys::Uint8Array, JsValue> {
        let (_, bytes) = self
            .package
            .read_image(path)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(js_sys::Uint8Array::from(bytes.as_slice()))
    }

    /// MIME type of an image path, or an error for unsupported formats.
    #[wasm_bindgen(js_name = imageMimeType)]
    pub fn image_mime_type(&self, path: &str) -> Result<String, JsValue> {
        mime_type_impl(path).map_err(|e| JsValue::from_str(&e))
    }
}

/// Extract all slides from package bytes in one call.
#[wasm_bindgen]
pub fn extract_slides(data: &[u8], options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;
    let result = extract_slides_impl(data, options).map_err(|e| JsValue::from_str(&e))?;
    to_js(&result)
}

fn extract_slides_impl(data: &[u8], options: ExtractOptions) -> Result<ExtractionResult, String> {
    let mut package =
        Package::from_bytes(data.to_vec()).map_err(|e| format!("PPTX parsing error: {}", e))?;
    Ok(slides_impl(&mut package, options))
}

fn slides_impl(package: &mut Package<Cursor<Vec<u8>>>, options: ExtractOptions) -> ExtractionResult {
    let extraction = PptxParser::new()
        .with_options(options)
        .parse_package(package);

    ExtractionResult {
        slide_count: extraction.slides.len(),
        slides: extraction.slides,
        warnings: extraction.warnings,
    }
}

fn mime_type_impl(path: &str) -> Result<String, String> {
    ImageFormat::from_path(path)
        .map(|format| format.mime_type().to_string())
        .ok_or_else(|| format!("Unsupported image type: {}", path))
}

fn options_from_js(options: JsValue) -> Result<ExtractOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ExtractOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

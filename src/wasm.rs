//! WebAssembly exports for the effects.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and work on
//! flat RGBA byte arrays (length = width * height * 4).

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::error::EffectError;
use crate::filters;

fn to_js_err(err: EffectError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// Blur
// ============================================================================

/// Apply Gaussian blur to RGBA bytes.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `sigma` - Standard deviation of the Gaussian
///
/// # Returns
/// Flat array of blurred RGBA bytes
#[wasm_bindgen]
pub fn gaussian_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    sigma: f64,
) -> Result<Vec<u8>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, data.to_vec()).map_err(to_js_err)?;
    Ok(filters::gaussian_blur(&input, sigma).into_raw())
}

/// Apply stack blur to RGBA bytes.
///
/// Fails for a negative radius or one above the supported maximum.
#[wasm_bindgen]
pub fn stack_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: i32,
) -> Result<Vec<u8>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, data.to_vec()).map_err(to_js_err)?;
    let result = filters::stack_blur(&input, radius as i64).map_err(to_js_err)?;
    Ok(result.into_raw())
}

// ============================================================================
// Sharpen
// ============================================================================

/// Apply unsharp-mask sharpening to RGBA bytes.
#[wasm_bindgen]
pub fn sharpen_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    sigma: f64,
) -> Result<Vec<u8>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, data.to_vec()).map_err(to_js_err)?;
    Ok(filters::sharpen(&input, sigma).into_raw())
}

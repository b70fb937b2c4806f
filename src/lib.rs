//! Stag Effects
//!
//! Convolution effects for RGBA8 images, with optional Python bindings via
//! PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Every effect works on a [`PixelBuffer`]: `(height, width, 4)` straight
//! (non-premultiplied) RGBA, 8 bits per channel. Alpha is filtered like any
//! other channel.
//!
//! ## Effects
//! - [`gaussian_blur`] - separable Gaussian blur, sigma in pixels
//! - [`stack_blur`] - O(1)-per-pixel triangular blur, integer radius
//! - [`sharpen`] - unsharp mask over a capped Gaussian
//!
//! Zero sigma or radius returns an unchanged copy. Effects never modify
//! their input and always return a buffer anchored at `(0, 0)`.
//!
//! ## Chaining
//! [`Chain`] runs effects one after another, stops at the first failure
//! and hands the result to a caller-supplied [`ImageEncoder`].

pub mod buffer;
pub mod chain;
pub mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::PixelBuffer;
pub use chain::{Chain, ImageEncoder};
pub use error::{EffectError, EffectResult};
pub use filters::{gaussian_blur, sharpen, stack_blur, Kernel, StackRadius};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::PixelBuffer;
    use crate::error::EffectError;
    use crate::filters;

    fn to_py_err(err: EffectError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn to_buffer(image: PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        PixelBuffer::from_array(image.as_array().to_owned()).map_err(to_py_err)
    }

    // ========================================================================
    // Blur
    // ========================================================================

    /// Apply Gaussian blur to an RGBA u8 image of shape (height, width, 4).
    ///
    /// Color is weighted by alpha; alpha is blurred with the plain kernel.
    #[pyfunction]
    #[pyo3(signature = (image, sigma=1.0))]
    pub fn gaussian_blur_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_buffer(image)?;
        let result = filters::gaussian_blur(&input, sigma);
        Ok(result.into_array().into_pyarray(py))
    }

    /// Apply stack blur to an RGBA u8 image.
    ///
    /// Raises ValueError for a negative or oversized radius.
    #[pyfunction]
    #[pyo3(signature = (image, radius=1))]
    pub fn stack_blur_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: i64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_buffer(image)?;
        let result = filters::stack_blur(&input, radius).map_err(to_py_err)?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Sharpen
    // ========================================================================

    /// Apply unsharp-mask sharpening to an RGBA u8 image.
    #[pyfunction]
    #[pyo3(signature = (image, sigma=1.0))]
    pub fn sharpen_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_buffer(image)?;
        let result = filters::sharpen(&input, sigma);
        Ok(result.into_array().into_pyarray(py))
    }

    #[pymodule]
    pub fn stag_effects(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(gaussian_blur_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(stack_blur_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen_rgba, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::stag_effects;

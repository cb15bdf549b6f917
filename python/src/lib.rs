//! blosc-python
//!
//! Python bindings for blosc-core (PyO3).

use pyo3::prelude::*;

mod error;
mod ffi;

/// Python module entry point
#[pymodule]
fn blosc_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    ffi::register(m.py(), m)?;
    Ok(())
}

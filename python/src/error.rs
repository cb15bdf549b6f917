//! Error mapping for the Python bindings.

use blosc_core::types::{BloscError, ErrorKind};
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyTypeError, PyValueError};
use pyo3::PyErr;

// Exposed to Python as `blosc_rs.error`.
create_exception!(blosc_rs, BloscPyError, PyException);

/// Range -> ValueError, type mismatch -> TypeError, everything else -> `error`.
pub fn to_py_err(err: BloscError) -> PyErr {
    let msg = err.to_string();
    match err.kind() {
        ErrorKind::Range => PyValueError::new_err(msg),
        ErrorKind::TypeMismatch => PyTypeError::new_err(msg),
        ErrorKind::Format | ErrorKind::Engine => BloscPyError::new_err(msg),
    }
}

pub trait IntoPyResult<T> {
    fn into_py_result(self) -> Result<T, PyErr>;
}

impl<T> IntoPyResult<T> for Result<T, BloscError> {
    fn into_py_result(self) -> Result<T, PyErr> {
        self.map_err(to_py_err)
    }
}

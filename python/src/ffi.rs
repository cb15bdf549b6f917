//! Python-facing functions.
//!
//! Dynamic checks (is this object an integer, does it look like an array)
//! happen here; everything numeric is validated in blosc-core.

use std::borrow::Cow;
use std::sync::OnceLock;

use pyo3::prelude::*;
use pyo3::pybacked::PyBackedBytes;
use pyo3::types::{PyBool, PyByteArray, PyBytes, PyDict, PyFloat, PyLong, PySequence, PyString, PyTuple};

use blosc_core::array::{Array, ArrayLike, ByteOrder, ElementKind, MemoryOrder};
use blosc_core::compression::{self, CompressionCodec};
use blosc_core::constants::{shuffle_ids, MAX_BUFFER_SIZE, MAX_THREADS, MAX_TYPESIZE, VERSION_STRING};
use blosc_core::headers::Shuffle;
use blosc_core::prelude::{Blosc, CompressOptions};
use blosc_core::types::{BloscError, Result as CoreResult};
use blosc_core::utils::detect_number_of_cores;
use blosc_core::validation::{validate_address_type, validate_count, AddressArg};

use crate::error::{BloscPyError, IntoPyResult};

static BLOSC: OnceLock<Blosc> = OnceLock::new();

fn blosc() -> &'static Blosc {
    BLOSC.get_or_init(|| match Blosc::from_env() {
        Ok(b) => b,
        Err(e) => {
            log::warn!("ignoring BLOSC_* environment: {e}");
            Blosc::new()
        }
    })
}

/// Run an engine call, releasing the GIL when the policy says so.
fn run<T, F>(py: Python<'_>, f: F) -> PyResult<T>
where
    T: Send,
    F: FnOnce() -> CoreResult<T> + Send,
{
    let result = if blosc().releasegil() { py.allow_threads(f) } else { f() };
    result.into_py_result()
}

fn compress_options(clevel: i32, shuffle: u8, cname: Option<&str>) -> PyResult<CompressOptions> {
    let shuffle = Shuffle::verify(shuffle)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    let mut opts = CompressOptions::default().with_clevel(clevel).with_shuffle(shuffle);
    if let Some(name) = cname {
        let codec = CompressionCodec::from_name(name).map_err(BloscError::from).into_py_result()?;
        opts = opts.with_compressor(codec);
    }
    Ok(opts)
}

fn typesize_arg(typesize: i64) -> PyResult<usize> {
    validate_count(typesize, "typesize").into_py_result()
}

fn address_arg(obj: &Bound<'_, PyAny>) -> AddressArg {
    if obj.is_instance_of::<PyBool>() {
        AddressArg::Other("bool".to_string())
    } else if obj.is_instance_of::<PyLong>() {
        match obj.extract::<i128>() {
            Ok(v) => AddressArg::Integer(v),
            Err(_) => AddressArg::Other("int wider than 128 bits".to_string()),
        }
    } else if obj.is_instance_of::<PyFloat>() {
        AddressArg::Float(obj.extract::<f64>().unwrap_or(f64::NAN))
    } else if obj.is_instance_of::<PyString>() {
        AddressArg::Text(obj.to_string())
    } else if let Ok(seq) = obj.downcast::<PySequence>() {
        AddressArg::Sequence(seq.len().unwrap_or(0))
    } else {
        let name = obj
            .get_type()
            .name()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "object".to_string());
        AddressArg::Other(name)
    }
}

// ---------------------------------------------------------------------------
// Buffer codec
// ---------------------------------------------------------------------------

#[pyfunction]
#[pyo3(signature = (bytesobj, typesize, clevel=9, shuffle=1, cname=None))]
fn compress(
    py: Python<'_>,
    bytesobj: PyBackedBytes,
    typesize: i64,
    clevel: i32,
    shuffle: u8,
    cname: Option<&str>,
) -> PyResult<Py<PyBytes>> {
    let typesize = typesize_arg(typesize)?;
    let opts = compress_options(clevel, shuffle, cname)?;
    let src: &[u8] = &bytesobj;
    let frame = run(py, || blosc().compress(src, typesize, &opts))?;
    Ok(PyBytes::new_bound(py, &frame).unbind())
}

#[pyfunction]
#[pyo3(signature = (bytesobj, as_bytearray=false))]
fn decompress(py: Python<'_>, bytesobj: PyBackedBytes, as_bytearray: bool) -> PyResult<PyObject> {
    let frame: &[u8] = &bytesobj;
    let out = run(py, || blosc().decompress(frame))?;
    if as_bytearray {
        Ok(PyByteArray::new_bound(py, &out).into_any().unbind())
    } else {
        Ok(PyBytes::new_bound(py, &out).into_any().unbind())
    }
}

// ---------------------------------------------------------------------------
// Pointer codec
// ---------------------------------------------------------------------------

#[pyfunction]
#[pyo3(signature = (address, items, typesize, clevel=9, shuffle=1, cname=None))]
fn compress_ptr(
    py: Python<'_>,
    address: &Bound<'_, PyAny>,
    items: i64,
    typesize: i64,
    clevel: i32,
    shuffle: u8,
    cname: Option<&str>,
) -> PyResult<Py<PyBytes>> {
    let address = validate_address_type(&address_arg(address)).into_py_result()?;
    let typesize = typesize_arg(typesize)?;
    let opts = compress_options(clevel, shuffle, cname)?;
    // SAFETY: the caller promises `items * typesize` readable bytes at `address`.
    let frame = run(py, || unsafe { blosc().compress_ptr(address, items, typesize, &opts) })?;
    Ok(PyBytes::new_bound(py, &frame).unbind())
}

#[pyfunction]
fn decompress_ptr(py: Python<'_>, bytesobj: PyBackedBytes, address: &Bound<'_, PyAny>) -> PyResult<usize> {
    let address = validate_address_type(&address_arg(address)).into_py_result()?;
    let frame: &[u8] = &bytesobj;
    // SAFETY: the caller promises room for the frame's `nbytes` at `address`.
    run(py, || unsafe { blosc().decompress_ptr(frame, address) })
}

// ---------------------------------------------------------------------------
// Array packing
// ---------------------------------------------------------------------------

/// Borrowed view of a numpy array's metadata and bytes.
struct NumpyView<'a> {
    kind: ElementKind,
    byte_order: ByteOrder,
    memory_order: MemoryOrder,
    shape: Vec<usize>,
    data: &'a [u8],
}

impl ArrayLike for NumpyView<'_> {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn memory_order(&self) -> MemoryOrder {
        self.memory_order
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn as_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.data)
    }
}

fn array_flag(array: &Bound<'_, PyAny>, name: &str) -> PyResult<bool> {
    array.getattr("flags")?.get_item(name)?.extract()
}

#[pyfunction]
#[pyo3(signature = (array, clevel=9, shuffle=1, cname=None))]
fn pack_array(
    py: Python<'_>,
    array: &Bound<'_, PyAny>,
    clevel: i32,
    shuffle: u8,
    cname: Option<&str>,
) -> PyResult<Py<PyBytes>> {
    if !(array.hasattr("dtype")? && array.hasattr("shape")?) {
        return Err(pyo3::exceptions::PyTypeError::new_err(
            "only NumPy ndarrays objects supported as input",
        ));
    }
    let descr: String = array.getattr("dtype")?.getattr("str")?.extract()?;
    let (kind, byte_order) = ElementKind::from_descr(&descr).into_py_result()?;
    let shape: Vec<usize> = array.getattr("shape")?.extract()?;

    let memory_order = MemoryOrder::from_contiguity(
        array_flag(array, "C_CONTIGUOUS")?,
        array_flag(array, "F_CONTIGUOUS")?,
    );

    // Strided arrays are copied out in C order by numpy itself.
    let kwargs = PyDict::new_bound(py);
    kwargs.set_item("order", memory_order.numpy_code())?;
    let raw: PyBackedBytes = array.call_method("tobytes", (), Some(&kwargs))?.extract()?;

    let view = NumpyView { kind, byte_order, memory_order, shape, data: &raw };
    let opts = compress_options(clevel, shuffle, cname)?;
    let packed = run(py, || blosc().pack_array(&view, &opts))?;
    Ok(PyBytes::new_bound(py, &packed).unbind())
}

fn array_to_numpy(py: Python<'_>, array: Array) -> PyResult<PyObject> {
    let numpy = py.import_bound("numpy")?;
    let descr = array.descr();
    let shape = PyTuple::new_bound(py, array.shape().iter().copied());
    let order = array.memory_order().numpy_code();

    let buffer = PyByteArray::new_bound(py, array.data());
    let flat = numpy.call_method1("frombuffer", (buffer, descr))?;
    let kwargs = PyDict::new_bound(py);
    kwargs.set_item("order", order)?;
    Ok(flat.call_method("reshape", (shape,), Some(&kwargs))?.unbind())
}

#[pyfunction]
fn unpack_array(py: Python<'_>, packed_array: PyBackedBytes) -> PyResult<PyObject> {
    let packed: &[u8] = &packed_array;
    let array = run(py, || blosc().unpack_array(packed))?;
    array_to_numpy(py, array)
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[pyfunction]
fn set_nthreads(nthreads: i64) -> PyResult<usize> {
    let n = validate_count(nthreads, "nthreads").into_py_result()?;
    blosc().set_nthreads(n).into_py_result()
}

#[pyfunction]
fn set_blocksize(blocksize: i64) -> PyResult<()> {
    let n = validate_count(blocksize, "blocksize").into_py_result()?;
    blosc().set_blocksize(n).map(|_| ()).into_py_result()
}

#[pyfunction]
fn get_blocksize() -> usize {
    blosc().blocksize()
}

#[pyfunction]
fn set_releasegil(gilstate: bool) -> bool {
    blosc().set_releasegil(gilstate)
}

#[pyfunction]
fn free_resources() {
    blosc().free_resources();
}

#[pyfunction]
fn init() {
    blosc().init();
}

#[pyfunction]
fn destroy() {
    blosc().destroy();
}

#[pyfunction]
#[pyo3(name = "detect_number_of_cores")]
fn detect_cores() -> usize {
    detect_number_of_cores()
}

// ---------------------------------------------------------------------------
// Registry and frame introspection
// ---------------------------------------------------------------------------

#[pyfunction]
fn compressor_list() -> String {
    compression::compressor_list()
}

#[pyfunction]
fn code_to_name(code: i32) -> PyResult<&'static str> {
    compression::code_to_name(code).map_err(BloscError::from).into_py_result()
}

#[pyfunction]
fn name_to_code(name: &str) -> PyResult<u8> {
    compression::name_to_code(name).map_err(BloscError::from).into_py_result()
}

#[pyfunction]
fn clib_info(cname: &str) -> PyResult<(&'static str, String)> {
    compression::clib_info(cname).map_err(BloscError::from).into_py_result()
}

#[pyfunction]
fn get_clib(bytesobj: PyBackedBytes) -> PyResult<&'static str> {
    blosc().clib(&bytesobj).into_py_result()
}

#[pyfunction]
fn get_cbuffer_sizes(bytesobj: PyBackedBytes) -> PyResult<(usize, usize, usize)> {
    blosc().cbuffer_sizes(&bytesobj).into_py_result()
}

#[pyfunction]
fn cbuffer_validate(bytesobj: PyBackedBytes) -> bool {
    blosc().cbuffer_validate(&bytesobj)
}

pub fn register(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compress, m)?)?;
    m.add_function(wrap_pyfunction!(decompress, m)?)?;
    m.add_function(wrap_pyfunction!(compress_ptr, m)?)?;
    m.add_function(wrap_pyfunction!(decompress_ptr, m)?)?;
    m.add_function(wrap_pyfunction!(pack_array, m)?)?;
    m.add_function(wrap_pyfunction!(unpack_array, m)?)?;

    m.add_function(wrap_pyfunction!(set_nthreads, m)?)?;
    m.add_function(wrap_pyfunction!(set_blocksize, m)?)?;
    m.add_function(wrap_pyfunction!(get_blocksize, m)?)?;
    m.add_function(wrap_pyfunction!(set_releasegil, m)?)?;
    m.add_function(wrap_pyfunction!(free_resources, m)?)?;
    m.add_function(wrap_pyfunction!(init, m)?)?;
    m.add_function(wrap_pyfunction!(destroy, m)?)?;
    m.add_function(wrap_pyfunction!(detect_cores, m)?)?;

    m.add_function(wrap_pyfunction!(compressor_list, m)?)?;
    m.add_function(wrap_pyfunction!(code_to_name, m)?)?;
    m.add_function(wrap_pyfunction!(name_to_code, m)?)?;
    m.add_function(wrap_pyfunction!(clib_info, m)?)?;
    m.add_function(wrap_pyfunction!(get_clib, m)?)?;
    m.add_function(wrap_pyfunction!(get_cbuffer_sizes, m)?)?;
    m.add_function(wrap_pyfunction!(cbuffer_validate, m)?)?;

    m.add("error", py.get_type_bound::<BloscPyError>())?;
    m.add("MAX_BUFFERSIZE", MAX_BUFFER_SIZE)?;
    m.add("MAX_THREADS", MAX_THREADS)?;
    m.add("MAX_TYPESIZE", MAX_TYPESIZE)?;
    m.add("NOSHUFFLE", shuffle_ids::NOSHUFFLE)?;
    m.add("SHUFFLE", shuffle_ids::SHUFFLE)?;
    m.add("VERSION_STRING", VERSION_STRING)?;
    Ok(())
}

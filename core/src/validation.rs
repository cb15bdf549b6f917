//! validation.rs
//! Parameter validator: every check that must pass before a value reaches
//! the engine or is turned into memory access.
//!
//! All functions are pure. Limits are in bytes.

use std::fmt;
use std::num::NonZeroUsize;

use crate::constants::{MAX_BUFFER_SIZE, MAX_CLEVEL, MIN_CLEVEL};
use crate::types::{BloscError, Result};

/// A machine address that passed `validate_address_type`.
///
/// Only integrality and non-nullness are established here. Whether the
/// address points at live, large enough memory is the caller's contract
/// (see `ptr`).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct RawAddress(NonZeroUsize);

impl RawAddress {
    pub fn from_ptr<T>(ptr: *const T) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(Self)
    }

    pub fn from_mut_ptr<T>(ptr: *mut T) -> Option<Self> {
        Self::from_ptr(ptr as *const T)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    pub fn as_ptr(self) -> *const u8 {
        self.0.get() as *const u8
    }

    pub fn as_mut_ptr(self) -> *mut u8 {
        self.0.get() as *mut u8
    }
}

impl fmt::Debug for RawAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawAddress(0x{:x})", self.0)
    }
}

/// An untyped host value offered as an address.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressArg {
    Integer(i128),
    Float(f64),
    /// A list/tuple-like value; the payload is its length.
    Sequence(usize),
    Text(String),
    /// Anything else, described by its type name.
    Other(String),
}

impl AddressArg {
    pub fn type_name(&self) -> &str {
        match self {
            AddressArg::Integer(_) => "int",
            AddressArg::Float(_) => "float",
            AddressArg::Sequence(_) => "sequence",
            AddressArg::Text(_) => "str",
            AddressArg::Other(name) => name,
        }
    }
}

impl From<usize> for AddressArg {
    fn from(v: usize) -> Self {
        AddressArg::Integer(v as i128)
    }
}

impl From<i64> for AddressArg {
    fn from(v: i64) -> Self {
        AddressArg::Integer(i128::from(v))
    }
}

impl From<f64> for AddressArg {
    fn from(v: f64) -> Self {
        AddressArg::Float(v)
    }
}

impl From<&str> for AddressArg {
    fn from(v: &str) -> Self {
        AddressArg::Text(v.to_string())
    }
}

pub fn validate_level(level: i32) -> Result<u8> {
    if !(MIN_CLEVEL..=MAX_CLEVEL).contains(&level) {
        return Err(BloscError::range("clevel", level as i128, MIN_CLEVEL as i128, MAX_CLEVEL as i128));
    }
    Ok(level as u8)
}

pub fn validate_typesize(typesize: usize, max: usize) -> Result<u8> {
    if typesize == 0 || typesize > max {
        return Err(BloscError::range("typesize", typesize as i128, 1, max as i128));
    }
    u8::try_from(typesize).map_err(|_| BloscError::range("typesize", typesize as i128, 1, u8::MAX as i128))
}

pub fn validate_length(length: usize, max: usize) -> Result<()> {
    if length > max {
        return Err(BloscError::range("buffer length", length as i128, 0, max as i128));
    }
    Ok(())
}

/// Signed host integers (item counts, lengths) must be non-negative.
pub fn validate_count(n: i64, what: &'static str) -> Result<usize> {
    if n < 0 {
        return Err(BloscError::range(what, i128::from(n), 0, i64::MAX as i128));
    }
    usize::try_from(n).map_err(|_| BloscError::range(what, i128::from(n), 0, usize::MAX as i128))
}

pub fn validate_nthreads(n: usize, max: usize) -> Result<usize> {
    if n == 0 || n > max {
        return Err(BloscError::range("nthreads", n as i128, 1, max as i128));
    }
    Ok(n)
}

pub fn validate_address_type(arg: &AddressArg) -> Result<RawAddress> {
    let AddressArg::Integer(value) = arg else {
        return Err(BloscError::TypeMismatch(format!(
            "address must be an integer, got {}",
            arg.type_name()
        )));
    };
    let raw = usize::try_from(*value).map_err(|_| {
        BloscError::TypeMismatch(format!("address {value} is not representable as a machine address"))
    })?;
    NonZeroUsize::new(raw)
        .map(RawAddress)
        .ok_or_else(|| BloscError::TypeMismatch("address must not be null".to_string()))
}

/// `items * typesize` with overflow reported as a range error.
pub fn checked_byte_length(items: usize, typesize: usize) -> Result<usize> {
    items
        .checked_mul(typesize)
        .ok_or_else(|| BloscError::range("buffer length", items as i128 * typesize as i128, 0, MAX_BUFFER_SIZE as i128))
}

/// Byte size of an array of `shape` with elements of `itemsize` bytes.
pub fn validate_array_size(shape: &[usize], itemsize: usize) -> Result<usize> {
    let overflow = || BloscError::range("array size", i128::MAX, 0, MAX_BUFFER_SIZE as i128);
    let elements = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(overflow)?;
    let size = elements.checked_mul(itemsize).ok_or_else(overflow)?;
    validate_length(size, MAX_BUFFER_SIZE)?;
    Ok(size)
}

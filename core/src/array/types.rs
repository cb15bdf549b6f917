//! array/types.rs
//! Element kinds, byte/memory order, the `ArrayLike` trait and the owned
//! `Array` produced by unpacking.

use std::borrow::Cow;
use std::fmt;

use bytemuck::Pod;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use serde::{Deserialize, Serialize};

use crate::types::{BloscError, Result};
use crate::validation::validate_array_size;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Pair of `f32`.
    Complex64,
    /// Pair of `f64`.
    Complex128,
    /// Fixed-width byte string of `n` bytes.
    Bytes(u32),
    /// Fixed-width UCS-4 string of `n` code points.
    Unicode(u32),
}

impl ElementKind {
    pub fn itemsize(self) -> usize {
        match self {
            ElementKind::Bool | ElementKind::I8 | ElementKind::U8 => 1,
            ElementKind::I16 | ElementKind::U16 => 2,
            ElementKind::I32 | ElementKind::U32 | ElementKind::F32 => 4,
            ElementKind::I64 | ElementKind::U64 | ElementKind::F64 | ElementKind::Complex64 => 8,
            ElementKind::Complex128 => 16,
            ElementKind::Bytes(n) => n as usize,
            ElementKind::Unicode(n) => (n as usize).saturating_mul(4),
        }
    }

    /// Whether the element bytes depend on the byte order.
    pub fn has_byte_order(self) -> bool {
        !matches!(self, ElementKind::Bool | ElementKind::I8 | ElementKind::U8 | ElementKind::Bytes(_))
    }

    fn type_char(self) -> char {
        match self {
            ElementKind::Bool => 'b',
            ElementKind::I8 | ElementKind::I16 | ElementKind::I32 | ElementKind::I64 => 'i',
            ElementKind::U8 | ElementKind::U16 | ElementKind::U32 | ElementKind::U64 => 'u',
            ElementKind::F32 | ElementKind::F64 => 'f',
            ElementKind::Complex64 | ElementKind::Complex128 => 'c',
            ElementKind::Bytes(_) => 'S',
            ElementKind::Unicode(_) => 'U',
        }
    }

    /// Size field of the type string: code points for `Unicode`, bytes
    /// otherwise.
    fn descr_size(self) -> usize {
        match self {
            ElementKind::Unicode(n) => n as usize,
            other => other.itemsize(),
        }
    }

    /// Parse a numpy-style type string such as `"<f8"`, `"|u1"`, `">c16"`,
    /// `"|S12"` or `"<U10"`.
    pub fn from_descr(descr: &str) -> Result<(ElementKind, ByteOrder)> {
        let unsupported = || BloscError::TypeMismatch(format!("unsupported element type {descr:?}"));

        let mut chars = descr.chars();
        let order = match chars.next() {
            Some('<') => ByteOrder::Little,
            Some('>') => ByteOrder::Big,
            Some('=') => ByteOrder::native(),
            Some('|') => ByteOrder::NotApplicable,
            _ => return Err(unsupported()),
        };
        let type_char = chars.next().ok_or_else(unsupported)?;
        let size: u32 = chars.as_str().parse().map_err(|_| unsupported())?;

        let kind = match (type_char, size) {
            ('b', 1) => ElementKind::Bool,
            ('i', 1) => ElementKind::I8,
            ('i', 2) => ElementKind::I16,
            ('i', 4) => ElementKind::I32,
            ('i', 8) => ElementKind::I64,
            ('u', 1) => ElementKind::U8,
            ('u', 2) => ElementKind::U16,
            ('u', 4) => ElementKind::U32,
            ('u', 8) => ElementKind::U64,
            ('f', 4) => ElementKind::F32,
            ('f', 8) => ElementKind::F64,
            ('c', 8) => ElementKind::Complex64,
            ('c', 16) => ElementKind::Complex128,
            ('S', n) if n > 0 => ElementKind::Bytes(n),
            ('U', n) if n > 0 => ElementKind::Unicode(n),
            _ => return Err(unsupported()),
        };

        if !kind.has_byte_order() {
            return Ok((kind, ByteOrder::NotApplicable));
        }
        if order == ByteOrder::NotApplicable {
            return Err(unsupported());
        }
        Ok((kind, order))
    }

    /// numpy-style type string for this kind in `order`.
    pub fn descr(self, order: ByteOrder) -> String {
        let prefix = if self.has_byte_order() { order.prefix() } else { '|' };
        format!("{}{}{}", prefix, self.type_char(), self.descr_size())
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_char(), self.descr_size())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    Little,
    Big,
    /// Single-byte elements.
    NotApplicable,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "little") { ByteOrder::Little } else { ByteOrder::Big }
    }

    /// Native order for kinds that have one, `NotApplicable` otherwise.
    pub fn native_for(kind: ElementKind) -> Self {
        if kind.has_byte_order() { ByteOrder::native() } else { ByteOrder::NotApplicable }
    }

    fn prefix(self) -> char {
        match self {
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
            ByteOrder::NotApplicable => '|',
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryOrder {
    /// Row-major.
    #[default]
    C,
    /// Column-major.
    Fortran,
}

impl MemoryOrder {
    /// Order implied by numpy's contiguity flags. Only arrays that are
    /// Fortran- but not C-contiguous are `Fortran`; anything else is read
    /// out in C order.
    pub fn from_contiguity(c_contiguous: bool, f_contiguous: bool) -> Self {
        if f_contiguous && !c_contiguous { MemoryOrder::Fortran } else { MemoryOrder::C }
    }

    /// numpy `order=` argument.
    pub fn numpy_code(self) -> &'static str {
        match self {
            MemoryOrder::C => "C",
            MemoryOrder::Fortran => "F",
        }
    }
}

/// Plain-old-data element types with a known `ElementKind`.
pub trait Element: Pod {
    const KIND: ElementKind;
}

macro_rules! impl_element {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(impl Element for $t { const KIND: ElementKind = ElementKind::$kind; })*
    };
}

impl_element! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
}

/// Anything that can be packed: typed metadata plus the element bytes.
pub trait ArrayLike {
    fn kind(&self) -> ElementKind;
    fn byte_order(&self) -> ByteOrder;
    fn memory_order(&self) -> MemoryOrder;
    fn shape(&self) -> &[usize];
    /// The elements laid out in `memory_order`. Strided views copy.
    fn as_bytes(&self) -> Cow<'_, [u8]>;
}

/// Owned, contiguous array with explicit element metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    kind: ElementKind,
    byte_order: ByteOrder,
    memory_order: MemoryOrder,
    shape: Vec<usize>,
    data: Vec<u8>,
}

impl Array {
    pub fn new(
        kind: ElementKind,
        byte_order: ByteOrder,
        memory_order: MemoryOrder,
        shape: Vec<usize>,
        data: Vec<u8>,
    ) -> Result<Self> {
        if kind.itemsize() == 0 {
            return Err(BloscError::TypeMismatch(format!("element type {kind} has no size")));
        }
        let expected = validate_array_size(&shape, kind.itemsize())?;
        if data.len() != expected {
            return Err(BloscError::TypeMismatch(format!(
                "array data has {} bytes, shape {:?} of {} needs {}",
                data.len(), shape, kind, expected
            )));
        }
        let byte_order = if kind.has_byte_order() { byte_order } else { ByteOrder::NotApplicable };
        Ok(Self { kind, byte_order, memory_order, shape, data })
    }

    /// Row-major array in native byte order.
    pub fn from_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Result<Self> {
        let data = bytemuck::cast_slice(&values).to_vec();
        Self::new(T::KIND, ByteOrder::native_for(T::KIND), MemoryOrder::C, shape, data)
    }

    /// Elements in memory order. Fails unless `T` matches the element kind
    /// and the data is in native byte order.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if T::KIND != self.kind {
            return Err(BloscError::TypeMismatch(format!("array holds {}, requested {}", self.kind, T::KIND)));
        }
        if self.byte_order != ByteOrder::native_for(self.kind) {
            return Err(BloscError::TypeMismatch(format!(
                "array is {:?} endian, native is {:?}",
                self.byte_order,
                ByteOrder::native()
            )));
        }
        Ok(self
            .data
            .chunks_exact(self.kind.itemsize())
            .map(bytemuck::pod_read_unaligned::<T>)
            .collect())
    }

    pub fn into_ndarray<T: Element>(self) -> Result<ArrayD<T>> {
        let values = self.to_vec::<T>()?;
        let shape = IxDyn(&self.shape).set_f(self.memory_order == MemoryOrder::Fortran);
        ArrayD::from_shape_vec(shape, values).map_err(|e| BloscError::Format(format!("array shape: {e}")))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// numpy-style type string of the elements.
    pub fn descr(&self) -> String {
        self.kind.descr(self.byte_order)
    }
}

impl ArrayLike for Array {
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
        Cow::Borrowed(&self.data)
    }
}

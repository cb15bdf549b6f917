//! array/ndarray_impl.rs
//! `ArrayLike` for ndarray arrays of `Element` types.

use std::borrow::Cow;

use ndarray::{ArrayBase, Data, Dimension};

use crate::array::types::{ArrayLike, ByteOrder, Element, ElementKind, MemoryOrder};

impl<S, D, T> ArrayLike for ArrayBase<S, D>
where
    S: Data<Elem = T>,
    D: Dimension,
    T: Element,
{
    fn kind(&self) -> ElementKind {
        T::KIND
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::native_for(T::KIND)
    }

    fn memory_order(&self) -> MemoryOrder {
        if !self.is_standard_layout() && self.t().is_standard_layout() {
            MemoryOrder::Fortran
        } else {
            MemoryOrder::C
        }
    }

    fn shape(&self) -> &[usize] {
        ArrayBase::shape(self)
    }

    fn as_bytes(&self) -> Cow<'_, [u8]> {
        let values = if self.is_standard_layout() {
            self.as_slice()
        } else if self.t().is_standard_layout() {
            self.as_slice_memory_order()
        } else {
            None
        };
        if let Some(values) = values {
            return Cow::Borrowed(bytemuck::cast_slice(values));
        }
        // Strided view: copy out in logical row-major order.
        let mut bytes = Vec::with_capacity(self.len() * std::mem::size_of::<T>());
        for value in self.iter() {
            bytes.extend_from_slice(bytemuck::bytes_of(value));
        }
        Cow::Owned(bytes)
    }
}

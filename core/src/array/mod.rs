//! array/mod.rs
//! Array packing protocol: element metadata, the `ArrayLike` view and the
//! packed-record codec.
//!
//! Notes:
//! - A packed array is an ordinary compressed frame whose payload is a
//!   serialized record (kind, byte order, memory order, shape, bytes).
//! - The frame's typesize is the element size, so the shuffle works on
//!   element bytes. Elements wider than 255 bytes use typesize 1.

pub mod types;
pub mod ndarray_impl;
pub mod pack;

pub use types::*;
pub use pack::{pack, unpack, PACK_FORMAT_VERSION};

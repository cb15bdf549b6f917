//! ptr.rs
//! Raw pointer codec: zero-copy compression from, and decompression into,
//! caller-owned memory identified by a validated address.
//!
//! This is the only module allowed to use `unsafe`. Each entry point has a
//! single unsafe site that turns `(address, length)` into a slice and passes
//! it to the engine. Nothing is retained past the call.

#![allow(unsafe_code)]

use std::slice;

use log::debug;

use crate::api::Blosc;
use crate::codec::CompressOptions;
use crate::config::EngineConfig;
use crate::constants::MAX_BUFFER_SIZE;
use crate::engine::Engine;
use crate::types::{BloscError, Result};
use crate::validation::{checked_byte_length, validate_count, validate_length, RawAddress};

/// Compress `items * typesize` bytes read directly from `address`.
///
/// `items` comes from a signed host integer and is rejected when negative.
///
/// # Safety
///
/// `address` must point to at least `items * typesize` initialized bytes
/// that stay valid and are not written to for the duration of the call.
/// Violating this is undefined behaviour; the address is only checked for
/// being a non-null integer.
pub unsafe fn compress_ptr<E: Engine + ?Sized>(
    engine: &E,
    cfg: &EngineConfig,
    address: RawAddress,
    items: i64,
    typesize: usize,
    opts: &CompressOptions,
) -> Result<Vec<u8>> {
    let items = validate_count(items, "items")?;
    let length = checked_byte_length(items, typesize)?;
    validate_length(length, MAX_BUFFER_SIZE)?;
    let params = opts.frame_params(typesize, cfg)?;

    debug!("compress_ptr: {:?} items={} typesize={} length={}", address, items, typesize, length);

    // SAFETY: the caller guarantees `length` readable bytes at `address`;
    // the address is non-null and u8 has no alignment requirement.
    let src = unsafe { slice::from_raw_parts(address.as_ptr(), length) };
    engine.compress(src, &params, cfg)
}

/// Decompress `frame` straight into the memory at `address`. Returns the
/// number of bytes written, which always equals the frame's `nbytes`.
///
/// # Safety
///
/// `address` must point to at least `nbytes` writable bytes (as reported by
/// `cbuffer_sizes(frame)`) that no other reference aliases for the duration
/// of the call. Violating this is undefined behaviour.
pub unsafe fn decompress_ptr<E: Engine + ?Sized>(
    engine: &E,
    cfg: &EngineConfig,
    frame: &[u8],
    address: RawAddress,
) -> Result<usize> {
    let header = engine.frame_header(frame)?;
    let nbytes = header.nbytes();

    debug!("decompress_ptr: {:?} nbytes={} cbytes={}", address, nbytes, frame.len());

    // SAFETY: the caller guarantees `nbytes` writable, unaliased bytes at
    // `address`; `nbytes` comes from a header that passed validation.
    let dst = unsafe { slice::from_raw_parts_mut(address.as_mut_ptr(), nbytes) };
    let written = engine.decompress_into(frame, dst, cfg)?;

    if written != nbytes {
        return Err(BloscError::Format(format!(
            "decompressed {written} bytes into caller memory, header declares {nbytes}"
        )));
    }
    Ok(written)
}

impl<E: Engine> Blosc<E> {
    /// Zero-copy compression from caller memory.
    ///
    /// # Safety
    ///
    /// Same contract as [`compress_ptr`].
    pub unsafe fn compress_ptr(
        &self,
        address: RawAddress,
        items: i64,
        typesize: usize,
        opts: &CompressOptions,
    ) -> Result<Vec<u8>> {
        let cfg = self.controller.snapshot();
        unsafe { compress_ptr(&self.engine, &cfg, address, items, typesize, opts) }
    }

    /// Zero-copy decompression into caller memory.
    ///
    /// # Safety
    ///
    /// Same contract as [`decompress_ptr`].
    pub unsafe fn decompress_ptr(&self, frame: &[u8], address: RawAddress) -> Result<usize> {
        let cfg = self.controller.snapshot();
        unsafe { decompress_ptr(&self.engine, &cfg, frame, address) }
    }
}

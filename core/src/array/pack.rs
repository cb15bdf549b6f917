//! array/pack.rs
//! Pack an `ArrayLike` into a compressed frame and back.
//!
//! Record layout (bincode, standard config, via serde):
//! version, kind, byte order, memory order, shape, data.

use bincode::config::{self, Config};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::array::types::{Array, ArrayLike, ByteOrder, ElementKind, MemoryOrder};
use crate::codec::{self, CompressOptions};
use crate::config::EngineConfig;
use crate::constants::{MAX_BUFFER_SIZE, MAX_TYPESIZE};
use crate::engine::Engine;
use crate::types::{BloscError, Result};
use crate::validation::validate_array_size;

/// Version of the packed record written first in every payload.
pub const PACK_FORMAT_VERSION: u8 = 1;

/// Upper bound handed to the decoder so a corrupt length can't trigger a
/// huge allocation.
const RECORD_LIMIT: usize = MAX_BUFFER_SIZE;

#[derive(Serialize)]
struct RecordRef<'a> {
    version: u8,
    kind: ElementKind,
    byte_order: ByteOrder,
    memory_order: MemoryOrder,
    shape: &'a [usize],
    data: &'a [u8],
}

#[derive(Deserialize)]
struct Record {
    version: u8,
    kind: ElementKind,
    byte_order: ByteOrder,
    memory_order: MemoryOrder,
    shape: Vec<usize>,
    data: Vec<u8>,
}

fn record_config() -> impl Config {
    config::standard().with_limit::<RECORD_LIMIT>()
}

pub fn pack<E, A>(engine: &E, cfg: &EngineConfig, array: &A, opts: &CompressOptions) -> Result<Vec<u8>>
where
    E: Engine + ?Sized,
    A: ArrayLike + ?Sized,
{
    let kind = array.kind();
    let itemsize = kind.itemsize();
    if itemsize == 0 {
        return Err(BloscError::TypeMismatch(format!("element type {kind} has no size")));
    }
    let expected = validate_array_size(array.shape(), itemsize)?;

    let data = array.as_bytes();
    if data.len() != expected {
        return Err(BloscError::TypeMismatch(format!(
            "array exposes {} bytes, shape {:?} of {} needs {}",
            data.len(), array.shape(), kind, expected
        )));
    }

    let record = RecordRef {
        version: PACK_FORMAT_VERSION,
        kind,
        byte_order: array.byte_order(),
        memory_order: array.memory_order(),
        shape: array.shape(),
        data: &*data,
    };
    let payload = bincode::serde::encode_to_vec(&record, record_config())
        .map_err(|e| BloscError::Format(format!("array record: {e}")))?;

    // Elements wider than a frame typesize are shuffled as plain bytes.
    let typesize = if itemsize <= MAX_TYPESIZE { itemsize } else { 1 };
    debug!("pack: {} {:?} -> record of {} bytes", kind, array.shape(), payload.len());
    codec::compress(engine, cfg, &payload, typesize, opts)
}

pub fn unpack<E: Engine + ?Sized>(engine: &E, cfg: &EngineConfig, packed: &[u8]) -> Result<Array> {
    let payload = codec::decompress(engine, cfg, packed)?;

    let (record, consumed): (Record, usize) = bincode::serde::decode_from_slice(&payload, record_config())
        .map_err(|e| BloscError::Format(format!("array record: {e}")))?;
    if consumed != payload.len() {
        return Err(BloscError::Format(format!(
            "array record has {} trailing bytes",
            payload.len() - consumed
        )));
    }
    if record.version != PACK_FORMAT_VERSION {
        return Err(BloscError::Format(format!(
            "unsupported array record version {} (expected {})",
            record.version, PACK_FORMAT_VERSION
        )));
    }

    let expected = validate_array_size(&record.shape, record.kind.itemsize())
        .map_err(|e| BloscError::Format(format!("array record: {e}")))?;
    if record.data.len() != expected {
        return Err(BloscError::Format(format!(
            "array record holds {} bytes, shape {:?} of {} needs {}",
            record.data.len(), record.shape, record.kind, expected
        )));
    }

    debug!("unpack: {} bytes -> {} {:?}", packed.len(), record.kind, record.shape);
    Array::new(record.kind, record.byte_order, record.memory_order, record.shape, record.data)
}

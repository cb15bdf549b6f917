//! codecs/lz4.rs
//! LZ4 block compressor/decompressor.
use lz4_flex::block::{compress, decompress_into};

use crate::compression::types::{CompressionError, Compressor, Decompressor};

/// LZ4 block compressor.
/// lz4_flex exposes no compression levels in block mode, so `clevel` only
/// decides between storing and compressing at the frame level.
pub struct Lz4Compressor;

pub struct Lz4Decompressor;

impl Lz4Compressor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Lz4Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for Lz4Compressor {
    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        out.extend_from_slice(&compress(input));
        Ok(())
    }
}

impl Decompressor for Lz4Decompressor {
    fn decompress_chunk(&self, input: &[u8], out: &mut [u8]) -> Result<usize, CompressionError> {
        let written = decompress_into(input, out)
            .map_err(|e| CompressionError::CodecProcessFailed {
                codec: "lz4",
                msg: e.to_string(),
            })?;

        if written != out.len() {
            return Err(CompressionError::SizeMismatch { codec: "lz4", have: written, need: out.len() });
        }
        Ok(written)
    }
}

//! codecs/zstd.rs
//!
//! Zstd block compressor/decompressor.
//!
//! Design notes:
//! - Uses the zstd bulk API: each block is a standalone zstd frame.
//! - Errors are mapped into `CompressionError` variants with codec context.

use crate::compression::constants::ZSTD_MAX_LEVEL;
use crate::compression::types::{CompressionError, Compressor, Decompressor};

pub struct ZstdCompressor {
    level: i32,
}

pub struct ZstdDecompressor;

impl ZstdCompressor {
    /// Map a 0-9 compression level onto the zstd scale (1, 3, 5, ... 19).
    pub fn new(clevel: u8) -> Self {
        let level = match clevel {
            0 => 1,
            n if n >= 9 => ZSTD_MAX_LEVEL,
            n => 2 * i32::from(n) - 1,
        };
        Self { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Compressor for ZstdCompressor {
    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let compressed = ::zstd::bulk::compress(input, self.level)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "zstd", msg: e.to_string() })?;
        out.extend_from_slice(&compressed);
        Ok(())
    }
}

impl Decompressor for ZstdDecompressor {
    fn decompress_chunk(&self, input: &[u8], out: &mut [u8]) -> Result<usize, CompressionError> {
        let written = ::zstd::bulk::decompress_to_buffer(input, out)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "zstd", msg: e.to_string() })?;

        if written != out.len() {
            return Err(CompressionError::SizeMismatch { codec: "zstd", have: written, need: out.len() });
        }
        Ok(written)
    }
}

//! codecs/zlib.rs
//! Zlib (deflate) block compressor/decompressor via flate2.

use std::io::{Read, Write};
use flate2::{Compression, write::ZlibEncoder, read::ZlibDecoder};

use crate::compression::types::{Compressor, Decompressor, CompressionError};

pub struct ZlibCompressor {
    level: Compression,
}

pub struct ZlibDecompressor;

impl ZlibCompressor {
    pub fn new(clevel: u8) -> Self {
        Self { level: Compression::new(u32::from(clevel.min(9))) }
    }
}

impl Compressor for ZlibCompressor {
    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        // Encode this block as its own zlib stream
        let mut enc = ZlibEncoder::new(Vec::with_capacity(input.len() / 2), self.level);
        enc.write_all(input)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "zlib", msg: e.to_string() })?;
        let compressed = enc.finish()
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "zlib", msg: e.to_string() })?;

        out.extend_from_slice(&compressed);
        Ok(())
    }
}

impl Decompressor for ZlibDecompressor {
    fn decompress_chunk(&self, input: &[u8], out: &mut [u8]) -> Result<usize, CompressionError> {
        let mut dec = ZlibDecoder::new(input);
        dec.read_exact(out)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "zlib", msg: e.to_string() })?;

        // The stream must end exactly at the block boundary.
        let mut extra = [0u8; 1];
        let trailing = dec.read(&mut extra)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: "zlib", msg: e.to_string() })?;
        if trailing != 0 {
            return Err(CompressionError::SizeMismatch { codec: "zlib", have: out.len() + trailing, need: out.len() });
        }
        Ok(out.len())
    }
}

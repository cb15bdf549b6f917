//! compression/types.rs
//! Compressor identifiers, codec traits and codec errors.
use std::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::constants::codec_ids;
use crate::utils::enum_name_or_hex;

/// FFI-safe enum for compressor identifiers.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    Lz4  = codec_ids::LZ4,
    Zlib = codec_ids::ZLIB,
    Zstd = codec_ids::ZSTD,
}

impl CompressionCodec {
    pub const ALL: [CompressionCodec; 3] = [
        CompressionCodec::Lz4,
        CompressionCodec::Zlib,
        CompressionCodec::Zstd,
    ];

    pub fn verify(raw: u8) -> Result<Self, CompressionError> {
        CompressionCodec::try_from_primitive(raw)
            .map_err(|_| CompressionError::UnknownCode { code: raw as i32 })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Public compressor name (`lz4`, `zlib`, `zstd`).
    pub fn name(self) -> &'static str {
        match self {
            CompressionCodec::Lz4  => "lz4",
            CompressionCodec::Zlib => "zlib",
            CompressionCodec::Zstd => "zstd",
        }
    }

    /// Name of the library backing this compressor.
    pub fn library(self) -> &'static str {
        match self {
            CompressionCodec::Lz4  => "LZ4",
            CompressionCodec::Zlib => "Zlib",
            CompressionCodec::Zstd => "Zstd",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CompressionError> {
        CompressionCodec::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| CompressionError::UnknownName { name: name.to_string() })
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("compressor not available: {name}")]
    UnknownName { name: String },

    #[error("unknown compressor code: {}", fmt_code(.code))]
    UnknownCode { code: i32 },

    #[error("codec {codec} failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    #[error("codec {codec} produced {have} bytes, expected {need}")]
    SizeMismatch { codec: &'static str, have: usize, need: usize },

    #[error("worker pool failed: {0}")]
    WorkerPanicked(String),
}

fn fmt_code(code: &i32) -> String {
    match u8::try_from(*code) {
        Ok(raw) => enum_name_or_hex::<CompressionCodec>(raw),
        Err(_) => code.to_string(),
    }
}

// Require Send + Sync so one codec instance can serve every worker.
pub trait Compressor: Send + Sync {
    /// Compress one block, appending the codec payload to `out`.
    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor: Send + Sync {
    /// Decompress one block into `out`, which is exactly the block's raw size.
    /// Returns the number of bytes written.
    fn decompress_chunk(&self, input: &[u8], out: &mut [u8]) -> Result<usize, CompressionError>;
}

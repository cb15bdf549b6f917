//! compression/registry.rs
//! Compressor registry: name/code resolution, library info and factories.

use crate::compression::constants::{LZ4_LIB_VERSION, ZLIB_LIB_VERSION};
use crate::compression::types::{CompressionCodec, CompressionError, Compressor, Decompressor};
use crate::compression::codecs::{lz4, zlib, zstd};

pub struct CodecInfo {
    pub name: &'static str,
    pub library: &'static str,
    pub version: String,
    pub supports_levels: bool,
}

pub fn resolve(codec: CompressionCodec) -> CodecInfo {
    match codec {
        CompressionCodec::Lz4 => CodecInfo {
            name: codec.name(),
            library: codec.library(),
            version: LZ4_LIB_VERSION.to_string(),
            supports_levels: false,
        },
        CompressionCodec::Zlib => CodecInfo {
            name: codec.name(),
            library: codec.library(),
            version: ZLIB_LIB_VERSION.to_string(),
            supports_levels: true,
        },
        CompressionCodec::Zstd => CodecInfo {
            name: codec.name(),
            library: codec.library(),
            version: ::zstd::zstd_safe::version_string().to_string(),
            supports_levels: true,
        },
    }
}

/// Comma separated list of the compressors built into the engine.
pub fn compressor_list() -> String {
    CompressionCodec::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn name_to_code(name: &str) -> Result<u8, CompressionError> {
    CompressionCodec::from_name(name).map(CompressionCodec::code)
}

pub fn code_to_name(code: i32) -> Result<&'static str, CompressionError> {
    let raw = u8::try_from(code).map_err(|_| CompressionError::UnknownCode { code })?;
    CompressionCodec::verify(raw).map(CompressionCodec::name)
}

/// `(library, version)` for a compressor name.
pub fn clib_info(name: &str) -> Result<(&'static str, String), CompressionError> {
    let info = resolve(CompressionCodec::from_name(name)?);
    Ok((info.library, info.version))
}

pub fn create_compressor(codec: CompressionCodec, clevel: u8) -> Box<dyn Compressor> {
    match codec {
        CompressionCodec::Lz4  => Box::new(lz4::Lz4Compressor::new()),
        CompressionCodec::Zlib => Box::new(zlib::ZlibCompressor::new(clevel)),
        CompressionCodec::Zstd => Box::new(zstd::ZstdCompressor::new(clevel)),
    }
}

pub fn create_decompressor(codec: CompressionCodec) -> Box<dyn Decompressor> {
    match codec {
        CompressionCodec::Lz4  => Box::new(lz4::Lz4Decompressor),
        CompressionCodec::Zlib => Box::new(zlib::ZlibDecompressor),
        CompressionCodec::Zstd => Box::new(zstd::ZstdDecompressor),
    }
}

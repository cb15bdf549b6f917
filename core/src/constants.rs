//! constants.rs
//! Engine-imposed ceilings, frame format versions and defaults.
//!
//! All limits are expressed in bytes. Item counts are converted at the
//! boundary (see `validation::checked_byte_length`).

/// Maximum number of bytes a frame adds on top of the uncompressed payload.
pub const MAX_OVERHEAD: usize = 16;

/// Largest buffer accepted per call. Frame length fields are 32-bit, so the
/// payload plus overhead must stay within `i32::MAX`.
pub const MAX_BUFFER_SIZE: usize = i32::MAX as usize - MAX_OVERHEAD;

/// Largest element width understood by the shuffle filter.
pub const MAX_TYPESIZE: usize = 255;

/// Upper bound for the engine worker pool.
pub const MAX_THREADS: usize = 256;

/// Inputs shorter than this are always stored, never compressed.
pub const MIN_BUFFER_SIZE: usize = 128;

/// Compression level bounds.
pub const MIN_CLEVEL: i32 = 0;
pub const MAX_CLEVEL: i32 = 9;
pub const DEFAULT_CLEVEL: i32 = 9;

/// Frame header versions written into bytes 0 and 1.
pub const FORMAT_VERSION: u8 = 2;
pub const CODEC_FORMAT_VERSION: u8 = 1;

/// Fixed frame header length.
pub const FRAME_HEADER_LEN: usize = 16;

/// Automatic blocksize bounds (bytes).
pub const MIN_BLOCKSIZE: usize = 32 * 1024;
pub const MAX_BLOCKSIZE: usize = 256 * 1024;

/// Library version reported to bindings.
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Shuffle filter identifiers (mirrored by the Python constants).
pub mod shuffle_ids {
    pub const NOSHUFFLE: u8 = 0;
    pub const SHUFFLE: u8 = 1;
}

/// Frame header flag bits (byte 2).
pub mod flags {
    pub const BYTE_SHUFFLE: u8 = 0x01;
    pub const MEMCPYED: u8     = 0x02;
    /// Compressor code lives in the top three bits.
    pub const CODEC_SHIFT: u8  = 5;
    pub const CODEC_MASK: u8   = 0xE0;
    /// Bits that must be zero in a frame written by this engine.
    pub const RESERVED_MASK: u8 = 0x1C;
}

/// Environment variables read by `EngineConfig::from_env`.
pub mod env_vars {
    pub const NTHREADS: &str    = "BLOSC_NTHREADS";
    pub const BLOCKSIZE: &str   = "BLOSC_BLOCKSIZE";
    pub const COMPRESSOR: &str  = "BLOSC_COMPRESSOR";
    pub const RELEASEGIL: &str  = "BLOSC_RELEASEGIL";
}

/// Stable compressor codes stored in the top bits of the frame flags.
/// Numbering follows the blosc registry so codes stay recognisable.
pub mod codec_ids {
    pub const LZ4: u8  = 1;
    pub const ZLIB: u8 = 4;
    pub const ZSTD: u8 = 5;
}

/// Compressor used when neither the call nor the configuration picks one.
pub const DEFAULT_COMPRESSOR: &str = "lz4";

/// zstd level used for clevel 9.
pub const ZSTD_MAX_LEVEL: i32 = 19;

/// Versions of the codec crates linked into the engine, reported by `clib_info`.
pub const LZ4_LIB_VERSION: &str  = "lz4_flex 0.12";
pub const ZLIB_LIB_VERSION: &str = "flate2 1.0";

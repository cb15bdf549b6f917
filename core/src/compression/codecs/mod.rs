//! compression/codecs/mod.rs
//! Block codecs behind the `Compressor` / `Decompressor` traits.
//!
//! Notes:
//! - Every block is compressed independently, so blocks can be processed
//!   on any worker in any order and reassembled deterministically.
//! - Codecs never see frame headers; block sizes come from the caller.

pub mod lz4;
pub mod zlib;
pub mod zstd;

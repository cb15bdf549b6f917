//! compression/mod.rs
//! Compressor registry, block codecs and the byte-shuffle filter.
//!
//! Notes:
//! - Deterministic per-block compression keeps output independent of the
//!   number of workers.
//! - Registry resolves compressor names and codes to implementations.

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;
pub mod shuffle;

pub use constants::*;
pub use types::*;
pub use registry::*;

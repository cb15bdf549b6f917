//! engine/mod.rs
//! Compression engine contract, the native Blosc2 engine and the pure-Rust
//! block engine.
//!
//! Notes:
//! - Everything above this module talks to the engine through `Engine`;
//!   nothing else touches frame payloads.
//! - `DefaultEngine` is the C-Blosc2 binding when the `blosc2` feature is
//!   on (the default) and `BlockEngine` otherwise.

pub mod block;
#[cfg(feature = "blosc2")]
pub mod native;
pub mod scratch;

pub use block::BlockEngine;
#[cfg(feature = "blosc2")]
pub use native::Blosc2Engine;
pub use scratch::ScratchPool;

use crate::compression::CompressionCodec;
use crate::config::EngineConfig;
use crate::constants::MAX_OVERHEAD;
use crate::headers::{FrameHeader, Shuffle};
use crate::types::Result;

#[cfg(feature = "blosc2")]
pub type DefaultEngine = Blosc2Engine;
#[cfg(not(feature = "blosc2"))]
pub type DefaultEngine = BlockEngine;

/// Per-call frame parameters, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParams {
    pub typesize: u8,
    pub clevel: u8,
    pub shuffle: Shuffle,
    pub compressor: CompressionCodec,
}

pub trait Engine: Send + Sync {
    /// Compress `src` into a self-describing frame.
    fn compress(&self, src: &[u8], params: &FrameParams, cfg: &EngineConfig) -> Result<Vec<u8>>;

    /// Decompress `frame` into `dst`, which must hold at least the frame's
    /// `nbytes`. Returns the number of bytes written.
    fn decompress_into(&self, frame: &[u8], dst: &mut [u8], cfg: &EngineConfig) -> Result<usize>;

    /// Header fields of `frame`. Only the header is read, so a prefix of a
    /// frame is enough.
    fn read_header(&self, frame: &[u8]) -> Result<FrameHeader>;

    /// Validated header of a complete `frame`.
    fn frame_header(&self, frame: &[u8]) -> Result<FrameHeader>;

    /// Whether `frame` is complete and well formed.
    fn validate_frame(&self, frame: &[u8]) -> bool {
        self.frame_header(frame).is_ok()
    }

    /// Most bytes a frame can add on top of its uncompressed payload.
    fn max_overhead(&self) -> usize {
        MAX_OVERHEAD
    }

    /// Release pooled scratch memory.
    fn free_resources(&self);
}

//! headers/mod.rs
//! Frame header: layout, encode/decode and the block table reader.
//!
//! Notes:
//! - Fixed-size header (16 bytes) at the start of every frame.
//! - Byte 2 carries the shuffle and memcpyed bits plus the compressor code,
//!   so a frame can be decoded without any side information.
//! - Engines build a `FrameHeader` view of their frames, so callers read
//!   sizes and flags the same way whichever engine produced the frame.

pub mod types;
pub mod encode;
pub mod decode;
pub mod inspect;

pub use types::*;
pub use encode::*;
pub use decode::*;
pub use inspect::*;

//! headers/types.rs
//! Frame header struct, shuffle mode and header errors.
//!
//! Notes:
//! - Fixed 16-byte header, little-endian multi-byte fields.
//! - The header is the only thing that makes a frame self-describing:
//!   decompression never needs the caller to remember the original length.
//! - Lengths are 32-bit on the wire; `MAX_BUFFER_SIZE` keeps payloads in range.

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::CompressionCodec;
use crate::constants::{flags, shuffle_ids, CODEC_FORMAT_VERSION, FORMAT_VERSION, FRAME_HEADER_LEN, MAX_BUFFER_SIZE};
use crate::utils::enum_name_or_hex;

/// Shuffle filter applied before compression.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum Shuffle {
    NoShuffle = shuffle_ids::NOSHUFFLE,
    Byte      = shuffle_ids::SHUFFLE,
}

impl Default for Shuffle {
    fn default() -> Self {
        Shuffle::Byte
    }
}

impl Shuffle {
    pub fn verify(raw: u8) -> Result<Self, HeaderError> {
        Shuffle::try_from_primitive(raw).map_err(|_| HeaderError::UnknownShuffle { raw })
    }
}

impl From<bool> for Shuffle {
    fn from(on: bool) -> Self {
        if on { Shuffle::Byte } else { Shuffle::NoShuffle }
    }
}

/// Wire header of every compressed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,        // frame format version
    pub codec_version: u8,  // block layout version
    pub flags: u8,          // shuffle / memcpyed bits + compressor code
    pub typesize: u8,       // element width used by the shuffle
    pub nbytes: u32,        // uncompressed length
    pub blocksize: u32,     // raw bytes per block (last block may be shorter)
    pub cbytes: u32,        // total frame length, header included
}

impl FrameHeader {
    pub const LEN: usize = FRAME_HEADER_LEN;

    /// Header for a freshly compressed frame. `cbytes` is filled in once the
    /// payload length is known.
    pub fn new(codec: CompressionCodec, shuffle: Shuffle, typesize: u8, nbytes: u32, blocksize: u32) -> Self {
        let mut flag_bits = codec.code() << flags::CODEC_SHIFT;
        if shuffle == Shuffle::Byte {
            flag_bits |= flags::BYTE_SHUFFLE;
        }
        Self {
            version: FORMAT_VERSION,
            codec_version: CODEC_FORMAT_VERSION,
            flags: flag_bits,
            typesize,
            nbytes,
            blocksize,
            cbytes: 0,
        }
    }

    pub fn is_memcpyed(&self) -> bool {
        self.flags & flags::MEMCPYED != 0
    }

    pub fn set_memcpyed(&mut self) {
        self.flags |= flags::MEMCPYED;
    }

    pub fn shuffle(&self) -> Shuffle {
        Shuffle::from(self.flags & flags::BYTE_SHUFFLE != 0)
    }

    pub fn codec(&self) -> Result<CompressionCodec, HeaderError> {
        let raw = (self.flags & flags::CODEC_MASK) >> flags::CODEC_SHIFT;
        CompressionCodec::try_from_primitive(raw).map_err(|_| HeaderError::UnknownCompression { raw })
    }

    pub fn nbytes(&self) -> usize {
        self.nbytes as usize
    }

    pub fn cbytes(&self) -> usize {
        self.cbytes as usize
    }

    pub fn blocksize(&self) -> usize {
        self.blocksize as usize
    }

    /// Number of blocks the payload is split into.
    pub fn nblocks(&self) -> usize {
        if self.blocksize == 0 {
            return 0;
        }
        self.nbytes().div_ceil(self.blocksize())
    }

    /// Raw length of block `index`.
    pub fn block_len(&self, index: usize) -> usize {
        let start = index * self.blocksize();
        self.blocksize().min(self.nbytes() - start)
    }

    /// Field-level checks that need no payload.
    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.version == 0 || self.version > FORMAT_VERSION {
            return Err(HeaderError::UnsupportedVersion { have: self.version, max: FORMAT_VERSION });
        }
        if self.codec_version == 0 || self.codec_version > CODEC_FORMAT_VERSION {
            return Err(HeaderError::UnsupportedCodecVersion { have: self.codec_version, max: CODEC_FORMAT_VERSION });
        }
        if self.flags & flags::RESERVED_MASK != 0 {
            return Err(HeaderError::ReservedFlags { flags: self.flags });
        }
        if self.typesize == 0 {
            return Err(HeaderError::TypesizeZero);
        }
        if self.nbytes() > MAX_BUFFER_SIZE {
            return Err(HeaderError::SizeTooLarge { have: self.nbytes(), max: MAX_BUFFER_SIZE });
        }
        if !self.is_memcpyed() {
            self.codec()?;
            if self.blocksize == 0 {
                return Err(HeaderError::BlocksizeZero);
            }
        }
        if self.cbytes() < Self::LEN {
            return Err(HeaderError::BufferTooShort { have: self.cbytes(), need: Self::LEN });
        }
        if self.is_memcpyed() && self.cbytes() != Self::LEN + self.nbytes() {
            return Err(HeaderError::StoredSizeMismatch { have: self.cbytes(), need: Self::LEN + self.nbytes() });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    /// Buffer too short to contain the header or the declared payload.
    #[error("frame buffer too short: {have} < {need}")]
    BufferTooShort { have: usize, need: usize },

    #[error("unsupported frame version: {have} (max {max})")]
    UnsupportedVersion { have: u8, max: u8 },

    #[error("unsupported block layout version: {have} (max {max})")]
    UnsupportedCodecVersion { have: u8, max: u8 },

    #[error("unknown compressor in frame: {}", enum_name_or_hex::<CompressionCodec>(*.raw))]
    UnknownCompression { raw: u8 },

    #[error("unknown shuffle mode: {raw}")]
    UnknownShuffle { raw: u8 },

    #[error("reserved flag bits set: 0x{flags:02x}")]
    ReservedFlags { flags: u8 },

    #[error("typesize is zero")]
    TypesizeZero,

    #[error("blocksize is zero for a non-empty frame")]
    BlocksizeZero,

    #[error("uncompressed size too large: {have} > {max}")]
    SizeTooLarge { have: usize, max: usize },

    /// The header's `cbytes` disagrees with the buffer handed in.
    #[error("not a compressed frame or header is corrupted: header says {header} bytes, buffer has {actual}")]
    CbytesMismatch { header: usize, actual: usize },

    #[error("stored frame has {have} bytes, expected {need}")]
    StoredSizeMismatch { have: usize, need: usize },

    #[error("block {block} offset {offset} out of bounds for frame of {len} bytes")]
    BlockOutOfBounds { block: usize, offset: usize, len: usize },
}

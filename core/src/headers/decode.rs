//! headers/decode.rs
//!
//! Header decoding utilities.
//!
//! Design notes:
//! - Deserializes the first 16 bytes of a frame into a `FrameHeader`.
//! - Field order must match `encode.rs` exactly.
//! - Validation runs after decoding to reject malformed or foreign buffers.

use crate::headers::types::{FrameHeader, HeaderError};

/// Read the raw header fields without validating them.
#[inline]
pub fn read_header_le(buf: &[u8]) -> Result<FrameHeader, HeaderError> {
    if buf.len() < FrameHeader::LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: FrameHeader::LEN });
    }

    let mut i = 0usize;
    #[inline] fn get_u8(buf: &[u8], i: &mut usize) -> u8 { let v = buf[*i]; *i += 1; v }
    #[inline] fn get_u32(buf: &[u8], i: &mut usize) -> u32 {
        let mut b = [0u8; 4]; b.copy_from_slice(&buf[*i..*i + 4]); *i += 4; u32::from_le_bytes(b)
    }

    let h = FrameHeader {
        version:       get_u8(buf, &mut i),   // 0      frame version
        codec_version: get_u8(buf, &mut i),   // 1      block layout version
        flags:         get_u8(buf, &mut i),   // 2      flags + compressor code
        typesize:      get_u8(buf, &mut i),   // 3      typesize
        nbytes:        get_u32(buf, &mut i),  // 4..8   uncompressed size
        blocksize:     get_u32(buf, &mut i),  // 8..12  blocksize
        cbytes:        get_u32(buf, &mut i),  // 12..16 compressed size
    };

    debug_assert_eq!(i, FrameHeader::LEN, "decoding consumed incorrect length");

    Ok(h)
}

/// Decode and validate a header, checking `cbytes` against the buffer length.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<FrameHeader, HeaderError> {
    let h = read_header_le(buf)?;
    h.validate()?;

    if h.cbytes() != buf.len() {
        return Err(HeaderError::CbytesMismatch { header: h.cbytes(), actual: buf.len() });
    }

    Ok(h)
}

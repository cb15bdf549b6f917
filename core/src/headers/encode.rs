//! headers/encode.rs
//!
//! Header encoding utilities.
//!
//! Design notes:
//! - Serializes `FrameHeader` into a fixed 16-byte buffer in little-endian order.
//! - Field order must match `decode.rs` exactly.

use crate::headers::types::FrameHeader;

/// Serialize a `FrameHeader` into its 16-byte wire form.
#[inline]
pub fn encode_header_le(h: &FrameHeader) -> [u8; FrameHeader::LEN] {
    let mut out = [0u8; FrameHeader::LEN];
    let mut i = 0usize;

    fn put_u8(out: &mut [u8], i: &mut usize, v: u8) {
        out[*i] = v;
        *i += 1;
    }
    fn put_u32(out: &mut [u8], i: &mut usize, v: u32) {
        out[*i..*i + 4].copy_from_slice(&v.to_le_bytes());
        *i += 4;
    }

    put_u8(&mut out, &mut i, h.version);        // 0      frame version
    put_u8(&mut out, &mut i, h.codec_version);  // 1      block layout version
    put_u8(&mut out, &mut i, h.flags);          // 2      flags + compressor code
    put_u8(&mut out, &mut i, h.typesize);       // 3      typesize
    put_u32(&mut out, &mut i, h.nbytes);        // 4..8   uncompressed size
    put_u32(&mut out, &mut i, h.blocksize);     // 8..12  blocksize
    put_u32(&mut out, &mut i, h.cbytes);        // 12..16 compressed size

    debug_assert_eq!(i, FrameHeader::LEN, "encoding wrote incorrect length");

    out
}

/// Overwrite the header at the front of `frame`.
pub fn write_header(frame: &mut [u8], h: &FrameHeader) {
    frame[..FrameHeader::LEN].copy_from_slice(&encode_header_le(h));
}

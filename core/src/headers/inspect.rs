//! headers/inspect.rs
//! Block table reader for block-engine frames.

use crate::headers::types::{FrameHeader, HeaderError};

/// One block record located inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Offset of the payload (after the `csize` prefix).
    pub start: usize,
    /// Payload length on the wire.
    pub csize: usize,
    /// Length once decompressed.
    pub raw_len: usize,
}

impl BlockSpan {
    /// A block whose payload is as long as its raw data was stored verbatim.
    pub fn is_stored(&self) -> bool {
        self.csize == self.raw_len
    }
}

/// Read and bounds-check the block table of a non-stored frame.
pub fn block_spans(frame: &[u8], h: &FrameHeader) -> Result<Vec<BlockSpan>, HeaderError> {
    let nblocks = h.nblocks();
    let table_end = FrameHeader::LEN + nblocks * 4;
    if frame.len() < table_end {
        return Err(HeaderError::BufferTooShort { have: frame.len(), need: table_end });
    }

    let read_u32 = |at: usize| -> usize {
        let mut b = [0u8; 4];
        b.copy_from_slice(&frame[at..at + 4]);
        u32::from_le_bytes(b) as usize
    };

    let mut spans = Vec::with_capacity(nblocks);
    for block in 0..nblocks {
        let offset = read_u32(FrameHeader::LEN + block * 4);
        let out_of_bounds = HeaderError::BlockOutOfBounds { block, offset, len: frame.len() };

        if offset < table_end || offset.checked_add(4).map_or(true, |end| end > frame.len()) {
            return Err(out_of_bounds);
        }
        let csize = read_u32(offset);
        let raw_len = h.block_len(block);
        let start = offset + 4;
        if csize == 0 || csize > raw_len || start + csize > frame.len() {
            return Err(out_of_bounds);
        }
        spans.push(BlockSpan { start, csize, raw_len });
    }
    Ok(spans)
}

//! engine/block.rs
//! Default engine: split into blocks, shuffle, compress each block with the
//! registry codec, assemble in block order.
//!
//! Frame body after the 16-byte header:
//! - `nblocks` little-endian u32 offsets, one per block record
//! - per block: u32 `csize` followed by `csize` payload bytes
//!
//! A block whose `csize` equals its raw length holds the (shuffled) bytes
//! verbatim. Whole frames fall back to a stored copy when compression would
//! exceed `nbytes + MAX_OVERHEAD`.

use std::thread;

use crossbeam::channel::bounded;
use log::{debug, trace, warn};

use crate::compression::shuffle::{shuffle, unshuffle};
use crate::compression::{create_compressor, create_decompressor, CompressionError, Compressor, Decompressor};
use crate::config::EngineConfig;
use crate::constants::{MAX_BLOCKSIZE, MAX_BUFFER_SIZE, MAX_OVERHEAD, MIN_BLOCKSIZE, MIN_BUFFER_SIZE};
use crate::engine::{Engine, FrameParams, ScratchPool};
use crate::headers::{block_spans, decode_header_le, read_header_le, write_header, BlockSpan, FrameHeader, Shuffle};
use crate::types::{BloscError, Result};
use crate::utils::fmt_bytes;
use crate::validation::validate_length;

#[derive(Debug, Default)]
pub struct BlockEngine {
    scratch: ScratchPool,
}

impl BlockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scratch(&self) -> &ScratchPool {
        &self.scratch
    }

    fn compress_block(
        &self,
        block: &[u8],
        typesize: usize,
        shuffled: bool,
        compressor: &dyn Compressor,
    ) -> std::result::Result<Vec<u8>, CompressionError> {
        let scratch = shuffled.then(|| {
            let mut buf = self.scratch.take(block.len());
            shuffle(typesize, block, &mut buf);
            buf
        });
        let input = scratch.as_deref().unwrap_or(block);

        let mut out = Vec::with_capacity(block.len());
        compressor.compress_chunk(input, &mut out)?;
        if out.is_empty() || out.len() >= block.len() {
            out.clear();
            out.extend_from_slice(input);
        }
        trace!("block: raw={} csize={}", block.len(), out.len());

        if let Some(buf) = scratch {
            self.scratch.give(buf);
        }
        Ok(out)
    }

    fn decompress_block(
        &self,
        payload: &[u8],
        span: BlockSpan,
        out: &mut [u8],
        typesize: usize,
        shuffled: bool,
        decompressor: &dyn Decompressor,
    ) -> std::result::Result<usize, CompressionError> {
        if !shuffled {
            if span.is_stored() {
                out.copy_from_slice(payload);
                return Ok(out.len());
            }
            return decompressor.decompress_chunk(payload, out);
        }

        let mut buf = self.scratch.take(out.len());
        if span.is_stored() {
            buf.copy_from_slice(payload);
        } else {
            decompressor.decompress_chunk(payload, &mut buf)?;
        }
        unshuffle(typesize, &buf, out);
        self.scratch.give(buf);
        Ok(out.len())
    }
}

impl Engine for BlockEngine {
    fn compress(&self, src: &[u8], params: &FrameParams, cfg: &EngineConfig) -> Result<Vec<u8>> {
        validate_length(src.len(), MAX_BUFFER_SIZE)?;

        let nbytes = src.len();
        let typesize = params.typesize as usize;
        let blocksize = compute_blocksize(params.clevel, typesize, nbytes, cfg.blocksize);
        let header = FrameHeader::new(params.compressor, params.shuffle, params.typesize, nbytes as u32, blocksize as u32);

        if params.clevel == 0 || nbytes < MIN_BUFFER_SIZE {
            debug!("compress: storing {} bytes (clevel={})", nbytes, params.clevel);
            return Ok(stored_frame(header, src));
        }

        let compressor = create_compressor(params.compressor, params.clevel);
        let shuffled = params.shuffle == Shuffle::Byte && typesize > 1;
        let blocks: Vec<&[u8]> = src.chunks(blocksize).collect();
        let nblocks = blocks.len();

        let payloads = run_ordered(blocks, cfg.nthreads, |block| {
            self.compress_block(block, typesize, shuffled, compressor.as_ref())
        })?;

        let table_end = FrameHeader::LEN + nblocks * 4;
        let body: usize = payloads.iter().map(|p| 4 + p.len()).sum();
        if table_end + body > nbytes + MAX_OVERHEAD {
            if nbytes >= MAX_BLOCKSIZE {
                warn!("compress: {} bytes did not compress with {}, storing", nbytes, params.compressor);
            }
            return Ok(stored_frame(header, src));
        }

        let mut frame = vec![0u8; table_end];
        frame.reserve(body);
        let mut offset = table_end;
        for (i, payload) in payloads.iter().enumerate() {
            let at = FrameHeader::LEN + i * 4;
            frame[at..at + 4].copy_from_slice(&(offset as u32).to_le_bytes());
            offset += 4 + payload.len();
        }
        for payload in &payloads {
            frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            frame.extend_from_slice(payload);
        }

        let mut header = header;
        header.cbytes = frame.len() as u32;
        write_header(&mut frame, &header);

        debug!(
            "compress: {} -> {} bytes, codec={} clevel={} blocks={} threads={}",
            nbytes, frame.len(), params.compressor, params.clevel, nblocks, cfg.nthreads.min(nblocks)
        );
        Ok(frame)
    }

    fn decompress_into(&self, frame: &[u8], dst: &mut [u8], cfg: &EngineConfig) -> Result<usize> {
        let h = self.frame_header(frame)?;
        let nbytes = h.nbytes();
        if dst.len() < nbytes {
            return Err(BloscError::range("destination length", dst.len() as i128, nbytes as i128, MAX_BUFFER_SIZE as i128));
        }
        let dst = &mut dst[..nbytes];

        if h.is_memcpyed() {
            dst.copy_from_slice(&frame[FrameHeader::LEN..]);
            debug!("decompress: stored frame of {} bytes", nbytes);
            return Ok(nbytes);
        }

        let spans = block_spans(frame, &h)?;
        let decompressor = create_decompressor(h.codec()?);
        let typesize = h.typesize as usize;
        let shuffled = h.shuffle() == Shuffle::Byte && typesize > 1;

        let jobs: Vec<(BlockSpan, &mut [u8])> = spans.into_iter().zip(dst.chunks_mut(h.blocksize())).collect();
        let written = run_ordered(jobs, cfg.nthreads, |(span, out)| {
            let payload = &frame[span.start..span.start + span.csize];
            self.decompress_block(payload, span, out, typesize, shuffled, decompressor.as_ref())
        })
        .map_err(|e| BloscError::Format(format!("corrupted block payload: {e}")))?;

        let total: usize = written.iter().sum();
        if total != nbytes {
            return Err(BloscError::Format(format!("decompressed {total} bytes, header declares {nbytes}")));
        }
        debug!("decompress: {} -> {} bytes, blocks={}", frame.len(), nbytes, written.len());
        Ok(nbytes)
    }

    fn read_header(&self, frame: &[u8]) -> Result<FrameHeader> {
        Ok(read_header_le(frame)?)
    }

    fn frame_header(&self, frame: &[u8]) -> Result<FrameHeader> {
        decode_header_le(frame).map_err(|e| {
            debug!("rejecting frame {}: {}", fmt_bytes(&frame[..frame.len().min(FrameHeader::LEN)]), e);
            e.into()
        })
    }

    fn validate_frame(&self, frame: &[u8]) -> bool {
        match decode_header_le(frame) {
            Ok(h) if h.is_memcpyed() => true,
            Ok(h) => block_spans(frame, &h).is_ok(),
            Err(_) => false,
        }
    }

    fn free_resources(&self) {
        let released = self.scratch.clear();
        debug!("free_resources: released {} scratch bytes", released);
    }
}

/// Blocksize for one call. A forced size (from the configuration) wins over
/// the clevel-based default; either is clamped to `nbytes` and rounded down
/// to a whole number of elements.
pub fn compute_blocksize(clevel: u8, typesize: usize, nbytes: usize, forced: usize) -> usize {
    let base = if forced > 0 {
        forced.max(MIN_BUFFER_SIZE)
    } else {
        match clevel {
            0..=3 => MIN_BLOCKSIZE,
            4 | 5 => MIN_BLOCKSIZE * 2,
            6 => MIN_BLOCKSIZE * 4,
            _ => MAX_BLOCKSIZE,
        }
    };

    let mut blocksize = base.min(nbytes);
    if typesize > 1 && blocksize > typesize {
        blocksize -= blocksize % typesize;
    }
    blocksize.max(1)
}

fn stored_frame(mut header: FrameHeader, src: &[u8]) -> Vec<u8> {
    header.set_memcpyed();
    header.cbytes = (FrameHeader::LEN + src.len()) as u32;

    let mut frame = Vec::with_capacity(FrameHeader::LEN + src.len());
    frame.extend_from_slice(&[0u8; FrameHeader::LEN]);
    frame.extend_from_slice(src);
    write_header(&mut frame, &header);
    frame
}

/// Run `work` over `jobs` on up to `nthreads` scoped workers and return the
/// results in job order.
fn run_ordered<J, R, F>(jobs: Vec<J>, nthreads: usize, work: F) -> std::result::Result<Vec<R>, CompressionError>
where
    J: Send,
    R: Send,
    F: Fn(J) -> std::result::Result<R, CompressionError> + Sync,
{
    let njobs = jobs.len();
    let workers = nthreads.clamp(1, njobs.max(1));
    if workers == 1 {
        return jobs.into_iter().map(&work).collect();
    }

    let (job_tx, job_rx) = bounded::<(usize, J)>(njobs);
    let (out_tx, out_rx) = bounded::<(usize, std::result::Result<R, CompressionError>)>(njobs);

    for job in jobs.into_iter().enumerate() {
        job_tx
            .send(job)
            .map_err(|_| CompressionError::WorkerPanicked("job channel closed".into()))?;
    }
    drop(job_tx);

    let work = &work;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let rx = job_rx.clone();
                let tx = out_tx.clone();
                scope.spawn(move || {
                    for (index, job) in rx.iter() {
                        if tx.send((index, work(job))).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        handles.into_iter().try_for_each(|handle| {
            handle
                .join()
                .map_err(|_| CompressionError::WorkerPanicked("block worker panicked".into()))
        })
    })?;
    drop(out_tx);

    let mut slots: Vec<Option<R>> = (0..njobs).map(|_| None).collect();
    for (index, result) in out_rx.try_iter() {
        slots[index] = Some(result?);
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or_else(|| CompressionError::WorkerPanicked(format!("block {index} produced no result"))))
        .collect()
}

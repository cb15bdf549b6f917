//! engine/native.rs
//! Engine backed by the C-Blosc2 library. Blocking, shuffle, the codecs and
//! the worker threads all run inside the library; frames are standard Blosc2
//! chunks that any Blosc2 implementation can read.
//!
//! Each call builds its own compression or decompression context from the
//! configuration snapshot, so no global library state is shared between
//! callers.

#![allow(unsafe_code)]

use std::ffi::{c_void, CStr};
use std::sync::Once;

use blosc2_sys as ffi;
use log::{debug, warn};

use crate::compression::{CompressionCodec, CompressionError};
use crate::config::EngineConfig;
use crate::constants::MAX_BUFFER_SIZE;
use crate::engine::{Engine, FrameParams};
use crate::headers::{FrameHeader, HeaderError, Shuffle};
use crate::types::{BloscError, Result};
use crate::utils::fmt_bytes;
use crate::validation::validate_length;

/// Both shuffle bits set in byte 2 mark a Blosc2 extended header, whose
/// filter pipeline follows the first 16 bytes.
const EXTENDED_HEADER: u8 = (ffi::BLOSC_DOSHUFFLE as u8) | (ffi::BLOSC_DOBITSHUFFLE as u8);
const FILTERS_START: usize = FrameHeader::LEN;
const FILTERS_END: usize = FILTERS_START + ffi::BLOSC2_MAX_FILTERS as usize;

static LIBRARY_INIT: Once = Once::new();

#[derive(Debug)]
pub struct Blosc2Engine;

impl Blosc2Engine {
    /// The library's global state (codec registry, shared pools) is set up
    /// once per process, on the first engine created.
    pub fn new() -> Self {
        // SAFETY: takes no arguments; `Once` serializes the single call.
        LIBRARY_INIT.call_once(|| unsafe { ffi::blosc2_init() });
        Self
    }
}

impl Default for Blosc2Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned `blosc2_context`, freed on drop.
struct Context(*mut ffi::blosc2_context);

impl Context {
    fn compression(params: &FrameParams, cfg: &EngineConfig) -> Result<Self> {
        let mut cparams = ffi::blosc2_cparams::default();
        cparams.compcode = compcode(params.compressor) as _;
        cparams.clevel = params.clevel as _;
        cparams.typesize = params.typesize as _;
        cparams.nthreads = cfg.nthreads as _;
        cparams.blocksize = cfg.blocksize as _;
        cparams.splitmode = ffi::BLOSC_FORWARD_COMPAT_SPLIT as _;
        cparams.filters[ffi::BLOSC2_MAX_FILTERS as usize - 1] = match params.shuffle {
            Shuffle::Byte => ffi::BLOSC_SHUFFLE as _,
            Shuffle::NoShuffle => ffi::BLOSC_NOFILTER as _,
        };
        // SAFETY: `cparams` is fully initialized and passed by value.
        Self::checked(unsafe { ffi::blosc2_create_cctx(cparams) }, "compression")
    }

    fn decompression(cfg: &EngineConfig) -> Result<Self> {
        let mut dparams = ffi::blosc2_dparams::default();
        dparams.nthreads = cfg.nthreads as _;
        // SAFETY: `dparams` is fully initialized and passed by value.
        Self::checked(unsafe { ffi::blosc2_create_dctx(dparams) }, "decompression")
    }

    fn checked(ctx: *mut ffi::blosc2_context, what: &str) -> Result<Self> {
        if ctx.is_null() {
            return Err(native_error(format!("could not create a {what} context")));
        }
        Ok(Self(ctx))
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `blosc2_create_*ctx` and is freed once.
        unsafe { ffi::blosc2_free_ctx(self.0) };
    }
}

fn compcode(codec: CompressionCodec) -> u32 {
    match codec {
        CompressionCodec::Lz4 => ffi::BLOSC_LZ4 as u32,
        CompressionCodec::Zlib => ffi::BLOSC_ZLIB as u32,
        CompressionCodec::Zstd => ffi::BLOSC_ZSTD as u32,
    }
}

fn native_error(msg: String) -> BloscError {
    CompressionError::CodecProcessFailed { codec: "blosc2", msg }.into()
}

fn rejected(frame: &[u8], what: &str, rc: i32) -> BloscError {
    debug!("blosc2 rejected frame {}: {} ({})", fmt_bytes(&frame[..frame.len().min(FrameHeader::LEN)]), what, rc);
    BloscError::Format(format!("{what} rejected by blosc2 (code {rc})"))
}

impl Engine for Blosc2Engine {
    fn compress(&self, src: &[u8], params: &FrameParams, cfg: &EngineConfig) -> Result<Vec<u8>> {
        validate_length(src.len(), MAX_BUFFER_SIZE)?;

        let ctx = Context::compression(params, cfg)?;
        let capacity = (src.len() + self.max_overhead()).min(i32::MAX as usize);
        let mut frame = vec![0u8; capacity];

        // SAFETY: both buffers are live for the call and the lengths passed
        // are their own; both fit in i32.
        let rc = unsafe {
            ffi::blosc2_compress_ctx(
                ctx.0,
                src.as_ptr() as *const c_void,
                src.len() as _,
                frame.as_mut_ptr() as *mut c_void,
                frame.len() as _,
            )
        };
        if rc <= 0 {
            return Err(native_error(format!("blosc2_compress_ctx returned {rc}")));
        }
        frame.truncate(rc as usize);

        debug!(
            "compress: {} -> {} bytes, codec={} clevel={} threads={}",
            src.len(), frame.len(), params.compressor, params.clevel, cfg.nthreads
        );
        Ok(frame)
    }

    fn decompress_into(&self, frame: &[u8], dst: &mut [u8], cfg: &EngineConfig) -> Result<usize> {
        let h = self.frame_header(frame)?;
        let nbytes = h.nbytes();
        if dst.len() < nbytes {
            return Err(BloscError::range("destination length", dst.len() as i128, nbytes as i128, MAX_BUFFER_SIZE as i128));
        }

        let ctx = Context::decompression(cfg)?;
        // SAFETY: `frame` was validated against its own length and `dst`
        // holds at least `nbytes` writable bytes.
        let rc = unsafe {
            ffi::blosc2_decompress_ctx(
                ctx.0,
                frame.as_ptr() as *const c_void,
                frame.len() as _,
                dst.as_mut_ptr() as *mut c_void,
                nbytes as _,
            )
        };
        if rc < 0 {
            return Err(BloscError::Format(format!("corrupted block payload: blosc2 error {rc}")));
        }
        if rc as usize != nbytes {
            return Err(BloscError::Format(format!("decompressed {rc} bytes, header declares {nbytes}")));
        }
        debug!("decompress: {} -> {} bytes", frame.len(), nbytes);
        Ok(nbytes)
    }

    fn read_header(&self, frame: &[u8]) -> Result<FrameHeader> {
        let need = match frame.get(2) {
            Some(&flags) if flags & EXTENDED_HEADER == EXTENDED_HEADER => ffi::BLOSC_EXTENDED_HEADER_LENGTH as usize,
            _ => FrameHeader::LEN,
        };
        if frame.len() < need {
            return Err(HeaderError::BufferTooShort { have: frame.len(), need }.into());
        }

        let (mut nbytes, mut cbytes, mut blocksize) = (0i32, 0i32, 0i32);
        // SAFETY: the library reads at most the (extended) header, which
        // `frame` holds in full.
        let rc = unsafe {
            ffi::blosc2_cbuffer_sizes(
                frame.as_ptr() as *const c_void,
                &mut nbytes as *mut _,
                &mut cbytes as *mut _,
                &mut blocksize as *mut _,
            )
        };
        if rc < 0 {
            return Err(rejected(frame, "frame header", rc));
        }

        let (mut typesize, mut flags) = (0usize, 0i32);
        // SAFETY: as above; the out-pointers are live locals.
        unsafe { ffi::blosc1_cbuffer_metainfo(frame.as_ptr() as *const c_void, &mut typesize as *mut _, &mut flags as *mut _) };
        let flags = flags as u8;

        // SAFETY: as above; the returned name is a static C string or null.
        let lib = unsafe { ffi::blosc1_cbuffer_complib(frame.as_ptr() as *const c_void) };
        if lib.is_null() {
            return Err(HeaderError::UnknownCompression { raw: flags >> 5 }.into());
        }
        // SAFETY: non-null, NUL-terminated and static.
        let lib = unsafe { CStr::from_ptr(lib) }.to_string_lossy();
        let codec = CompressionCodec::ALL
            .into_iter()
            .find(|c| c.library() == lib)
            .ok_or(HeaderError::UnknownCompression { raw: flags >> 5 })?;

        let shuffled = if flags & EXTENDED_HEADER == EXTENDED_HEADER {
            frame[FILTERS_START..FILTERS_END].contains(&(ffi::BLOSC_SHUFFLE as u8))
        } else {
            flags & ffi::BLOSC_DOSHUFFLE as u8 != 0
        };

        let mut header = FrameHeader::new(codec, Shuffle::from(shuffled), typesize as u8, nbytes as u32, blocksize as u32);
        header.version = frame[0];
        header.codec_version = frame[1];
        header.cbytes = cbytes as u32;
        if flags & ffi::BLOSC_MEMCPYED as u8 != 0 {
            header.set_memcpyed();
        }
        Ok(header)
    }

    fn frame_header(&self, frame: &[u8]) -> Result<FrameHeader> {
        if frame.len() < FrameHeader::LEN {
            return Err(HeaderError::BufferTooShort { have: frame.len(), need: FrameHeader::LEN }.into());
        }

        let mut declared = 0usize;
        // SAFETY: the real length of `frame` is passed, so the library never
        // reads past it.
        let rc = unsafe { ffi::blosc1_cbuffer_validate(frame.as_ptr() as *const c_void, frame.len() as _, &mut declared as *mut _) };
        if rc < 0 {
            return Err(rejected(frame, "frame", rc));
        }

        let header = self.read_header(frame)?;
        if header.cbytes() != frame.len() {
            return Err(HeaderError::CbytesMismatch { header: header.cbytes(), actual: frame.len() }.into());
        }
        if declared > MAX_BUFFER_SIZE {
            return Err(HeaderError::SizeTooLarge { have: declared, max: MAX_BUFFER_SIZE }.into());
        }
        Ok(header)
    }

    fn max_overhead(&self) -> usize {
        ffi::BLOSC2_MAX_OVERHEAD as usize
    }

    fn free_resources(&self) {
        // SAFETY: takes no arguments; safe to call at any time.
        let rc = unsafe { ffi::blosc2_free_resources() };
        if rc < 0 {
            warn!("blosc2_free_resources returned {}", rc);
        } else {
            debug!("free_resources: released blosc2 pools");
        }
    }
}

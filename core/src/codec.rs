//! codec.rs
//! Safe buffer codec: validate, then hand owned buffers to the engine.

use serde::{Deserialize, Serialize};

use crate::compression::CompressionCodec;
use crate::config::EngineConfig;
use crate::constants::{DEFAULT_CLEVEL, MAX_BUFFER_SIZE, MAX_TYPESIZE};
use crate::engine::{Engine, FrameParams};
use crate::headers::Shuffle;
use crate::types::Result;
use crate::validation::{validate_length, validate_level, validate_typesize};

/// Per-call compression options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressOptions {
    pub clevel: i32,
    pub shuffle: Shuffle,
    /// `None` uses the configured default compressor.
    pub compressor: Option<CompressionCodec>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            clevel: DEFAULT_CLEVEL,
            shuffle: Shuffle::Byte,
            compressor: None,
        }
    }
}

impl CompressOptions {
    pub fn with_clevel(mut self, clevel: i32) -> Self {
        self.clevel = clevel;
        self
    }

    pub fn with_shuffle(mut self, shuffle: Shuffle) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_compressor(mut self, compressor: CompressionCodec) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Validate against `typesize` and resolve the compressor.
    pub(crate) fn frame_params(&self, typesize: usize, cfg: &EngineConfig) -> Result<FrameParams> {
        Ok(FrameParams {
            typesize: validate_typesize(typesize, MAX_TYPESIZE)?,
            clevel: validate_level(self.clevel)?,
            shuffle: self.shuffle,
            compressor: self.compressor.unwrap_or(cfg.compressor),
        })
    }
}

pub fn compress<E: Engine + ?Sized>(
    engine: &E,
    cfg: &EngineConfig,
    src: &[u8],
    typesize: usize,
    opts: &CompressOptions,
) -> Result<Vec<u8>> {
    let params = opts.frame_params(typesize, cfg)?;
    validate_length(src.len(), MAX_BUFFER_SIZE)?;
    engine.compress(src, &params, cfg)
}

pub fn decompress<E: Engine + ?Sized>(engine: &E, cfg: &EngineConfig, frame: &[u8]) -> Result<Vec<u8>> {
    let header = engine.frame_header(frame)?;
    let mut out = vec![0u8; header.nbytes()];
    let written = engine.decompress_into(frame, &mut out, cfg)?;
    out.truncate(written);
    Ok(out)
}

/// Decompress into a caller buffer of at least the frame's `nbytes`.
pub fn decompress_into<E: Engine + ?Sized>(
    engine: &E,
    cfg: &EngineConfig,
    frame: &[u8],
    dst: &mut [u8],
) -> Result<usize> {
    engine.decompress_into(frame, dst, cfg)
}

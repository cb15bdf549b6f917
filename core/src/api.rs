//! api.rs
//! `Blosc` facade: one controller plus one engine behind the caller-facing
//! operations. The zero-copy pointer operations are implemented in `ptr`.

use crate::array::{self, Array, ArrayLike};
use crate::codec::{self, CompressOptions};
use crate::compression::CompressionCodec;
use crate::config::EngineConfig;
use crate::controller::{Controller, Lifecycle};
use crate::engine::{DefaultEngine, Engine};
use crate::headers::{FrameHeader, Shuffle};
use crate::types::Result;

#[derive(Debug)]
pub struct Blosc<E: Engine = DefaultEngine> {
    pub(crate) controller: Controller,
    pub(crate) engine: E,
}

impl Blosc<DefaultEngine> {
    pub fn new() -> Self {
        Self { controller: Controller::default(), engine: DefaultEngine::new() }
    }

    /// Configuration taken from `BLOSC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_engine(DefaultEngine::new(), EngineConfig::from_env()?)
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::with_engine(DefaultEngine::new(), config)
    }
}

impl Default for Blosc<DefaultEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> Blosc<E> {
    pub fn with_engine(engine: E, config: EngineConfig) -> Result<Self> {
        Ok(Self { controller: Controller::new(config)?, engine })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn compress(&self, src: &[u8], typesize: usize, opts: &CompressOptions) -> Result<Vec<u8>> {
        let cfg = self.controller.snapshot();
        codec::compress(&self.engine, &cfg, src, typesize, opts)
    }

    pub fn decompress(&self, frame: &[u8]) -> Result<Vec<u8>> {
        let cfg = self.controller.snapshot();
        codec::decompress(&self.engine, &cfg, frame)
    }

    pub fn decompress_into(&self, frame: &[u8], dst: &mut [u8]) -> Result<usize> {
        let cfg = self.controller.snapshot();
        codec::decompress_into(&self.engine, &cfg, frame, dst)
    }

    /// Validated header of a compressed frame.
    pub fn frame_header(&self, frame: &[u8]) -> Result<FrameHeader> {
        self.engine.frame_header(frame)
    }

    /// `(nbytes, cbytes, blocksize)` from the header alone; a frame prefix
    /// holding the header is enough.
    pub fn cbuffer_sizes(&self, frame: &[u8]) -> Result<(usize, usize, usize)> {
        let h = self.engine.read_header(frame)?;
        Ok((h.nbytes(), h.cbytes(), h.blocksize()))
    }

    /// `(typesize, shuffle, compressor)` of a frame. Stored frames still
    /// report the compressor that was requested.
    pub fn cbuffer_metainfo(&self, frame: &[u8]) -> Result<(usize, Shuffle, CompressionCodec)> {
        let h = self.engine.read_header(frame)?;
        Ok((h.typesize as usize, h.shuffle(), h.codec()?))
    }

    /// Whether `frame` is a complete, well-formed frame.
    pub fn cbuffer_validate(&self, frame: &[u8]) -> bool {
        self.engine.validate_frame(frame)
    }

    /// Name of the compression library that produced `frame`.
    pub fn clib(&self, frame: &[u8]) -> Result<&'static str> {
        Ok(self.engine.read_header(frame)?.codec()?.library())
    }

    pub fn pack_array<A: ArrayLike + ?Sized>(&self, array: &A, opts: &CompressOptions) -> Result<Vec<u8>> {
        let cfg = self.controller.snapshot();
        array::pack(&self.engine, &cfg, array, opts)
    }

    pub fn unpack_array(&self, packed: &[u8]) -> Result<Array> {
        let cfg = self.controller.snapshot();
        array::unpack(&self.engine, &cfg, packed)
    }

    pub fn set_nthreads(&self, n: usize) -> Result<usize> {
        self.controller.set_nthreads(n)
    }

    pub fn nthreads(&self) -> usize {
        self.controller.nthreads()
    }

    pub fn set_blocksize(&self, blocksize: usize) -> Result<usize> {
        self.controller.set_blocksize(blocksize)
    }

    pub fn blocksize(&self) -> usize {
        self.controller.blocksize()
    }

    pub fn set_releasegil(&self, release: bool) -> bool {
        self.controller.set_releasegil(release)
    }

    pub fn releasegil(&self) -> bool {
        self.controller.releasegil()
    }

    pub fn set_compressor(&self, name: &str) -> Result<()> {
        self.controller.set_compressor(name).map(|_| ())
    }

    pub fn free_resources(&self) {
        self.controller.free_resources(&self.engine)
    }

    pub fn init(&self) -> bool {
        self.controller.init()
    }

    pub fn destroy(&self) -> bool {
        self.controller.destroy(&self.engine)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.controller.lifecycle()
    }

    pub fn config(&self) -> EngineConfig {
        self.controller.config()
    }
}

impl<E: Engine> Drop for Blosc<E> {
    fn drop(&mut self) {
        self.controller.destroy(&self.engine);
    }
}

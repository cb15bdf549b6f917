//! config.rs
//! Engine configuration: thread count, blocksize, default compressor and
//! the GIL-release policy consumed by the bindings.
//!
//! The controller owns one `EngineConfig` and hands a snapshot to every
//! engine call, so a call in flight never observes a concurrent change.

use std::env;

use serde::{Deserialize, Serialize};

use crate::compression::{CompressionCodec, DEFAULT_COMPRESSOR};
use crate::constants::{env_vars, MAX_BUFFER_SIZE, MAX_THREADS};
use crate::types::{BloscError, Result};
use crate::utils::detect_number_of_cores;
use crate::validation::validate_nthreads;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker threads used per call.
    #[serde(default = "default_nthreads")]
    pub nthreads: usize,
    /// Forced blocksize in bytes; 0 picks one from clevel and typesize.
    #[serde(default)]
    pub blocksize: usize,
    /// Compressor used when a call does not name one.
    #[serde(default = "default_compressor")]
    pub compressor: CompressionCodec,
    /// Whether bindings release the interpreter lock around engine calls.
    #[serde(default)]
    pub release_gil: bool,
}

fn default_nthreads() -> usize {
    detect_number_of_cores()
}

fn default_compressor() -> CompressionCodec {
    CompressionCodec::from_name(DEFAULT_COMPRESSOR).unwrap_or(CompressionCodec::Lz4)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nthreads: default_nthreads(),
            blocksize: 0,
            compressor: default_compressor(),
            release_gil: false,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `BLOSC_NTHREADS`, `BLOSC_BLOCKSIZE`,
    /// `BLOSC_COMPRESSOR` and `BLOSC_RELEASEGIL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(env_vars::NTHREADS) {
            cfg.nthreads = parse_usize(env_vars::NTHREADS, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::BLOCKSIZE) {
            cfg.blocksize = parse_usize(env_vars::BLOCKSIZE, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::COMPRESSOR) {
            cfg.compressor = CompressionCodec::from_name(raw.trim())?;
        }
        if let Some(raw) = lookup(env_vars::RELEASEGIL) {
            cfg.release_gil = parse_bool(env_vars::RELEASEGIL, &raw)?;
        }

        cfg.validate()?;
        log::debug!(
            "engine config: nthreads={} blocksize={} compressor={} release_gil={}",
            cfg.nthreads, cfg.blocksize, cfg.compressor, cfg.release_gil
        );
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        validate_nthreads(self.nthreads, MAX_THREADS)?;
        if self.blocksize > MAX_BUFFER_SIZE {
            return Err(BloscError::range("blocksize", self.blocksize as i128, 0, MAX_BUFFER_SIZE as i128));
        }
        Ok(())
    }
}

fn parse_usize(var: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| BloscError::TypeMismatch(format!("{var} must be a non-negative integer, got {raw:?}")))
}

fn parse_bool(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(BloscError::TypeMismatch(format!("{var} must be a boolean, got {raw:?}"))),
    }
}

//! controller.rs
//! Thread/resource controller: owns the engine configuration and the
//! library lifecycle.
//!
//! The mutex guards configuration reads and writes only. Engine calls run on
//! a snapshot taken under the lock, so concurrent setters never change a
//! call in flight.

use std::sync::{Mutex, MutexGuard};

use log::{debug, info};

use crate::compression::CompressionCodec;
use crate::config::EngineConfig;
use crate::constants::{MAX_BUFFER_SIZE, MAX_THREADS};
use crate::engine::Engine;
use crate::types::{BloscError, Result};
use crate::validation::validate_nthreads;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    Destroyed,
}

#[derive(Debug)]
struct ControllerState {
    lifecycle: Lifecycle,
    config: EngineConfig,
}

#[derive(Debug)]
pub struct Controller {
    state: Mutex<ControllerState>,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            state: Mutex::new(ControllerState {
                lifecycle: Lifecycle::Uninitialized,
                config: EngineConfig::default(),
            }),
        }
    }
}

impl Controller {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(ControllerState { lifecycle: Lifecycle::Uninitialized, config }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    /// Enter `Initialized`. Returns `true` when this call did the transition.
    pub fn init(&self) -> bool {
        let mut state = self.lock();
        if state.lifecycle == Lifecycle::Initialized {
            return false;
        }
        info!("controller: {:?} -> Initialized", state.lifecycle);
        state.lifecycle = Lifecycle::Initialized;
        true
    }

    /// Configuration snapshot for one engine call. A controller that was
    /// never initialized, or was destroyed, is initialized first.
    pub fn snapshot(&self) -> EngineConfig {
        let mut state = self.lock();
        if state.lifecycle != Lifecycle::Initialized {
            info!("controller: {:?} -> Initialized (on first use)", state.lifecycle);
            state.lifecycle = Lifecycle::Initialized;
        }
        state.config.clone()
    }

    /// Current configuration, without touching the lifecycle.
    pub fn config(&self) -> EngineConfig {
        self.lock().config.clone()
    }

    /// Set the worker count. Returns the previous value.
    pub fn set_nthreads(&self, n: usize) -> Result<usize> {
        let n = validate_nthreads(n, MAX_THREADS)?;
        let mut state = self.lock();
        let previous = std::mem::replace(&mut state.config.nthreads, n);
        debug!("set_nthreads: {} -> {}", previous, n);
        Ok(previous)
    }

    pub fn nthreads(&self) -> usize {
        self.lock().config.nthreads
    }

    /// Force a blocksize in bytes (0 = automatic). Returns the previous value.
    pub fn set_blocksize(&self, blocksize: usize) -> Result<usize> {
        if blocksize > MAX_BUFFER_SIZE {
            return Err(BloscError::range("blocksize", blocksize as i128, 0, MAX_BUFFER_SIZE as i128));
        }
        let mut state = self.lock();
        let previous = std::mem::replace(&mut state.config.blocksize, blocksize);
        debug!("set_blocksize: {} -> {}", previous, blocksize);
        Ok(previous)
    }

    pub fn blocksize(&self) -> usize {
        self.lock().config.blocksize
    }

    /// Set the GIL-release policy. Returns the previous policy.
    pub fn set_releasegil(&self, release: bool) -> bool {
        let mut state = self.lock();
        std::mem::replace(&mut state.config.release_gil, release)
    }

    pub fn releasegil(&self) -> bool {
        self.lock().config.release_gil
    }

    /// Set the default compressor by name. Returns the previous one.
    pub fn set_compressor(&self, name: &str) -> Result<CompressionCodec> {
        let codec = CompressionCodec::from_name(name)?;
        let mut state = self.lock();
        let previous = std::mem::replace(&mut state.config.compressor, codec);
        debug!("set_compressor: {} -> {}", previous, codec);
        Ok(previous)
    }

    pub fn compressor(&self) -> CompressionCodec {
        self.lock().config.compressor
    }

    /// Release pooled engine memory. Safe to call any number of times.
    pub fn free_resources<E: Engine + ?Sized>(&self, engine: &E) {
        let _state = self.lock();
        engine.free_resources();
    }

    /// Release engine resources and enter `Destroyed`. Only the first call
    /// after an initialization does any work; returns whether it did.
    pub fn destroy<E: Engine + ?Sized>(&self, engine: &E) -> bool {
        let mut state = self.lock();
        if state.lifecycle == Lifecycle::Destroyed {
            return false;
        }
        engine.free_resources();
        info!("controller: {:?} -> Destroyed", state.lifecycle);
        state.lifecycle = Lifecycle::Destroyed;
        true
    }
}

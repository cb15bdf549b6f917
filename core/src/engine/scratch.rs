//! engine/scratch.rs
//! Pool of reusable block buffers shared by the engine workers.

use std::sync::Mutex;

use crate::constants::MAX_THREADS;

#[derive(Debug, Default)]
pub struct ScratchPool {
    buffers: Mutex<Vec<Vec<u8>>>,
}

impl ScratchPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zeroed buffer of exactly `len` bytes.
    pub fn take(&self, len: usize) -> Vec<u8> {
        let mut buf = self
            .buffers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop()
            .unwrap_or_default();
        buf.clear();
        buf.resize(len, 0);
        buf
    }

    /// Return a buffer for reuse. At most one buffer per possible worker is kept.
    pub fn give(&self, buf: Vec<u8>) {
        let mut buffers = self.buffers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if buffers.len() < MAX_THREADS {
            buffers.push(buf);
        }
    }

    /// Drop every pooled buffer. Returns the number of bytes released.
    pub fn clear(&self) -> usize {
        let mut buffers = self.buffers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let released = buffers.iter().map(Vec::capacity).sum();
        buffers.clear();
        buffers.shrink_to_fit();
        released
    }

    pub fn pooled(&self) -> usize {
        self.buffers.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

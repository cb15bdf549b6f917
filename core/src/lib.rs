//! blosc-core
//!
//! Validation, frame format and zero-copy layer over a blocked-shuffling
//! compression engine.
//! No Python, no PyO3. `unsafe` lives in `ptr` and in the C-Blosc2 binding
//! (`engine::native`).

#![deny(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;
pub mod validation;

// Frame format and engine
pub mod compression;
pub mod headers;
pub mod engine;

// Caller-facing layers
pub mod codec;
pub mod ptr;
pub mod array;
pub mod controller;
pub mod api;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::api::Blosc;
    pub use crate::array::{Array, ArrayLike, ByteOrder, Element, ElementKind, MemoryOrder};
    pub use crate::codec::CompressOptions;
    pub use crate::compression::CompressionCodec;
    pub use crate::config::EngineConfig;
    pub use crate::controller::Lifecycle;
    pub use crate::engine::{BlockEngine, DefaultEngine, Engine};
    #[cfg(feature = "blosc2")]
    pub use crate::engine::Blosc2Engine;
    pub use crate::headers::Shuffle;
    pub use crate::types::{BloscError, ErrorKind, Result};
    pub use crate::validation::{validate_address_type, AddressArg, RawAddress};
}

use thiserror::Error;

use crate::{compression::CompressionError, headers::HeaderError};

/// Coarse classification of every failure the layer reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value lies outside an engine- or protocol-defined bound.
    Range,
    /// An input lacks the structure required (not integral, not an array).
    TypeMismatch,
    /// A compressed frame or packed record is malformed or truncated.
    Format,
    /// The engine or one of its codecs reported a failure.
    Engine,
}

/// Unified error for validator, codecs, engine and array packing.
/// - `From` impls let `?` lift header and codec errors.
/// - Messages are stable; bindings surface them verbatim.
#[derive(Debug, Error)]
pub enum BloscError {
    #[error("{what} out of range: {value} not in [{min}, {max}]")]
    Range {
        what: &'static str,
        value: i128,
        min: i128,
        max: i128,
    },

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("invalid frame: {0}")]
    Header(#[from] HeaderError),

    #[error("format error: {0}")]
    Format(String),

    #[error("engine error: {0}")]
    Engine(#[from] CompressionError),
}

impl BloscError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BloscError::Range { .. } => ErrorKind::Range,
            BloscError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            BloscError::Header(_) | BloscError::Format(_) => ErrorKind::Format,
            BloscError::Engine(_) => ErrorKind::Engine,
        }
    }

    pub(crate) fn range(what: &'static str, value: i128, min: i128, max: i128) -> Self {
        BloscError::Range { what, value, min, max }
    }
}

pub type Result<T> = std::result::Result<T, BloscError>;

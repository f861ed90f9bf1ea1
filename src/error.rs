//! Crate-level error type
//!
//! Each stage owns its own error; [`Error`] wraps them so callers working
//! with [`OmssaFile`](crate::OmssaFile) can still tell which stage failed.

use crate::index::IndexError;
use crate::mods::ModificationFileError;
use crate::omx::DecodeError;

/// Errors from decoding, indexing or loading modifications
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The OMX document could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded document could not be indexed
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A modification file could not be loaded
    #[error(transparent)]
    Modifications(#[from] ModificationFileError),
}

/// Result alias for [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

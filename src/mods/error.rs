use std::path::PathBuf;

use crate::omx::DecodeError;

/// One modification file could not be loaded
///
/// Loading is per file: a failure here leaves entries loaded from other
/// files in place.
#[derive(Debug, thiserror::Error)]
#[error("Failed to load modification file {}: {source}", path.display())]
pub struct ModificationFileError {
    /// File that failed
    pub path: PathBuf,
    /// Why it failed
    #[source]
    pub source: DecodeError,
}

use std::io;
use std::path::PathBuf;

/// Errors produced by the provenance store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The digest directory could not be created.
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during a proof, receipt, or signature write.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the store crate.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

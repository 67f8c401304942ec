use std::io;

use seal_crypto::HashError;
use seal_store::StoreError;

/// Errors raised while generating a proof.
///
/// These never escape the [`process`](crate::ProofEngine::process) boundary:
/// the façade logs them and returns no digest, so a single bad input cannot
/// take down the watching process.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The source could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The provenance store rejected a write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The content stream could not be opened.
    #[error("cannot open content stream: {0}")]
    Stream(#[from] io::Error),

    /// A blocking worker task failed to complete.
    #[error("task failed: {0}")]
    Task(String),
}

/// Convenience alias used throughout the engine crate.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

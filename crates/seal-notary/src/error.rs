use std::io;

/// A provider payload that could not be decoded into raw receipt bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors surfaced by the notarization subsystem.
#[derive(Debug, thiserror::Error)]
pub enum NotaryError {
    /// A fresh content stream could not be opened for a provider.
    #[error("content stream unavailable: {0}")]
    Stream(#[from] io::Error),

    /// The provider payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The proof sink failed to persist a successful notarization.
    #[error("proof sink failed: {0}")]
    Sink(String),
}

/// Convenience alias used throughout the notary crate.
pub type NotaryResult<T> = std::result::Result<T, NotaryError>;

//! Notarization orchestration.
//!
//! A [`Notarizer`] launches one independent asynchronous task per configured
//! [`NotarizationProvider`]. Tasks are fully uncoordinated: a provider's
//! success or failure never blocks, cancels, or alters another provider's
//! task, and the orchestrator never waits for them before returning to its
//! caller. Successful results are decoded and handed to the [`ProofSink`]
//! seam, which the engine implements as an append-and-resign under the
//! per-digest lock.

pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod receipt;

pub use error::{DecodeError, NotaryError, NotaryResult};
pub use orchestrator::Notarizer;
pub use provider::{
    AlwaysOnline, ConnectivityCheck, ContentStreams, NotarizationProvider, Offline, ProofSink,
};
pub use receipt::{
    AttestationEvidence, NotarizationOutcome, NotarizationReceipt, PayloadEncoding,
    ProviderFailure, ProviderResponse,
};

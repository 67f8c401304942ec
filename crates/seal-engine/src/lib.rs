//! The SEAL proof engine façade.
//!
//! [`ProofEngine`] is the single entry point: it resolves a content digest,
//! short-circuits when a proof already exists, writes and signs the baseline
//! evidence record, and launches concurrent notarization. The intake side
//! ([`ProofEngine::start`]) consumes raw capture events, debounces them, and
//! serializes baseline processing through one worker task.
//!
//! The engine is explicit process-wide state: construct one, pass the handle
//! around, and call [`ProofEngine::stop`] to detach intake. There is no
//! hidden global instance.

pub mod config;
pub mod engine;
pub mod error;
pub mod source;
pub mod watcher;

pub use config::EngineConfig;
pub use engine::ProofEngine;
pub use error::{EngineError, EngineResult};
pub use source::{ContentStreamProvider, FsStreams};

// The policy types callers wire into an engine.
pub use seal_record::{EvidenceOptions, LocationPolicy};

//! Foundation types for SEAL, the media provenance proof engine.
//!
//! This crate provides the identity and event types used throughout the
//! SEAL system. Every other SEAL crate depends on `seal-types`.
//!
//! # Key Types
//!
//! - [`ContentDigest`] — SHA-256 content hash, the sole storage key
//! - [`ProviderTag`] — short file tag identifying a notarization provider
//! - [`MediaSource`] — logical reference to a piece of media content
//! - [`CaptureEvent`] — a raw file-system change notification

pub mod digest;
pub mod error;
pub mod event;
pub mod provider;
pub mod source;

pub use digest::ContentDigest;
pub use error::TypeError;
pub use event::{CaptureEvent, CaptureEventKind};
pub use provider::ProviderTag;
pub use source::MediaSource;

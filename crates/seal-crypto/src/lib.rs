//! Cryptographic primitives for SEAL: content hashing and detached signing.
//!
//! The hasher streams media content through SHA-256 with fixed-size buffered
//! reads, so memory use is independent of input size. The [`Signer`] trait is
//! the seam to the external signing primitive; [`Ed25519Signer`] is the
//! reference implementation.

pub mod hasher;
pub mod signer;

pub use hasher::{digest_file, digest_stream, HashError};
pub use signer::{Ed25519Signer, Signer, SignerError};

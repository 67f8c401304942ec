//! Digest-addressed provenance storage.
//!
//! Each [`ContentDigest`](seal_types::ContentDigest) owns one directory under
//! the provenance root, created lazily and never deleted. The store exposes
//! existence checks and append-only writes; it never reads or interprets file
//! contents beyond existence.
//!
//! Per-digest layout:
//!
//! ```text
//! <root>/<digest>/<digest>.proof       append-only evidence rows, header-first
//! <root>/<digest>/<digest>.sig         media signature, written once
//! <root>/<digest>/<digest>.proof.sig   record signature, rewritten per append
//! <root>/<digest>/<digest>.<tag>       raw receipt per successful provider
//! ```

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::ProvenanceStore;

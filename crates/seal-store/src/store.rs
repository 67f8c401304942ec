use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use seal_types::{ContentDigest, ProviderTag};

use crate::error::{StoreError, StoreResult};

/// File suffix for the canonical proof record.
const PROOF_SUFFIX: &str = "proof";
/// File suffix for detached signatures.
const SIG_SUFFIX: &str = "sig";

/// Digest-addressed provenance store rooted at a single directory.
///
/// The store owns the per-digest directories exclusively. All writes are
/// append-only or whole-file rewrites of signature files; nothing is ever
/// deleted. A partially written row after a crash is an accepted failure
/// mode; the append-only format lets readers skip it.
pub struct ProvenanceStore {
    root: PathBuf,
}

impl ProvenanceStore {
    /// Create a store rooted at the given directory.
    ///
    /// The root itself is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The provenance root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The storage directory for a digest, created if absent.
    pub fn dir_for(&self, digest: &ContentDigest) -> StoreResult<PathBuf> {
        let dir = self.root.join(digest.to_hex());
        fs::create_dir_all(&dir).map_err(|source| StoreError::StorageUnavailable {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Path of the canonical proof file for a digest.
    pub fn proof_path(&self, digest: &ContentDigest) -> PathBuf {
        let hex = digest.to_hex();
        self.root.join(&hex).join(format!("{hex}.{PROOF_SUFFIX}"))
    }

    /// Path of the media signature file for a digest.
    pub fn media_sig_path(&self, digest: &ContentDigest) -> PathBuf {
        let hex = digest.to_hex();
        self.root.join(&hex).join(format!("{hex}.{SIG_SUFFIX}"))
    }

    /// Path of the proof record signature file for a digest.
    pub fn proof_sig_path(&self, digest: &ContentDigest) -> PathBuf {
        let hex = digest.to_hex();
        self.root
            .join(&hex)
            .join(format!("{hex}.{PROOF_SUFFIX}.{SIG_SUFFIX}"))
    }

    /// Path of the raw receipt file for a digest and provider tag.
    pub fn receipt_path(&self, digest: &ContentDigest, tag: &ProviderTag) -> PathBuf {
        let hex = digest.to_hex();
        self.root.join(&hex).join(format!("{hex}.{tag}"))
    }

    /// `true` iff the canonical proof file already exists.
    ///
    /// This is the idempotency gate: when it returns `true` the engine
    /// short-circuits without rewriting or re-signing anything.
    pub fn proof_exists(&self, digest: &ContentDigest) -> bool {
        self.proof_path(digest).exists()
    }

    /// `true` iff the media signature file already exists.
    pub fn media_signature_exists(&self, digest: &ContentDigest) -> bool {
        self.media_sig_path(digest).exists()
    }

    /// `true` iff a receipt file exists for the given provider tag.
    pub fn receipt_exists(&self, digest: &ContentDigest, tag: &ProviderTag) -> bool {
        self.receipt_path(digest, tag).exists()
    }

    /// Append a serialized row (plus trailing newline) to the proof file,
    /// creating it if absent.
    pub fn append_proof(&self, digest: &ContentDigest, text: &str) -> StoreResult<()> {
        self.dir_for(digest)?;
        let path = self.proof_path(digest);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(text.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        debug!(digest = %digest.short_hex(), len = text.len(), "proof row appended");
        Ok(())
    }

    /// Append raw receipt bytes under the provider's file tag, creating the
    /// file if absent.
    pub fn write_receipt(
        &self,
        digest: &ContentDigest,
        tag: &ProviderTag,
        bytes: &[u8],
    ) -> StoreResult<()> {
        self.dir_for(digest)?;
        let path = self.receipt_path(digest, tag);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(digest = %digest.short_hex(), %tag, len = bytes.len(), "receipt written");
        Ok(())
    }

    /// Write the detached media signature. Callers write this at most once
    /// per digest; the store itself does not re-check.
    pub fn write_media_signature(
        &self,
        digest: &ContentDigest,
        signature: &[u8],
    ) -> StoreResult<()> {
        self.dir_for(digest)?;
        fs::write(self.media_sig_path(digest), signature)?;
        debug!(digest = %digest.short_hex(), "media signature written");
        Ok(())
    }

    /// Write (or rewrite) the detached proof record signature. The record
    /// changes on every append, so this is rewritten each time.
    pub fn write_proof_signature(
        &self,
        digest: &ContentDigest,
        signature: &[u8],
    ) -> StoreResult<()> {
        self.dir_for(digest)?;
        fs::write(self.proof_sig_path(digest), signature)?;
        debug!(digest = %digest.short_hex(), "proof signature written");
        Ok(())
    }
}

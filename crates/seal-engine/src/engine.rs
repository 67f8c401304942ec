use std::collections::HashMap;
use std::fs::File;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, info, warn};

use seal_crypto::{digest_stream, Signer};
use seal_notary::{NotarizationReceipt, Notarizer, NotaryError, ProofSink};
use seal_record::{EvidenceRecord, IntegrityGroup, RecordBuilder};
use seal_store::ProvenanceStore;
use seal_types::{ContentDigest, MediaSource};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::source::{ContentStreamProvider, SourceStreams};
use crate::watcher::IntakeHandles;

/// Per-digest lock table.
///
/// Every proof-file mutation for a digest (the baseline write and each
/// notarization merge) runs under this lock, so concurrent triggers for
/// the same never-before-seen content produce exactly one baseline row and
/// concurrent provider completions append serially.
#[derive(Default)]
pub(crate) struct DigestLocks {
    table: Mutex<HashMap<ContentDigest, Arc<tokio::sync::Mutex<()>>>>,
}

impl DigestLocks {
    pub(crate) fn lock_for(&self, digest: &ContentDigest) -> Arc<tokio::sync::Mutex<()>> {
        self.table
            .lock()
            .expect("digest lock table poisoned")
            .entry(*digest)
            .or_default()
            .clone()
    }
}

/// Shared engine state behind the façade.
pub(crate) struct EngineInner {
    pub(crate) store: ProvenanceStore,
    pub(crate) signer: Arc<dyn Signer>,
    pub(crate) builder: RecordBuilder,
    pub(crate) notarizer: Notarizer,
    pub(crate) streams: Arc<dyn ContentStreamProvider>,
    pub(crate) config: EngineConfig,
    pub(crate) locks: DigestLocks,
}

impl EngineInner {
    /// Append one evidence row (writing the header first when the proof
    /// file does not yet exist), then re-sign the record and make sure the
    /// media signature exists. Runs on a blocking thread.
    fn write_row(
        &self,
        source: &MediaSource,
        digest: &ContentDigest,
        integrity: Option<IntegrityGroup>,
    ) -> EngineResult<()> {
        let record = self
            .builder
            .build(source, digest, &self.config.evidence, integrity);

        if !self.store.proof_exists(digest) {
            self.store.append_proof(digest, &EvidenceRecord::header())?;
        }
        self.store.append_proof(digest, &record.row())?;

        self.sign_record(digest);
        self.sign_media_once(source, digest);
        Ok(())
    }

    /// Merge a successful notarization: updated row, fresh record
    /// signature, raw receipt under the provider's tag.
    fn write_notarized(
        &self,
        source: &MediaSource,
        digest: &ContentDigest,
        receipt: &NotarizationReceipt,
    ) -> EngineResult<()> {
        let integrity = receipt.attestation.as_ref().map(|a| {
            IntegrityGroup::attested(a.result.clone(), a.basic_integrity, a.cts_match, a.timestamp)
        });
        self.write_row(source, digest, integrity)?;
        self.store
            .write_receipt(digest, &receipt.tag, &receipt.payload)?;
        Ok(())
    }

    /// Re-sign the proof record. The record changes on every append, so
    /// this runs after each one. Failure keeps the unsigned proof on disk.
    fn sign_record(&self, digest: &ContentDigest) {
        let result = File::open(self.store.proof_path(digest))
            .map_err(|e| e.to_string())
            .and_then(|mut proof| {
                self.signer
                    .sign_stream(&mut proof)
                    .map_err(|e| e.to_string())
            })
            .and_then(|sig| {
                self.store
                    .write_proof_signature(digest, &sig)
                    .map_err(|e| e.to_string())
            });
        if let Err(error) = result {
            warn!(digest = %digest.short_hex(), %error, "record signing failed, proof kept unsigned");
        }
    }

    /// Sign the media content once; never recreated when already present.
    fn sign_media_once(&self, source: &MediaSource, digest: &ContentDigest) {
        if self.store.media_signature_exists(digest) {
            return;
        }
        let result = self
            .streams
            .open(source)
            .map_err(|e| e.to_string())
            .and_then(|mut stream| {
                self.signer
                    .sign_stream(&mut stream)
                    .map_err(|e| e.to_string())
            })
            .and_then(|sig| {
                self.store
                    .write_media_signature(digest, &sig)
                    .map_err(|e| e.to_string())
            });
        if let Err(error) = result {
            warn!(digest = %digest.short_hex(), %error, "media signing failed");
        }
    }
}

/// The engine façade: single entry point for proof generation.
pub struct ProofEngine {
    pub(crate) inner: Arc<EngineInner>,
    pub(crate) intake: Mutex<Option<IntakeHandles>>,
}

impl ProofEngine {
    /// Assemble an engine from its subsystems.
    ///
    /// The builder's location policy is taken from `config` so there is a
    /// single source of truth for it.
    pub fn new(
        store: ProvenanceStore,
        signer: Arc<dyn Signer>,
        builder: RecordBuilder,
        notarizer: Notarizer,
        streams: Arc<dyn ContentStreamProvider>,
        config: EngineConfig,
    ) -> Self {
        let builder = builder.with_policy(config.location_policy.clone());
        Self {
            inner: Arc::new(EngineInner {
                store,
                signer,
                builder,
                notarizer,
                streams,
                config,
                locks: DigestLocks::default(),
            }),
            intake: Mutex::new(None),
        }
    }

    /// Generate (or find) the proof for a media source.
    ///
    /// Returns the content digest, or `None` when the source cannot be
    /// hashed or the storage location cannot be created. Every failure is
    /// contained here; nothing propagates to the caller.
    pub async fn process(&self, source: &MediaSource) -> Option<ContentDigest> {
        process_source(Arc::clone(&self.inner), source.clone(), None).await
    }

    /// Like [`process`](Self::process), but trusts a precomputed digest
    /// instead of hashing the content again.
    pub async fn process_with_digest(
        &self,
        source: &MediaSource,
        digest: ContentDigest,
    ) -> Option<ContentDigest> {
        process_source(Arc::clone(&self.inner), source.clone(), Some(digest)).await
    }

    /// `true` iff a proof already exists for the digest.
    pub fn proof_exists(&self, digest: &ContentDigest) -> bool {
        self.inner.store.proof_exists(digest)
    }

    /// The underlying provenance store (path lookups, existence checks).
    pub fn store(&self) -> &ProvenanceStore {
        &self.inner.store
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }
}

/// Full processing pipeline for one source. All errors are downgraded to
/// `None` at this boundary.
pub(crate) async fn process_source(
    inner: Arc<EngineInner>,
    source: MediaSource,
    precomputed: Option<ContentDigest>,
) -> Option<ContentDigest> {
    match try_process(inner, source.clone(), precomputed).await {
        Ok(digest) => Some(digest),
        Err(e) => {
            warn!(%source, error = %e, "no proof generated");
            None
        }
    }
}

async fn try_process(
    inner: Arc<EngineInner>,
    source: MediaSource,
    precomputed: Option<ContentDigest>,
) -> EngineResult<ContentDigest> {
    let digest = match precomputed {
        Some(digest) => digest,
        None => {
            let streams = Arc::clone(&inner.streams);
            let hash_source = source.clone();
            task::spawn_blocking(move || -> EngineResult<ContentDigest> {
                let stream = streams.open(&hash_source)?;
                Ok(digest_stream(stream)?)
            })
            .await
            .map_err(|e| EngineError::Task(e.to_string()))??
        }
    };

    // Idempotent short-circuit: no re-signing, no re-notarization.
    if inner.store.proof_exists(&digest) {
        debug!(digest = %digest.short_hex(), "proof exists");
        return Ok(digest);
    }

    let lock = inner.locks.lock_for(&digest);
    let guard = lock.lock().await;

    // A concurrent call for the same digest may have written while we
    // waited on the lock.
    if inner.store.proof_exists(&digest) {
        debug!(digest = %digest.short_hex(), "proof exists (written concurrently)");
        return Ok(digest);
    }

    info!(digest = %digest.short_hex(), %source, "writing baseline proof");
    {
        let writer = Arc::clone(&inner);
        let baseline_source = source.clone();
        task::spawn_blocking(move || writer.write_row(&baseline_source, &digest, None))
            .await
            .map_err(|e| EngineError::Task(e.to_string()))??;
    }
    drop(guard);

    if inner.config.auto_notarize {
        let streams = SourceStreams::new(Arc::clone(&inner.streams), source.clone());
        let sink = NotarySink {
            inner: Arc::clone(&inner),
            source,
        };
        let handles = inner
            .notarizer
            .notarize_all(digest, Arc::new(streams), Arc::new(sink));
        if !handles.is_empty() {
            debug!(digest = %digest.short_hex(), providers = handles.len(), "notarization launched");
        }
    }

    Ok(digest)
}

/// The engine side of the notarization merge point. Serializes on the same
/// per-digest lock as baseline writes.
struct NotarySink {
    inner: Arc<EngineInner>,
    source: MediaSource,
}

#[async_trait]
impl ProofSink for NotarySink {
    async fn record_notarization(
        &self,
        digest: &ContentDigest,
        receipt: &NotarizationReceipt,
    ) -> Result<(), NotaryError> {
        let lock = self.inner.locks.lock_for(digest);
        let _guard = lock.lock().await;

        let writer = Arc::clone(&self.inner);
        let source = self.source.clone();
        let digest = *digest;
        let receipt = receipt.clone();
        task::spawn_blocking(move || writer.write_notarized(&source, &digest, &receipt))
            .await
            .map_err(|e| NotaryError::Sink(e.to_string()))?
            .map_err(|e| NotaryError::Sink(e.to_string()))
    }
}

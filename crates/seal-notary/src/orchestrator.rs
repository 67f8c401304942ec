use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use seal_types::ContentDigest;

use crate::provider::{ConnectivityCheck, ContentStreams, NotarizationProvider, ProofSink};
use crate::receipt::{NotarizationOutcome, ProviderFailure};

/// Launches one independent notarization task per configured provider.
///
/// The orchestrator never waits for providers: `notarize_all` spawns the
/// tasks and returns immediately. Each task runs to completion or failure
/// on its own, with no retries, no cancellation, and no cross-task
/// coordination.
pub struct Notarizer {
    providers: Vec<Arc<dyn NotarizationProvider>>,
    connectivity: Arc<dyn ConnectivityCheck>,
}

impl Notarizer {
    /// Create an orchestrator over the given providers.
    pub fn new(
        providers: Vec<Arc<dyn NotarizationProvider>>,
        connectivity: Arc<dyn ConnectivityCheck>,
    ) -> Self {
        Self {
            providers,
            connectivity,
        }
    }

    /// Number of configured providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Launch one task per provider for the given digest.
    ///
    /// Skipped entirely while offline (no queued retry). Returns the task
    /// handles so callers that care (tests, shutdown paths) can observe
    /// outcomes; dropping them detaches the tasks.
    pub fn notarize_all(
        &self,
        digest: ContentDigest,
        streams: Arc<dyn ContentStreams>,
        sink: Arc<dyn ProofSink>,
    ) -> Vec<JoinHandle<NotarizationOutcome>> {
        if !self.connectivity.is_online() {
            debug!(digest = %digest.short_hex(), "offline, skipping notarization");
            return Vec::new();
        }

        self.providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let streams = Arc::clone(&streams);
                let sink = Arc::clone(&sink);
                tokio::spawn(async move {
                    run_provider(provider, digest, streams, sink).await
                })
            })
            .collect()
    }
}

/// One provider task: open a fresh stream, notarize, decode, merge.
///
/// A failure at any step is terminal for this invocation and leaves the
/// stored proof untouched.
async fn run_provider(
    provider: Arc<dyn NotarizationProvider>,
    digest: ContentDigest,
    streams: Arc<dyn ContentStreams>,
    sink: Arc<dyn ProofSink>,
) -> NotarizationOutcome {
    let tag = provider.tag();

    let stream = match streams.open() {
        Ok(stream) => stream,
        Err(e) => {
            warn!(digest = %digest.short_hex(), %tag, error = %e, "cannot open content stream");
            return NotarizationOutcome::Failure(ProviderFailure::local(e.to_string()));
        }
    };

    let response = match provider.notarize(&digest, stream).await {
        Ok(response) => response,
        Err(failure) => {
            warn!(
                digest = %digest.short_hex(),
                %tag,
                code = failure.code,
                message = %failure.message,
                "provider failed"
            );
            return NotarizationOutcome::Failure(failure);
        }
    };

    let receipt = match response.decode(tag.clone()) {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!(digest = %digest.short_hex(), %tag, error = %e, "payload decode failed");
            return NotarizationOutcome::Failure(ProviderFailure::local(e.to_string()));
        }
    };

    if let Err(e) = sink.record_notarization(&digest, &receipt).await {
        warn!(digest = %digest.short_hex(), %tag, error = %e, "proof sink failed");
        return NotarizationOutcome::Failure(ProviderFailure::local(e.to_string()));
    }

    info!(digest = %digest.short_hex(), %tag, "notarization recorded");
    NotarizationOutcome::Success(receipt)
}

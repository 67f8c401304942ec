use std::io::{self, Read};

use async_trait::async_trait;

use seal_types::{ContentDigest, ProviderTag};

use crate::error::NotaryError;
use crate::receipt::{NotarizationReceipt, ProviderFailure, ProviderResponse};

/// One third-party notarization service.
///
/// `notarize` completes exactly once per invocation: with a response on
/// success or a [`ProviderFailure`] otherwise. Providers enforce their own
/// timeouts; the orchestrator imposes none and never retries.
#[async_trait]
pub trait NotarizationProvider: Send + Sync {
    /// File tag under which this provider's receipts are stored.
    fn tag(&self) -> ProviderTag;

    /// Submit the digest (and, for providers that need it, the content
    /// itself) for notarization.
    async fn notarize(
        &self,
        digest: &ContentDigest,
        content: Box<dyn Read + Send>,
    ) -> Result<ProviderResponse, ProviderFailure>;
}

/// Supplies a fresh, independent readable stream of the media content.
///
/// Every provider task gets its own stream; none of them share read
/// positions.
pub trait ContentStreams: Send + Sync {
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;
}

/// Merge point for successful notarizations.
///
/// The engine implements this as an append of the updated evidence row
/// plus a record re-sign and receipt write, serialized per digest even
/// though the calling tasks are concurrent.
#[async_trait]
pub trait ProofSink: Send + Sync {
    async fn record_notarization(
        &self,
        digest: &ContentDigest,
        receipt: &NotarizationReceipt,
    ) -> Result<(), NotaryError>;
}

/// Reports whether the network is reachable. Notarization is skipped
/// entirely (no queued retry) while offline.
pub trait ConnectivityCheck: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity check that always reports online.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysOnline;

impl ConnectivityCheck for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Connectivity check that always reports offline.
#[derive(Clone, Copy, Debug, Default)]
pub struct Offline;

impl ConnectivityCheck for Offline {
    fn is_online(&self) -> bool {
        false
    }
}
